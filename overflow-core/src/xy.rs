use std::ops::{Add, Sub};

/// A generic structure with a value for each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct XY<T> {
    /// X-axis value
    pub x: T,
    /// Y-axis value
    pub y: T,
}

/// A point or a size in page coordinates, in CSS pixels.
pub type Vec2 = XY<f64>;

impl<T> XY<T> {
    /// Creates a new `XY` from the given values.
    pub fn new(x: T, y: T) -> Self {
        XY { x, y }
    }

    /// Creates a new `XY` by applying `f` to `x` and `y`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use overflow_core::XY;
    /// let xy = XY::new(1.0, -2.0);
    ///
    /// assert_eq!(xy.map(|v: f64| v.max(0.0)), XY::new(1.0, 0.0));
    /// ```
    pub fn map<U, F>(self, f: F) -> XY<U>
    where
        F: Fn(T) -> U,
    {
        XY::new(f(self.x), f(self.y))
    }

    /// Applies `f` on each pair of values from `self` and `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use overflow_core::XY;
    /// let scroll = XY::new(300.0, 900.0);
    /// let visible = XY::new(300.0, 200.0);
    ///
    /// assert_eq!(scroll.zip_map(visible, |s, v| s - v), XY::new(0.0, 700.0));
    /// ```
    pub fn zip_map<U, V, F>(self, other: XY<U>, f: F) -> XY<V>
    where
        F: Fn(T, U) -> V,
    {
        XY::new(f(self.x, other.x), f(self.y, other.y))
    }
}

impl Vec2 {
    /// Returns `(0, 0)`.
    pub fn zero() -> Self {
        XY::new(0.0, 0.0)
    }
}

impl<T: Add<Output = T>> Add for XY<T> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        XY::new(self.x + other.x, self.y + other.y)
    }
}

impl<T: Sub<Output = T>> Sub for XY<T> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        XY::new(self.x - other.x, self.y - other.y)
    }
}

impl<T> From<(T, T)> for XY<T> {
    fn from((x, y): (T, T)) -> Self {
        XY::new(x, y)
    }
}
