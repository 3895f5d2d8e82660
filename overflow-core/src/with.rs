/// Chainable configuration helper.
///
/// Lets a one-off change be written inline with the other setters:
///
/// ```rust
/// use overflow_core::{Options, With};
///
/// let options = Options::new()
///     .wheel_sensitivity(20.0)
///     .with(|o| o.up_button_class = "arrow-up".into());
/// assert_eq!(options.up_button_class, "arrow-up");
/// ```
pub trait With: Sized {
    /// Calls the given closure on `self`, then returns it.
    fn with<F: FnOnce(&mut Self)>(mut self, f: F) -> Self {
        f(&mut self);
        self
    }
}

impl<T: Sized> With for T {}
