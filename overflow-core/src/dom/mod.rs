//! Define the capability trait for actual page interaction.
//!
//! Overflow doesn't touch the page by itself: it delegates this job to a
//! backend, which owns the actual document nodes and handles event
//! subscription.
//!
//! This module defines the [`Dom`] trait, to be implemented by actual types,
//! usually over `web-sys`. The [`puppet`] module provides an in-memory
//! document for tests.

use crate::Vec2;
use enumset::EnumSetType;
use std::fmt;
use std::time::Duration;

pub mod puppet;

/// Opaque handle to a node owned by a [`Dom`] backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a periodic timer armed with [`Dom::set_interval`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

/// Where a subscription is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// The whole document (and window-level events like blur).
    Document,
    /// A single node.
    Node(NodeId),
}

impl From<NodeId> for Target {
    fn from(node: NodeId) -> Self {
        Target::Node(node)
    }
}

/// Kind of event a controller can subscribe to.
#[derive(EnumSetType, Debug, Hash)]
pub enum EventKind {
    /// Mouse button pressed.
    MouseDown,
    /// Mouse button released.
    MouseUp,
    /// Pointer moved.
    MouseMove,
    /// Full click (press and release on the same node).
    Click,
    /// Mouse wheel, in any of its browser representations.
    Wheel,
    /// Key pressed.
    KeyDown,
    /// Key released.
    KeyUp,
    /// Focus notification sent to a node by external code.
    Focus,
    /// The window lost focus.
    Blur,
}

/// Measured box of a node.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct BoxMetrics {
    /// Rendered width.
    pub width: f64,
    /// Rendered height.
    pub height: f64,
    /// Total width of the content, including the overflowing part.
    pub scroll_width: f64,
    /// Total height of the content, including the overflowing part.
    pub scroll_height: f64,
    /// Current vertical scroll offset.
    pub scroll_top: f64,
}

impl BoxMetrics {
    /// Returns `(width, height)`.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Returns `(scroll_width, scroll_height)`.
    pub fn scroll_size(&self) -> Vec2 {
        Vec2::new(self.scroll_width, self.scroll_height)
    }
}

/// Trait defining the required methods to be a backend.
///
/// A backend is the interface between the scroll engine and the actual page.
///
/// Style properties use their CSS names (`padding-top`, `margin-left`, ...).
/// Lengths are CSS pixels.
pub trait Dom {
    /// Returns every node of the document matching `selector`, in document order.
    fn query(&self, selector: &str) -> Vec<NodeId>;

    /// Returns every descendant of `root` matching `selector`.
    fn query_within(&self, root: NodeId, selector: &str) -> Vec<NodeId>;

    /// Returns `true` if `node` matches `selector`.
    fn matches(&self, node: NodeId, selector: &str) -> bool;

    /// Returns the parent of `node`, if any.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Returns `true` if `node` is part of the document.
    fn is_connected(&self, node: NodeId) -> bool;

    /// Returns the computed value of a style property.
    fn computed_style(&self, node: NodeId, property: &str) -> String;

    /// Returns the inline value of a style property, or an empty string.
    fn inline_style(&self, node: NodeId, property: &str) -> String;

    /// Sets an inline style property. An empty value removes it.
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    /// Measures `node`.
    fn metrics(&self, node: NodeId) -> BoxMetrics;

    /// Sets the vertical scroll offset of `node`.
    fn set_scroll_top(&mut self, node: NodeId, value: f64);

    /// Returns the position of `node` in page coordinates.
    fn cumulative_offset(&self, node: NodeId) -> Vec2;

    /// Creates a detached element, optionally tagged with a class name.
    fn create_element(&mut self, tag: &str, class: Option<&str>) -> NodeId;

    /// Clones `node`, with its descendants if `deep` is `true`.
    fn clone_node(&mut self, node: NodeId, deep: bool) -> NodeId;

    /// Inserts `node` in `parent`, before `reference`.
    fn insert_before(&mut self, parent: NodeId, node: NodeId, reference: NodeId);

    /// Appends `child` as last child of `parent`, moving it if needed.
    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Detaches `node` from its parent.
    fn remove(&mut self, node: NodeId);

    /// Returns the `id` attribute of `node`.
    fn id(&self, node: NodeId) -> Option<String>;

    /// Sets or clears the `id` attribute of `node`.
    fn set_id(&mut self, node: NodeId, id: Option<&str>);

    /// Returns `true` if `node` carries the given class.
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Starts forwarding events of the given kind on `target`.
    ///
    /// Forwarded events are expected to reach [`Overflow::on_event`].
    ///
    /// [`Overflow::on_event`]: crate::Overflow::on_event
    fn observe(&mut self, target: Target, kind: EventKind);

    /// Stops forwarding events of the given kind on `target`.
    fn unobserve(&mut self, target: Target, kind: EventKind);

    /// Arms a periodic timer, delivered as [`Event::Timer`].
    ///
    /// [`Event::Timer`]: crate::event::Event::Timer
    fn set_interval(&mut self, period: Duration) -> TimerId;

    /// Cancels a timer. Unknown ids are ignored.
    fn clear_interval(&mut self, timer: TimerId);

    /// Allows or forbids text selection and default mouse-down behaviour
    /// on the whole document.
    fn set_selection_enabled(&mut self, enabled: bool);

    /// Makes `node` visible by removing its inline `display`.
    fn show(&mut self, node: NodeId) {
        self.set_style(node, "display", "");
    }

    /// Hides `node` with an inline `display: none`.
    fn hide(&mut self, node: NodeId) {
        self.set_style(node, "display", "none");
    }

    /// Returns `true` if `node` is hidden with an inline `display: none`.
    fn is_hidden(&self, node: NodeId) -> bool {
        self.inline_style(node, "display") == "none"
    }

    /// Returns `true` if `ancestor` is `node` or one of its ancestors.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Returns a name to identify the backend.
    ///
    /// Mostly used for debugging.
    fn name(&self) -> &str {
        "unknown"
    }
}

/// Parses a CSS pixel length like `12px`, `3.5px` or `0`.
///
/// Returns 0 for anything else (`auto`, empty string, ...).
pub fn parse_px(value: &str) -> f64 {
    let value = value.trim();
    value
        .strip_suffix("px")
        .unwrap_or(value)
        .trim()
        .parse()
        .unwrap_or(0.0)
}

/// Formats a length as CSS pixels.
pub fn px(value: f64) -> String {
    format!("{}px", value)
}
