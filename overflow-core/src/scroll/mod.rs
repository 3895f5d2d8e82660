//! Custom scrollbars for overflowing content.
//!
//! A [`Scrollable`] wraps one content node in a positioning container, hangs
//! a scrollbar next to it, and keeps the two in sync:
//!
//! * [`geometry`] holds the arithmetic between content offsets and thumb
//!   positions.
//! * [`layout`] builds and removes the container.
//! * [`scrollbar`] builds the track, the thumb and the buttons.
//!
//! Pointer, wheel, keyboard and focus handling live on [`Scrollable`] itself,
//! see [`Scrollable::on_event`].
pub mod geometry;
pub mod layout;
pub mod scrollbar;

mod focus;
mod input;
mod scrollable;

pub use self::input::{DragSession, KeyRepeat, RepeatTrigger};
pub use self::scrollable::Scrollable;
