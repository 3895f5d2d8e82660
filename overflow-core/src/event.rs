//! User-input events and their effects.
//!
//! * Every browser event a backend forwards is converted to an [`Event`].
//! * Each event is then given to [`Overflow::on_event`], which hands it to
//!   every scrollable. Events attached to a node carry that node as
//!   `target`, so each scrollable only reacts to its own nodes; document-level
//!   events (pointer moves and releases, keys, timers) reach all of them.
//! * The combined [`EventResult`] tells the backend whether to suppress the
//!   browser's default behaviour.
//!
//! [`Overflow::on_event`]: crate::Overflow::on_event

use crate::{NodeId, TimerId, Vec2};

/// Answer to an event notification.
/// The event can be consumed or ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventResult {
    /// The event was ignored. The browser default behaviour should run.
    Ignored,
    /// The event was consumed. The backend should prevent the default.
    Consumed,
}

impl EventResult {
    /// Returns `true` if `self` is `EventResult::Consumed`.
    pub fn is_consumed(self) -> bool {
        matches!(self, EventResult::Consumed)
    }

    /// Returns an event result that combines `self` and `other`.
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (EventResult::Ignored, EventResult::Ignored) => EventResult::Ignored,
            _ => EventResult::Consumed,
        }
    }
}

/// A non-character key on the keyboard
#[derive(PartialEq, Eq, Clone, Copy, Hash, Debug)]
pub enum Key {
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Page Up key
    PageUp,
    /// Page Down key
    PageDown,
    /// Home key
    Home,
    /// End key
    End,
    /// Any other key, by its legacy key code.
    Other(u32),
}

impl Key {
    /// Returns the key matching a legacy DOM `keyCode`.
    pub fn from_key_code(code: u32) -> Self {
        match code {
            33 => Key::PageUp,
            34 => Key::PageDown,
            35 => Key::End,
            36 => Key::Home,
            38 => Key::Up,
            40 => Key::Down,
            code => Key::Other(code),
        }
    }

    /// Returns the scroll direction of an arrow key.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Vertical scroll direction.
#[derive(PartialEq, Eq, Clone, Copy, Hash, Debug)]
pub enum Direction {
    /// Towards the start of the content.
    Up,
    /// Towards the end of the content.
    Down,
}

impl Direction {
    /// Returns `-1` for `Up`, `1` for `Down`.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Up => -1.0,
            Direction::Down => 1.0,
        }
    }
}

/// One of the buttons present on the mouse
#[derive(PartialEq, Eq, Clone, Copy, Hash, Debug)]
pub enum MouseButton {
    /// The left button, used for main actions.
    Left,
    /// Middle button, probably the wheel.
    Middle,
    /// The right button, for special actions.
    Right,
}

/// Represents a possible event sent by the mouse.
#[derive(PartialEq, Eq, Clone, Copy, Hash, Debug)]
pub enum MouseEvent {
    /// A button was pressed.
    Press(MouseButton),
    /// A button was released.
    Release(MouseButton),
    /// A press and a release happened on the same node.
    Click(MouseButton),
    /// The pointer moved.
    Move,
}

/// Raw wheel delta, in one of the two browser representations.
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum WheelDelta {
    /// Coarse `wheelDelta` value: 120 per notch, positive away from the user.
    Ticks(f64),
    /// Fine `detail` value: 3 per notch, positive towards the user.
    Detail(f64),
}

impl WheelDelta {
    /// Returns a signed number of notches, positive away from the user.
    pub fn normalized(self) -> f64 {
        match self {
            WheelDelta::Ticks(ticks) => ticks / 120.0,
            WheelDelta::Detail(detail) => -detail / 3.0,
        }
    }
}

/// Represents an event as seen by the scroll engine.
#[derive(PartialEq, Clone, Debug)]
pub enum Event {
    /// A mouse event was sent.
    Mouse {
        /// Node under the pointer, if known to the backend.
        target: Option<NodeId>,
        /// Position of the pointer in page coordinates.
        position: Vec2,
        /// The mouse event itself.
        event: MouseEvent,
    },

    /// The mouse wheel turned over an observed node.
    ///
    /// Wheel events bubble: over nested scrollables, the backend sends one
    /// event per container listening on the way up.
    Wheel {
        /// Node whose listener received the event.
        current_target: NodeId,
        /// Raw delta.
        delta: WheelDelta,
    },

    /// A key was pressed.
    KeyDown(Key),

    /// A key was released.
    KeyUp(Key),

    /// A timer armed with `Dom::set_interval` fired.
    Timer(TimerId),

    /// External code asked for a node to be scrolled into view.
    Focus(NodeId),

    /// The window lost focus.
    Blur,
}
