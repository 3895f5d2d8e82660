//! # Overflow-core
//!
//! This library defines the core components for Overflow: custom-styled,
//! script-driven scrollbars replacing the native scrollbar of overflowing
//! page regions.
//!
//! The engine never talks to a browser directly. Everything it needs from the
//! page goes through the [`Dom`](dom::Dom) capability trait, and every input
//! reaches it as an [`Event`](event::Event) given to [`Overflow::on_event`].
//!
//! If you are building a web page, then [`overflow`] is probably what you
//! want: it ships a `web-sys` backend.
//!
//! [`overflow`]: https://docs.rs/overflow
#![deny(missing_docs)]
#![cfg_attr(feature = "doc-cfg", feature(doc_cfg))]

pub mod dom;
pub mod error;
pub mod event;
pub mod logger;
pub mod options;
pub mod scroll;

mod overflow;
mod with;
mod xy;

pub use self::dom::{BoxMetrics, NodeId, Target, TimerId};
pub use self::error::Error;
pub use self::options::Options;
pub use self::overflow::Overflow;
pub use self::scroll::Scrollable;
pub use self::with::With;
pub use self::xy::{Vec2, XY};
