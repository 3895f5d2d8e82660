//! # Overflow
//!
//! Overflow replaces the native scrollbar of overflowing page regions with
//! custom-styled, script-driven ones: a track, a draggable thumb and optional
//! up/down buttons, kept in sync with the scroll offset of the content.
//!
//! The engine lives in [`overflow_core`] and is re-exported here. This crate
//! adds the browser backend.
//!
//! ## Example
//!
//! ```rust,ignore
//! use overflow::{backends::web, Options};
//!
//! let options = Options::new().wheel_sensitivity(20.0);
//! let overflow = web::init(".scroll", options)?;
//! ```
#![deny(missing_docs)]
#![cfg_attr(feature = "doc-cfg", feature(doc_cfg))]

pub use overflow_core::*;

pub mod backends;
