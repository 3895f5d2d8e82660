//! Define backends using common libraries.
//!
//! Overflow doesn't touch the page by itself: it delegates this job to a
//! backend implementing [`Dom`](crate::dom::Dom).
//!
//! Each of the included backends needs a corresponding feature to be enabled.
//! Tests can use the in-memory [`puppet`](crate::dom::puppet) document,
//! which is always available.
pub mod web;
