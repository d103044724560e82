//! Core domain entities.
//!
//! - [`Link`] - A persisted short code → URL mapping with a click counter
//! - [`NewLink`] - Input for inserting a new mapping

pub mod link;

pub use link::{Link, NewLink};
