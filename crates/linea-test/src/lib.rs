//! Linea Test Harness - Scripted producers and chaos delivery
//!
//! This crate provides:
//! - A deterministic scripted strategy producer (heartbeats + events)
//! - Duplicate/reorder/drop chaos over a scripted feed
//! - A recording surface for asserting on rendered output

pub mod producer;
pub mod chaos;
pub mod surface;

pub use producer::*;
pub use chaos::*;
pub use surface::*;
