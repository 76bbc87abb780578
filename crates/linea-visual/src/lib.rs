//! Linea Visual - Renderable state for the chart surface
//!
//! This is NOT chart drawing. This crate computes WHAT should be visible -
//! which horizontal indicators at which prices in which colors, which point
//! markers at which normalized times - and hands it to a `RenderSurface`
//! implementation as idempotent batches.

pub mod color;
pub mod marker;
pub mod surface;
pub mod coordinator;

pub use color::*;
pub use marker::*;
pub use surface::*;
pub use coordinator::*;
