//! Linea State Engine - Strategy state reconciliation
//!
//! This crate resolves two asynchronous, possibly out-of-order update
//! streams into one canonical strategy state:
//! - Generation (restart) ordering
//! - In-generation sequence checks
//! - Timestamp fallback ordering
//! - Redraw suppression for unchanged values
//! - Liveness tracking independent of line state
//! - Bounded event deduplication

pub mod reconcile;
pub mod health;
pub mod dedup;

pub use reconcile::*;
pub use health::*;
pub use dedup::*;
