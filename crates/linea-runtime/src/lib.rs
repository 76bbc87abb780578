//! Linea Runtime - Session orchestration
//!
//! The runtime wires the engines together around one active strategy
//! selection:
//! 1. Decode inbound feed messages
//! 2. Filter duplicate events
//! 3. Reconcile into canonical state
//! 4. Track liveness on a cancellable timer
//! 5. Project state and markers onto the rendering surface
//! 6. Reseed from historic backfill on selection

pub mod config;
pub mod feed;
pub mod session;
pub mod staleness;
pub mod backfill;

pub use config::*;
pub use feed::*;
pub use session::*;
pub use staleness::*;
pub use backfill::*;

/// Install a fmt subscriber honoring `RUST_LOG`. Safe to call more than
/// once; later calls are no-ops.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
