//! Session configuration

use std::time::Duration;

use linea_core::BucketWidth;
use linea_time::DisplayMode;

/// Session configuration
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Heartbeat silence before a strategy is considered orphaned
    pub staleness_threshold: Duration,
    /// Bar bucket width of the active display interval; `None` disables
    /// marker bucket alignment
    pub bucket_width: Option<BucketWidth>,
    /// Display timezone mode
    pub display_mode: DisplayMode,
    /// Window within which identical backfill requests coalesce
    pub backfill_debounce: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            staleness_threshold: Duration::from_millis(7000),
            bucket_width: Some(BucketWidth::ONE_MINUTE),
            display_mode: DisplayMode::Utc,
            backfill_debounce: Duration::from_millis(2000),
        }
    }
}
