//! Staleness monitoring
//!
//! An explicit cancellable scheduled task, recreated on every strategy
//! selection. `stop` before `start` guarantees a single live instance; the
//! task itself only calls into the session's staleness evaluation and never
//! touches line values.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use linea_core::TimePoint;
use linea_visual::RenderSurface;

use crate::StrategySession;

/// Periodic liveness checker for the selected strategy
pub struct StalenessMonitor {
    threshold: Duration,
    task: Option<JoinHandle<()>>,
}

impl StalenessMonitor {
    pub fn new(threshold: Duration) -> Self {
        StalenessMonitor {
            threshold,
            task: None,
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Begin periodic evaluation at half the staleness threshold. Any
    /// previously running task is stopped first.
    pub fn start<S>(&mut self, session: Arc<Mutex<StrategySession<S>>>)
    where
        S: RenderSurface + Send + 'static,
    {
        self.stop();

        let period = self.threshold / 2;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                session.lock().evaluate_staleness(TimePoint::now());
            }
        }));
    }

    /// Cancel the task. Idempotent; safe to call when never started.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for StalenessMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionConfig;
    use linea_core::LineKind;
    use linea_visual::{Color, LineStyle, PointMarker};

    struct NullSurface;

    impl RenderSurface for NullSurface {
        fn apply_line(&mut self, _: LineKind, _: f64, _: Color, _: LineStyle) {}
        fn hide_line(&mut self, _: LineKind) {}
        fn set_markers(&mut self, _: &[PointMarker]) {}
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let mut monitor = StalenessMonitor::new(Duration::from_millis(7000));
        monitor.stop();
        monitor.stop();
        assert!(!monitor.is_running());
    }

    #[tokio::test]
    async fn test_start_replaces_previous_task() {
        let session = Arc::new(Mutex::new(StrategySession::new(
            SessionConfig::default(),
            NullSurface,
        )));

        let mut monitor = StalenessMonitor::new(Duration::from_millis(100));
        monitor.start(Arc::clone(&session));
        assert!(monitor.is_running());

        monitor.start(Arc::clone(&session));
        assert!(monitor.is_running());

        monitor.stop();
        assert!(!monitor.is_running());
    }
}
