//! Historic backfill with single-slot coalescing
//!
//! Backfill is network-bound and triggered by rapid interaction, so it is
//! guarded twice: an in-flight flag (at most one outstanding request) and a
//! debounce window keyed on the full request range. A failed fetch is not
//! retried automatically - the user retries explicitly - so a failure also
//! clears the debounce record.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use linea_core::{InstanceName, LineaError, LineaResult, StrategyUpdate, TimePoint};
use linea_visual::RenderSurface;

use crate::StrategySession;

/// The key a backfill request coalesces on
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BackfillRange {
    pub start: TimePoint,
    pub end: TimePoint,
    pub instance: InstanceName,
}

/// Source of historic strategy events
#[allow(async_fn_in_trait)]
pub trait HistoryProvider {
    async fn fetch(&self, range: &BackfillRange) -> LineaResult<Vec<StrategyUpdate>>;
}

/// What happened to one backfill request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackfillOutcome {
    /// Events were fetched and seeded into the session
    Seeded(usize),
    /// A duplicate request observed the in-flight/debounced slot instead
    Coalesced,
}

/// Single-slot request coalescer around a history provider
pub struct Backfiller<P: HistoryProvider> {
    provider: P,
    debounce: Duration,
    in_flight: bool,
    last: Option<(BackfillRange, Instant)>,
}

impl<P: HistoryProvider> Backfiller<P> {
    pub fn new(provider: P, debounce: Duration) -> Self {
        Backfiller {
            provider,
            debounce,
            in_flight: false,
            last: None,
        }
    }

    /// Fetch history for `range` and seed the session. At most one request
    /// is outstanding; an identical range inside the debounce window
    /// coalesces into the previous result. A failed fetch surfaces as a
    /// "no history" error and resumes live processing.
    pub async fn fill<S: RenderSurface>(
        &mut self,
        range: BackfillRange,
        session: &Mutex<StrategySession<S>>,
    ) -> LineaResult<BackfillOutcome> {
        if self.in_flight {
            return Ok(BackfillOutcome::Coalesced);
        }
        if let Some((last_range, at)) = &self.last {
            if *last_range == range && at.elapsed() < self.debounce {
                return Ok(BackfillOutcome::Coalesced);
            }
        }

        self.in_flight = true;
        self.last = Some((range.clone(), Instant::now()));
        let result = self.provider.fetch(&range).await;
        self.in_flight = false;

        match result {
            Ok(events) => {
                let count = events.len();
                session.lock().seed_history(events);
                Ok(BackfillOutcome::Seeded(count))
            }
            Err(err) => {
                tracing::error!(instance = %range.instance, "backfill failed: {err}");
                // Clear the debounce record so an explicit retry goes out
                self.last = None;
                session.lock().resume_live();
                Err(LineaError::NoHistory(range.instance))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionConfig;
    use linea_core::{EventDetail, EventId, LineKind, LineSet, LineaError, PositionAction};
    use linea_visual::{Color, LineStyle, PointMarker};
    use std::cell::Cell;

    struct NullSurface;

    impl RenderSurface for NullSurface {
        fn apply_line(&mut self, _: LineKind, _: f64, _: Color, _: LineStyle) {}
        fn hide_line(&mut self, _: LineKind) {}
        fn set_markers(&mut self, _: &[PointMarker]) {}
    }

    struct CountingProvider {
        calls: Cell<usize>,
        fail: bool,
    }

    impl HistoryProvider for CountingProvider {
        async fn fetch(&self, range: &BackfillRange) -> LineaResult<Vec<StrategyUpdate>> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(LineaError::Transport("connection refused".to_string()));
            }
            let mut lines = LineSet::new();
            lines.entry = Some(99_000.0);
            Ok(vec![StrategyUpdate::event(
                range.instance.clone(),
                range.start,
                lines,
                EventDetail {
                    id: EventId::new("IPC_1_1700000000000"),
                    action: PositionAction::Open,
                    reason: "SIGNAL_DETECTED".to_string(),
                    price: Some(99_000.0),
                },
            )])
        }
    }

    fn range(start: i64) -> BackfillRange {
        BackfillRange {
            start: TimePoint::from_secs(start),
            end: TimePoint::from_secs(start + 3600),
            instance: InstanceName::new("IPC"),
        }
    }

    fn session() -> Mutex<StrategySession<NullSurface>> {
        let mut session = StrategySession::new(SessionConfig::default(), NullSurface);
        session.select(InstanceName::new("IPC"));
        Mutex::new(session)
    }

    #[tokio::test]
    async fn test_fill_seeds_and_resumes_live() {
        let session = session();
        let provider = CountingProvider { calls: Cell::new(0), fail: false };
        let mut backfiller = Backfiller::new(provider, Duration::from_secs(2));

        assert!(session.lock().is_switching());
        let outcome = backfiller.fill(range(1000), &session).await.unwrap();
        assert_eq!(outcome, BackfillOutcome::Seeded(1));
        assert!(!session.lock().is_switching());
        assert_eq!(session.lock().state().unwrap().lines.entry, Some(99_000.0));
    }

    #[tokio::test]
    async fn test_duplicate_range_coalesces_within_debounce() {
        let session = session();
        let provider = CountingProvider { calls: Cell::new(0), fail: false };
        let mut backfiller = Backfiller::new(provider, Duration::from_secs(60));

        assert_eq!(
            backfiller.fill(range(1000), &session).await.unwrap(),
            BackfillOutcome::Seeded(1)
        );
        assert_eq!(
            backfiller.fill(range(1000), &session).await.unwrap(),
            BackfillOutcome::Coalesced
        );
        assert_eq!(backfiller.provider.calls.get(), 1);

        // A different range is a different key and goes out
        assert_eq!(
            backfiller.fill(range(5000), &session).await.unwrap(),
            BackfillOutcome::Seeded(1)
        );
        assert_eq!(backfiller.provider.calls.get(), 2);
    }

    #[tokio::test]
    async fn test_failure_surfaces_and_allows_explicit_retry() {
        let session = session();
        let provider = CountingProvider { calls: Cell::new(0), fail: true };
        let mut backfiller = Backfiller::new(provider, Duration::from_secs(60));

        let err = backfiller.fill(range(1000), &session).await.unwrap_err();
        assert!(matches!(err, LineaError::NoHistory(_)));
        // Live processing resumed despite the failure
        assert!(!session.lock().is_switching());

        // The same range retries immediately on explicit user action
        assert!(backfiller.fill(range(1000), &session).await.is_err());
        assert_eq!(backfiller.provider.calls.get(), 2);
    }
}
