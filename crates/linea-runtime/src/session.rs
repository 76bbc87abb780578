//! Strategy session - the sole mutator of reconciled state
//!
//! All reconciliation, staleness evaluation, and normalization run on one
//! logical thread; "concurrent" updates are serialized by arrival order into
//! `handle_update`. A transition flag suppresses live mutation while a
//! strategy switch is in progress - those updates are dropped, not queued,
//! because the subsequent backfill reseeds from the authoritative source.

use linea_core::{
    InstanceName, RejectReason, StrategyUpdate, TimePoint, UpdateOutcome, UpdateSource,
};
use linea_state::{
    EventDeduplicationFilter, HealthSnapshot, LivenessTransition, ReconciledState, StateReconciler,
};
use linea_time::TemporalNormalizer;
use linea_visual::{MarkerCoordinator, PointMarker, RenderSurface};

use crate::{decode_feed, SessionConfig};

/// Counters over a session's lifetime
#[derive(Clone, Debug, Default)]
pub struct SessionStats {
    pub heartbeats: u64,
    pub events: u64,
    pub accepted: u64,
    pub cleared: u64,
    pub rejected: u64,
    pub duplicates: u64,
    pub malformed: u64,
    pub dropped_in_transition: u64,
    pub liveness_flips: u64,
}

/// One active strategy selection and everything scoped to it
pub struct StrategySession<S: RenderSurface> {
    config: SessionConfig,
    instance: Option<InstanceName>,
    reconciler: StateReconciler,
    health: HealthSnapshot,
    dedup: EventDeduplicationFilter,
    normalizer: TemporalNormalizer,
    coordinator: MarkerCoordinator<S>,
    /// Raised by `select`, lowered when backfill reseeds (or fails)
    switching: bool,
    stats: SessionStats,
}

impl<S: RenderSurface> StrategySession<S> {
    pub fn new(config: SessionConfig, surface: S) -> Self {
        let mut normalizer = TemporalNormalizer::new(config.display_mode);
        normalizer.set_bucket(config.bucket_width);
        StrategySession {
            config,
            instance: None,
            reconciler: StateReconciler::new(),
            health: HealthSnapshot::new(),
            dedup: EventDeduplicationFilter::new(),
            normalizer,
            coordinator: MarkerCoordinator::new(surface),
            switching: false,
            stats: SessionStats::default(),
        }
    }

    pub fn selected(&self) -> Option<&InstanceName> {
        self.instance.as_ref()
    }

    pub fn state(&self) -> Option<&ReconciledState> {
        self.reconciler.state()
    }

    pub fn health(&self) -> &HealthSnapshot {
        &self.health
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn is_switching(&self) -> bool {
        self.switching
    }

    pub fn surface(&self) -> &S {
        self.coordinator.surface()
    }

    /// Select a strategy instance. Everything scoped to the previous
    /// selection is destroyed; live updates are suppressed until
    /// `seed_history` (or `resume_live`) completes the switch. The caller
    /// restarts the staleness monitor around this (stop-before-start).
    pub fn select(&mut self, instance: InstanceName) {
        tracing::debug!(%instance, "strategy selected");
        self.instance = Some(instance);
        self.switching = true;
        self.reconciler.reset();
        self.dedup.clear();
        self.health = HealthSnapshot::new();
        self.coordinator.clear();
    }

    /// Drop the selection entirely
    pub fn deselect(&mut self) {
        self.instance = None;
        self.switching = false;
        self.reconciler.reset();
        self.dedup.clear();
        self.health = HealthSnapshot::new();
        self.coordinator.clear();
    }

    /// Decode and process one raw feed message. Returns `None` for messages
    /// that are not strategy updates.
    pub fn handle_raw(&mut self, raw: &str) -> Option<UpdateOutcome> {
        match decode_feed(raw) {
            Ok(Some(update)) => Some(self.handle_update(update)),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!("dropping undecodable feed message: {err}");
                self.stats.malformed += 1;
                Some(UpdateOutcome::Rejected(RejectReason::Malformed))
            }
        }
    }

    /// Process one decoded update. Fully consumes it: accepted, cleared, or
    /// rejected with a reason - never a panic, never a retry.
    pub fn handle_update(&mut self, update: StrategyUpdate) -> UpdateOutcome {
        let Some(selected) = self.instance.clone() else {
            return UpdateOutcome::Rejected(RejectReason::WrongInstance);
        };
        if update.instance != selected {
            return UpdateOutcome::Rejected(RejectReason::WrongInstance);
        }

        if self.switching {
            self.stats.dropped_in_transition += 1;
            return UpdateOutcome::Rejected(RejectReason::SwitchInProgress);
        }

        match update.source {
            UpdateSource::Heartbeat => {
                self.stats.heartbeats += 1;
                // Health refreshes even when the reconciler rejects below
                if let Some(transition) = self.health.observe_heartbeat(
                    update.timestamp,
                    update.is_alive,
                    self.config.staleness_threshold,
                ) {
                    self.on_liveness(transition);
                }
            }
            UpdateSource::Event => self.stats.events += 1,
        }

        if let Some(detail) = &update.event {
            if self.dedup.record_and_check(&detail.id) {
                self.stats.duplicates += 1;
                return UpdateOutcome::Rejected(RejectReason::DuplicateEvent);
            }
        }

        let outcome = self.reconciler.accept(&update);
        match outcome {
            UpdateOutcome::Accepted => {
                self.stats.accepted += 1;
                self.refresh_line_colors();
            }
            UpdateOutcome::Cleared => {
                self.stats.cleared += 1;
                self.coordinator.clear_lines();
            }
            UpdateOutcome::Rejected(reason) => {
                // Expected under normal operation; dropped silently
                self.stats.rejected += 1;
                tracing::debug!(?reason, "update dropped");
            }
        }

        // A well-formed, non-duplicate event leaves a marker regardless of
        // what the reconciler decided about the lines
        if outcome != UpdateOutcome::Rejected(RejectReason::Malformed) {
            if let Some(detail) = &update.event {
                if let Some(price) = detail.price.or(update.lines.entry) {
                    let time = self.normalizer.place(update.timestamp);
                    self.coordinator
                        .upsert_marker(PointMarker::from_event(detail, time, price));
                    self.coordinator.commit_markers();
                }
            }
        }

        outcome
    }

    /// Reseed from historic backfill and resume live processing. Events run
    /// through the same dedup + reconciliation path as live updates, oldest
    /// first, and the resulting markers go out as one batch.
    pub fn seed_history(&mut self, mut events: Vec<StrategyUpdate>) {
        let Some(selected) = self.instance.clone() else {
            return;
        };

        events.sort_by_key(|update| update.timestamp);
        for update in events {
            if update.instance != selected {
                continue;
            }
            if update.lines.validate().is_err() {
                self.stats.malformed += 1;
                continue;
            }
            let Some(detail) = update.event.clone() else {
                continue;
            };
            if self.dedup.record_and_check(&detail.id) {
                self.stats.duplicates += 1;
                continue;
            }
            let _ = self.reconciler.accept(&update);
            if let Some(price) = detail.price.or(update.lines.entry) {
                let time = self.normalizer.place(update.timestamp);
                self.coordinator
                    .upsert_marker(PointMarker::from_event(&detail, time, price));
            }
        }

        self.switching = false;
        self.refresh_line_colors();
        self.coordinator.commit_markers();
    }

    /// Lower the transition flag without seeding, e.g. when backfill failed
    /// and the user chose to continue live
    pub fn resume_live(&mut self) {
        self.switching = false;
    }

    /// Periodic staleness check; also invoked opportunistically via
    /// heartbeat arrival. Visual-only: a flip recolors, never moves lines.
    pub fn evaluate_staleness(&mut self, now: TimePoint) {
        if let Some(transition) = self
            .health
            .evaluate(now, self.config.staleness_threshold)
        {
            self.on_liveness(transition);
        }
    }

    fn on_liveness(&mut self, transition: LivenessTransition) {
        self.stats.liveness_flips += 1;
        tracing::debug!(?transition, "liveness transition");
        self.refresh_line_colors();
    }

    fn refresh_line_colors(&mut self) {
        if let Some(state) = self.reconciler.state() {
            let lines = state.lines.clone();
            self.coordinator.sync_lines(&lines, &self.health);
        }
    }
}
