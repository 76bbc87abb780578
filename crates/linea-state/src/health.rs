//! Liveness tracking, independent of line state
//!
//! Health is derived from heartbeat arrival times and the producer's own
//! liveness declaration. Staleness flips are visual-only: they never touch
//! the reconciled line values.

use std::time::Duration;

use linea_core::TimePoint;

/// A flip in observed liveness
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LivenessTransition {
    /// Heartbeats stopped arriving within the threshold
    Orphaned,
    /// Heartbeats resumed
    Recovered,
}

/// Derived liveness of the selected strategy instance
#[derive(Clone, Debug)]
pub struct HealthSnapshot {
    /// Producer-declared liveness from the most recent update
    pub is_alive: bool,
    /// True when heartbeats have gone quiet past the staleness threshold
    pub is_orphaned: bool,
    pub last_heartbeat: Option<TimePoint>,
}

impl Default for HealthSnapshot {
    fn default() -> Self {
        HealthSnapshot {
            is_alive: true,
            is_orphaned: false,
            last_heartbeat: None,
        }
    }
}

impl HealthSnapshot {
    pub fn new() -> Self {
        HealthSnapshot::default()
    }

    /// Record a heartbeat arrival. Refreshes the timestamp even when the
    /// reconciler later rejects the update for line purposes, and evaluates
    /// staleness opportunistically against the heartbeat's own timestamp.
    pub fn observe_heartbeat(
        &mut self,
        at: TimePoint,
        declared_alive: bool,
        threshold: Duration,
    ) -> Option<LivenessTransition> {
        self.is_alive = declared_alive;
        self.last_heartbeat = Some(match self.last_heartbeat {
            Some(previous) => previous.max(at),
            None => at,
        });
        self.evaluate(at, threshold)
    }

    /// Periodic staleness check. Returns a transition only on a flip from
    /// the previous orphaned value.
    pub fn evaluate(&mut self, now: TimePoint, threshold: Duration) -> Option<LivenessTransition> {
        let last = self.last_heartbeat?;
        let stale = now - last > threshold;
        if stale == self.is_orphaned {
            return None;
        }
        self.is_orphaned = stale;
        Some(if stale {
            LivenessTransition::Orphaned
        } else {
            LivenessTransition::Recovered
        })
    }
}
