//! State reconciliation pipeline

use linea_core::{
    LineSet, RejectReason, RuntimeId, StrategyUpdate, TimePoint, UpdateOutcome, UpdateSource,
};

/// The single canonical record of a strategy's present line state.
/// Exclusively owned by the reconciler and overwritten in place on
/// acceptance; its timestamp never decreases once set.
#[derive(Clone, Debug)]
pub struct ReconciledState {
    pub lines: LineSet,
    pub runtime_id: Option<RuntimeId>,
    pub seq: Option<u64>,
    pub timestamp: TimePoint,
    pub source: UpdateSource,
    /// Declared liveness of the update before this one
    pub previous_is_alive: bool,
}

/// Tally of reconciliation outcomes
#[derive(Debug, Default, Clone)]
pub struct ReconcileStats {
    pub accepted: u64,
    pub cleared: u64,
    pub rejected: u64,
    pub malformed: u64,
}

/// Resolves conflicting updates into one canonical state.
///
/// Ordering rules are applied first-match-wins:
/// 1. Generation check - a changed runtime id means the backend restarted;
///    only the timestamp orders across generations.
/// 2. Sequence check - within one generation, a non-advancing sequence is a
///    duplicate or reorder.
/// 3. Timestamp fallback - older timestamps lose.
/// 4. Bootstrap - with no lines held, anything ordered is accepted.
/// 5. Changed-value suppression - identical values are a redraw no-op.
///
/// The explicit-clear path (an entirely empty line set) bypasses ordering
/// and always wins: the producer is declaring "no position" as present
/// truth.
#[derive(Debug, Default)]
pub struct StateReconciler {
    state: Option<ReconciledState>,
    last_is_alive: bool,
    stats: ReconcileStats,
}

impl StateReconciler {
    pub fn new() -> Self {
        StateReconciler {
            state: None,
            last_is_alive: true,
            stats: ReconcileStats::default(),
        }
    }

    /// Current reconciled state, if any update has been accepted
    pub fn state(&self) -> Option<&ReconciledState> {
        self.state.as_ref()
    }

    /// Outcome counters since the last reset
    pub fn stats(&self) -> &ReconcileStats {
        &self.stats
    }

    /// Drop all state, e.g. on strategy switch or deselection
    pub fn reset(&mut self) {
        self.state = None;
        self.last_is_alive = true;
    }

    /// Offer an update. Never panics, never partially applies: the update is
    /// either installed as the new canonical state, installed as a cleared
    /// state, or dropped with a reason.
    pub fn accept(&mut self, update: &StrategyUpdate) -> UpdateOutcome {
        if let Err(err) = update.lines.validate() {
            tracing::warn!(instance = %update.instance, "dropping malformed update: {err}");
            self.stats.malformed += 1;
            return UpdateOutcome::Rejected(RejectReason::Malformed);
        }

        // Explicit "no position": bypasses ordering entirely
        if update.lines.is_empty() {
            self.apply(update, LineSet::new());
            self.stats.cleared += 1;
            return UpdateOutcome::Cleared;
        }

        if let Some(current) = &self.state {
            // Generation check: restarts order by timestamp alone
            if let (Some(incoming), Some(held)) = (&update.runtime_id, &current.runtime_id) {
                if incoming != held {
                    return if update.timestamp >= current.timestamp {
                        self.apply(update, update.lines.clone());
                        self.stats.accepted += 1;
                        UpdateOutcome::Accepted
                    } else {
                        self.stats.rejected += 1;
                        UpdateOutcome::Rejected(RejectReason::StaleRestart)
                    };
                }
            }

            // Sequence check within the generation
            if let (Some(incoming), Some(held)) = (update.seq, current.seq) {
                if incoming <= held {
                    self.stats.rejected += 1;
                    return UpdateOutcome::Rejected(RejectReason::DuplicateSequence);
                }
            }

            // Timestamp fallback
            if update.timestamp < current.timestamp {
                self.stats.rejected += 1;
                return UpdateOutcome::Rejected(RejectReason::StaleTimestamp);
            }

            // Bootstrap after a clear: nothing held, skip the diff
            if current.lines.is_empty() {
                self.apply(update, update.lines.clone());
                self.stats.accepted += 1;
                return UpdateOutcome::Accepted;
            }

            // Changed-value suppression
            if update.lines.differs_from(&current.lines) {
                self.apply(update, update.lines.clone());
                self.stats.accepted += 1;
                UpdateOutcome::Accepted
            } else {
                self.stats.rejected += 1;
                UpdateOutcome::Rejected(RejectReason::UnchangedLines)
            }
        } else {
            // Bootstrap: nothing held at all
            self.apply(update, update.lines.clone());
            self.stats.accepted += 1;
            UpdateOutcome::Accepted
        }
    }

    fn apply(&mut self, update: &StrategyUpdate, lines: LineSet) {
        let previous_is_alive = self.last_is_alive;
        self.last_is_alive = update.is_alive;
        let held = self.state.take();

        // Events do not carry the generation token on the wire; an accepted
        // update without one inherits the held generation, and its sequence
        // only carries forward within that same generation.
        let same_generation = match (
            update.runtime_id.as_ref(),
            held.as_ref().and_then(|s| s.runtime_id.as_ref()),
        ) {
            (Some(incoming), Some(current)) => incoming == current,
            _ => true,
        };
        let runtime_id = update
            .runtime_id
            .clone()
            .or_else(|| held.as_ref().and_then(|s| s.runtime_id.clone()));
        let seq = match update.seq {
            Some(seq) => Some(seq),
            None if same_generation => held.as_ref().and_then(|s| s.seq),
            None => None,
        };
        // The explicit-clear path bypasses ordering, so clamp to keep the
        // post-acceptance timestamp monotonic
        let timestamp = match &held {
            Some(current) => current.timestamp.max(update.timestamp),
            None => update.timestamp,
        };

        self.state = Some(ReconciledState {
            lines,
            runtime_id,
            seq,
            timestamp,
            source: update.source,
            previous_is_alive,
        });
    }
}
