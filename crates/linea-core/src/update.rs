//! Strategy update model
//!
//! Updates arrive on two independent streams describing the same entity:
//! periodic heartbeats and discrete lifecycle events. Both normalize into a
//! `StrategyUpdate` with an explicit source discriminant so downstream code
//! matches exhaustively instead of sniffing payload shapes.

use crate::{EventId, InstanceName, LineSet, RuntimeId, TimePoint};

/// Which stream an update came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateSource {
    /// Periodic liveness broadcast carrying the full present state
    Heartbeat,
    /// Discrete, uniquely-identified lifecycle notification
    Event,
}

/// Position lifecycle action carried by a discrete event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PositionAction {
    Open,
    Close,
    Update,
}

impl PositionAction {
    /// Parse the producer's wire spelling
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(PositionAction::Open),
            "CLOSE" => Some(PositionAction::Close),
            "UPDATE" => Some(PositionAction::Update),
            _ => None,
        }
    }
}

/// Discrete-event payload attached to an update from the event stream
#[derive(Clone, Debug)]
pub struct EventDetail {
    pub id: EventId,
    pub action: PositionAction,
    /// Producer-supplied reason tag (SIGNAL_DETECTED, STOP_LOSS_HIT, ...)
    pub reason: String,
    /// Price the event happened at, when the producer reported one
    pub price: Option<f64>,
}

/// One inbound update, either stream
#[derive(Clone, Debug)]
pub struct StrategyUpdate {
    pub source: UpdateSource,
    pub instance: InstanceName,
    /// Producer-generation token; changes when the backend restarts
    pub runtime_id: Option<RuntimeId>,
    /// Monotonic counter within one runtime generation
    pub seq: Option<u64>,
    pub timestamp: TimePoint,
    pub lines: LineSet,
    /// Producer-declared liveness
    pub is_alive: bool,
    /// Present only for `UpdateSource::Event`
    pub event: Option<EventDetail>,
}

impl StrategyUpdate {
    /// Create a heartbeat update
    pub fn heartbeat(instance: InstanceName, timestamp: TimePoint, lines: LineSet) -> Self {
        StrategyUpdate {
            source: UpdateSource::Heartbeat,
            instance,
            runtime_id: None,
            seq: None,
            timestamp,
            lines,
            is_alive: true,
            event: None,
        }
    }

    /// Create a lifecycle event update
    pub fn event(
        instance: InstanceName,
        timestamp: TimePoint,
        lines: LineSet,
        detail: EventDetail,
    ) -> Self {
        StrategyUpdate {
            source: UpdateSource::Event,
            instance,
            runtime_id: None,
            seq: None,
            timestamp,
            lines,
            is_alive: true,
            event: Some(detail),
        }
    }

    /// Attach the producer generation token
    pub fn with_runtime_id(mut self, runtime_id: RuntimeId) -> Self {
        self.runtime_id = Some(runtime_id);
        self
    }

    /// Attach the in-generation sequence counter
    pub fn with_seq(mut self, seq: u64) -> Self {
        self.seq = Some(seq);
        self
    }

    /// Override the declared liveness
    pub fn with_liveness(mut self, is_alive: bool) -> Self {
        self.is_alive = is_alive;
        self
    }
}

/// Result of offering an update to the reconciler
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Update became the reconciled state
    Accepted,
    /// Explicit no-position update forced a cleared state
    Cleared,
    /// Update was dropped; the reason says why
    Rejected(RejectReason),
}

impl UpdateOutcome {
    #[inline]
    pub fn is_rejected(self) -> bool {
        matches!(self, UpdateOutcome::Rejected(_))
    }
}

/// Why an update was dropped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Different runtime generation with an older timestamp (restart artifact)
    StaleRestart,
    /// Same generation, sequence not ahead of the reconciled one
    DuplicateSequence,
    /// Timestamp behind the reconciled state
    StaleTimestamp,
    /// Values identical to the reconciled state (redraw suppression)
    UnchangedLines,
    /// Schema violation; nothing was applied
    Malformed,
    /// Event id already seen by the dedup filter
    DuplicateEvent,
    /// Live update arrived while a strategy switch was in progress
    SwitchInProgress,
    /// Update names an instance other than the active selection
    WrongInstance,
}
