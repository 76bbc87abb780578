//! Inbound feed decoding
//!
//! The producer broadcasts JSON envelopes over its push channel. Two types
//! matter here - `strategy_heartbeat` and `strategy_event` - everything
//! else on the channel (ticks, predictions) is not ours and is ignored.
//! A frame that fails to decode is dropped whole: no partial application.

use chrono::DateTime;
use serde::Deserialize;

use linea_core::{
    EventDetail, EventId, InstanceName, LineSet, LineaError, LineaResult, PositionAction,
    RuntimeId, StrategyUpdate, TimePoint,
};

/// Wire shape of the producer's strategy state block
#[derive(Debug, Default, Deserialize)]
pub struct StrategyStateFrame {
    #[serde(rename = "SL")]
    pub stop_loss: Option<f64>,
    #[serde(rename = "TP")]
    pub target: Option<f64>,
    #[serde(rename = "ENTRY")]
    pub entry: Option<f64>,
    #[serde(rename = "TSA")]
    pub trailing_activation: Option<f64>,
    #[serde(rename = "TRAILING_STOP_ACTIVE", default)]
    pub trailing_active: bool,
    pub seq: Option<u64>,
}

impl StrategyStateFrame {
    fn into_lines(self) -> LineSet {
        LineSet {
            stop_loss: self.stop_loss,
            target: self.target,
            entry: self.entry,
            trailing_activation: self.trailing_activation,
            trailing_active: self.trailing_active,
        }
    }
}

/// Wire shape of one heartbeat
#[derive(Debug, Deserialize)]
pub struct HeartbeatFrame {
    pub instance_name: String,
    /// Producer generation token
    pub instance_id: Option<String>,
    pub heartbeat_at: String,
    #[serde(default)]
    pub strategy_state: StrategyStateFrame,
}

/// Optional per-event payload; only the price fields matter here
#[derive(Debug, Default, Deserialize)]
pub struct EventDataFrame {
    pub entry_price: Option<f64>,
    pub current_price: Option<f64>,
    pub stop_loss_price: Option<f64>,
}

/// Wire shape of one lifecycle event
#[derive(Debug, Deserialize)]
pub struct EventFrame {
    pub event_id: String,
    pub event_time: String,
    pub instance_name: String,
    pub position: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub strategy_state: StrategyStateFrame,
    #[serde(default)]
    pub event_data: Option<EventDataFrame>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "data")]
enum FeedEnvelope {
    #[serde(rename = "strategy_heartbeat")]
    Heartbeat(HeartbeatFrame),
    #[serde(rename = "strategy_event")]
    Event(EventFrame),
    #[serde(other)]
    Other,
}

/// Parse an RFC 3339 timestamp to a `TimePoint`. Returns `None` for
/// anything unparseable; the caller decides whether that drops the frame or
/// just the point.
pub fn parse_timestamp(s: &str) -> Option<TimePoint> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| TimePoint::from_secs(dt.timestamp()))
}

/// Decode one raw feed message.
///
/// `Ok(None)` means the message was well-formed but not a strategy update.
/// `Err` means a strategy frame violated the schema and was dropped whole.
pub fn decode_feed(raw: &str) -> LineaResult<Option<StrategyUpdate>> {
    let envelope: FeedEnvelope = serde_json::from_str(raw)
        .map_err(|err| LineaError::MalformedUpdate(err.to_string()))?;

    match envelope {
        FeedEnvelope::Heartbeat(frame) => {
            let timestamp = parse_timestamp(&frame.heartbeat_at).ok_or_else(|| {
                LineaError::UnparseableTimestamp(frame.heartbeat_at.clone())
            })?;
            let seq = frame.strategy_state.seq;
            let mut update = StrategyUpdate::heartbeat(
                InstanceName::new(frame.instance_name),
                timestamp,
                frame.strategy_state.into_lines(),
            );
            if let Some(runtime_id) = frame.instance_id {
                update = update.with_runtime_id(RuntimeId::new(runtime_id));
            }
            if let Some(seq) = seq {
                update = update.with_seq(seq);
            }
            Ok(Some(update))
        }
        FeedEnvelope::Event(frame) => {
            let timestamp = parse_timestamp(&frame.event_time)
                .ok_or_else(|| LineaError::UnparseableTimestamp(frame.event_time.clone()))?;
            let action = PositionAction::from_wire(&frame.position).ok_or_else(|| {
                LineaError::MalformedUpdate(format!("unknown position: {}", frame.position))
            })?;

            let data = frame.event_data.unwrap_or_default();
            let price = data
                .current_price
                .or(data.entry_price)
                .or(data.stop_loss_price);

            let detail = EventDetail {
                id: EventId::new(frame.event_id),
                action,
                reason: frame.reason.unwrap_or_default(),
                price,
            };

            let seq = frame.strategy_state.seq;
            let mut update = StrategyUpdate::event(
                InstanceName::new(frame.instance_name),
                timestamp,
                frame.strategy_state.into_lines(),
                detail,
            );
            if let Some(seq) = seq {
                update = update.with_seq(seq);
            }
            Ok(Some(update))
        }
        FeedEnvelope::Other => Ok(None),
    }
}
