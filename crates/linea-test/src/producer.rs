//! Scripted strategy producer
//!
//! Emits the same JSON frames a live backend broadcasts, on a deterministic
//! script: open a position, activate the trailing stop, trail it, close.
//! Supports offline windows (heartbeats suppressed while the strategy keeps
//! running internally) and restarts (fresh runtime id, sequence reset).

use chrono::{TimeZone, Utc};
use serde_json::json;

use linea_core::TimePoint;

/// Deterministic producer of heartbeat/event frames
pub struct ScriptedProducer {
    instance: String,
    runtime_id: String,
    generation: u32,
    seq: u64,
    event_counter: u64,
    clock: i64,
    // Position state mirrored into every frame
    entry: Option<f64>,
    stop: Option<f64>,
    target: Option<f64>,
    trailing_activation: Option<f64>,
    trailing_active: bool,
    offline_until: Option<i64>,
}

impl ScriptedProducer {
    pub fn new(instance: &str, start: TimePoint) -> Self {
        let generation = 1;
        ScriptedProducer {
            instance: instance.to_string(),
            runtime_id: format!("{instance}-host-{generation}-{}", start.as_secs()),
            generation,
            seq: 0,
            event_counter: 0,
            clock: start.as_secs(),
            entry: None,
            stop: None,
            target: None,
            trailing_activation: None,
            trailing_active: false,
            offline_until: None,
        }
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn runtime_id(&self) -> &str {
        &self.runtime_id
    }

    pub fn now(&self) -> TimePoint {
        TimePoint::from_secs(self.clock)
    }

    /// Advance the producer clock
    pub fn advance(&mut self, secs: i64) {
        self.clock += secs;
    }

    /// Simulate a backend restart: new runtime id, sequence reset, position
    /// state kept (the process reloaded it)
    pub fn restart(&mut self) {
        self.generation += 1;
        self.runtime_id = format!(
            "{}-host-{}-{}",
            self.instance, self.generation, self.clock
        );
        self.seq = 0;
    }

    /// Suppress heartbeats for a window; events keep flowing internally
    pub fn go_offline(&mut self, secs: i64) {
        self.offline_until = Some(self.clock + secs);
    }

    fn timestamp(&self) -> String {
        Utc.timestamp_opt(self.clock, 0)
            .single()
            .expect("scripted clock in range")
            .to_rfc3339()
    }

    fn next_state(&mut self) -> serde_json::Value {
        self.seq += 1;
        match self.entry {
            None => json!({ "seq": self.seq }),
            Some(entry) => json!({
                "SL": self.stop,
                "TP": self.target,
                "ENTRY": entry,
                "TSA": self.trailing_activation,
                "TRAILING_STOP_ACTIVE": self.trailing_active,
                "seq": self.seq,
            }),
        }
    }

    /// One heartbeat frame, or `None` while offline
    pub fn heartbeat(&mut self) -> Option<String> {
        if let Some(until) = self.offline_until {
            if self.clock < until {
                return None;
            }
            self.offline_until = None;
        }

        let frame = json!({
            "type": "strategy_heartbeat",
            "data": {
                "instance_name": self.instance,
                "instance_id": self.runtime_id,
                "heartbeat_at": self.timestamp(),
                "strategy_state": self.next_state(),
            }
        });
        Some(frame.to_string())
    }

    fn event(&mut self, position: &str, reason: &str, data: serde_json::Value) -> String {
        self.event_counter += 1;
        let event_id = format!(
            "{}_{}_{}",
            self.instance,
            self.event_counter,
            self.clock * 1000
        );
        let frame = json!({
            "type": "strategy_event",
            "data": {
                "event_id": event_id,
                "event_time": self.timestamp(),
                "strategy_instance_id": self.instance,
                "instance_name": self.instance,
                "position": position,
                "reason": reason,
                "strategy_state": self.next_state(),
                "event_data": data,
            }
        });
        frame.to_string()
    }

    /// Open a position
    pub fn open(&mut self, entry: f64, stop: f64, target: f64, trailing_activation: f64) -> String {
        self.entry = Some(entry);
        self.stop = Some(stop);
        self.target = Some(target);
        self.trailing_activation = Some(trailing_activation);
        self.trailing_active = false;
        self.event(
            "OPEN",
            "SIGNAL_DETECTED",
            json!({ "entry_price": entry, "stop_loss_price": stop }),
        )
    }

    /// Price crossed the activation level: trailing begins
    pub fn activate_trailing(&mut self, new_stop: f64, price: f64) -> String {
        self.trailing_active = true;
        self.stop = Some(new_stop);
        self.event(
            "UPDATE",
            "TRAILING_STOP_ACTIVATED",
            json!({ "stop_loss_price": new_stop, "current_price": price }),
        )
    }

    /// Peak moved; the stop trails it
    pub fn trail(&mut self, new_stop: f64, price: f64) -> String {
        self.stop = Some(new_stop);
        self.event(
            "UPDATE",
            "TRAILING_STOP_UPDATED",
            json!({ "stop_loss_price": new_stop, "current_price": price }),
        )
    }

    /// Close the position and return to the flat state
    pub fn close(&mut self, price: f64, reason: &str) -> String {
        self.entry = None;
        self.stop = None;
        self.target = None;
        self.trailing_activation = None;
        self.trailing_active = false;
        self.event("CLOSE", reason, json!({ "current_price": price }))
    }
}
