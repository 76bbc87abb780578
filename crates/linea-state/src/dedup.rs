//! Bounded event deduplication
//!
//! The producer may deliver the same lifecycle event more than once
//! (reconnect replays, backfill overlapping the live stream). A bounded
//! insertion-ordered set keeps a recency window of seen ids without growing
//! forever.

use std::collections::{HashSet, VecDeque};

use linea_core::EventId;

/// Soft capacity before eviction kicks in
pub const DEDUP_CAPACITY: usize = 1000;
/// How many of the oldest ids one eviction removes
pub const DEDUP_EVICT_BATCH: usize = 200;

/// Bounded set of seen event ids, evicted oldest-first in batches
#[derive(Debug)]
pub struct EventDeduplicationFilter {
    seen: HashSet<EventId>,
    order: VecDeque<EventId>,
    capacity: usize,
    evict_batch: usize,
}

impl Default for EventDeduplicationFilter {
    fn default() -> Self {
        EventDeduplicationFilter::new()
    }
}

impl EventDeduplicationFilter {
    pub fn new() -> Self {
        Self::with_capacity(DEDUP_CAPACITY, DEDUP_EVICT_BATCH)
    }

    pub fn with_capacity(capacity: usize, evict_batch: usize) -> Self {
        EventDeduplicationFilter {
            seen: HashSet::with_capacity(capacity + 1),
            order: VecDeque::with_capacity(capacity + 1),
            capacity,
            evict_batch: evict_batch.max(1),
        }
    }

    /// Check without recording
    pub fn is_seen(&self, id: &EventId) -> bool {
        self.seen.contains(id)
    }

    /// Record an id and report whether it was already seen.
    /// Effectively atomic under single-threaded execution.
    pub fn record_and_check(&mut self, id: &EventId) -> bool {
        if self.seen.contains(id) {
            return true;
        }

        self.seen.insert(id.clone());
        self.order.push_back(id.clone());

        if self.order.len() > self.capacity {
            for _ in 0..self.evict_batch {
                let Some(oldest) = self.order.pop_front() else {
                    break;
                };
                self.seen.remove(&oldest);
            }
        }

        false
    }

    /// Forget everything, e.g. on strategy switch
    pub fn clear(&mut self) {
        self.seen.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
