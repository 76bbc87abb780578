//! Identity types for linea
//!
//! Identifiers arrive as opaque strings from the producer; marker ids are
//! derived 64-bit hashes so reprocessed events land on the same visual
//! entity.

use std::fmt;

/// Strategy instance identity - the name a producer registers under
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct InstanceName(pub String);

impl InstanceName {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        InstanceName(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for InstanceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}

impl fmt::Display for InstanceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Runtime generation token - one continuous producer execution.
/// Opaque to the consumer; changes whenever the backend restarts.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct RuntimeId(pub String);

impl RuntimeId {
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        RuntimeId(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RuntimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime({})", self.0)
    }
}

impl fmt::Display for RuntimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle event identity - unique per discrete event
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct EventId(pub String);

impl EventId {
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        EventId(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event({})", self.0)
    }
}

/// Marker identity - stable synthetic id derived from an event id
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MarkerId(pub u64);

impl MarkerId {
    #[inline]
    pub fn new(id: u64) -> Self {
        MarkerId(id)
    }

    /// Derive a marker id from an event id (FNV-1a over the id bytes).
    /// The same event always maps to the same marker, so reprocessing a
    /// duplicate delivery cannot spawn a second marker.
    pub fn from_event(event_id: &EventId) -> Self {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in event_id.0.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        MarkerId(hash)
    }
}

impl fmt::Debug for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Marker({:016x})", self.0)
    }
}
