//! Linea Time - Temporal coordinate normalization
//!
//! This crate translates absolute UTC timestamps into a chosen display
//! timezone so price bars and strategy markers stay correctly ordered,
//! de-duplicated across daylight-saving transitions, and aligned to the
//! fixed-width buckets a UTC-native rendering surface expects.

pub mod normalizer;

pub use normalizer::*;
