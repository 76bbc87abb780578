//! Time primitives for linea
//!
//! All inbound timestamps resolve to a `TimePoint`: an absolute UTC instant
//! in whole seconds, matching the axis unit of the rendering surface.
//! Display-zone adjustment happens later, in the temporal normalizer.

use std::ops::{Add, Sub};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Absolute UTC instant, seconds since the Unix epoch
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimePoint(pub i64);

impl TimePoint {
    pub const ZERO: TimePoint = TimePoint(0);
    pub const MAX: TimePoint = TimePoint(i64::MAX);

    #[inline]
    pub fn from_secs(secs: i64) -> Self {
        TimePoint(secs)
    }

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        TimePoint(millis.div_euclid(1000))
    }

    /// Current wall-clock time
    pub fn now() -> Self {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        TimePoint(elapsed.as_secs() as i64)
    }

    #[inline]
    pub fn as_secs(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0.saturating_mul(1000)
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        TimePoint(self.0.saturating_add(duration.as_secs() as i64))
    }

    #[inline]
    pub fn saturating_sub(self, duration: Duration) -> Self {
        TimePoint(self.0.saturating_sub(duration.as_secs() as i64))
    }

    /// Shift along the display axis by a signed number of seconds
    #[inline]
    pub fn offset_by(self, secs: i64) -> Self {
        TimePoint(self.0.saturating_add(secs))
    }

    /// Snap to the start of the containing fixed-width bucket.
    /// Idempotent: aligning an aligned point is the identity.
    #[inline]
    pub fn align_to_bucket(self, width: BucketWidth) -> Self {
        let w = i64::from(width.as_secs());
        if w <= 0 {
            return self;
        }
        TimePoint(self.0.div_euclid(w) * w)
    }
}

impl Add<Duration> for TimePoint {
    type Output = TimePoint;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        TimePoint(self.0 + rhs.as_secs() as i64)
    }
}

impl Sub<Duration> for TimePoint {
    type Output = TimePoint;

    #[inline]
    fn sub(self, rhs: Duration) -> Self::Output {
        TimePoint(self.0 - rhs.as_secs() as i64)
    }
}

impl Sub<TimePoint> for TimePoint {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: TimePoint) -> Self::Output {
        let diff = self.0 - rhs.0;
        if diff >= 0 {
            Duration::from_secs(diff as u64)
        } else {
            Duration::ZERO
        }
    }
}

impl std::fmt::Debug for TimePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t({}s)", self.0)
    }
}

/// Width of one chart bar bucket, in seconds
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BucketWidth(pub u32);

impl BucketWidth {
    pub const ONE_MINUTE: BucketWidth = BucketWidth(60);
    pub const ONE_HOUR: BucketWidth = BucketWidth(3600);

    #[inline]
    pub fn from_secs(secs: u32) -> Self {
        BucketWidth(secs)
    }

    #[inline]
    pub fn as_secs(self) -> u32 {
        self.0
    }
}

/// Anything positioned on the time axis that the normalizer can relocate
pub trait TimeShifted {
    fn time(&self) -> TimePoint;
    fn shift_to(&mut self, time: TimePoint);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bucket_alignment_floors() {
        let t = TimePoint::from_secs(3725);
        assert_eq!(t.align_to_bucket(BucketWidth::ONE_MINUTE), TimePoint::from_secs(3720));
        assert_eq!(t.align_to_bucket(BucketWidth::ONE_HOUR), TimePoint::from_secs(3600));
    }

    #[test]
    fn test_bucket_alignment_negative_times() {
        // Pre-epoch instants still floor toward the bucket start
        let t = TimePoint::from_secs(-61);
        assert_eq!(t.align_to_bucket(BucketWidth::ONE_MINUTE), TimePoint::from_secs(-120));
    }

    #[test]
    fn test_time_point_sub_clamps() {
        let a = TimePoint::from_secs(100);
        let b = TimePoint::from_secs(130);
        assert_eq!(b - a, Duration::from_secs(30));
        assert_eq!(a - b, Duration::ZERO);
    }

    proptest! {
        #[test]
        fn prop_bucket_alignment_idempotent(secs in -4_000_000_000i64..4_000_000_000i64, width in 1u32..86_400) {
            let w = BucketWidth::from_secs(width);
            let aligned = TimePoint::from_secs(secs).align_to_bucket(w);
            prop_assert_eq!(aligned.align_to_bucket(w), aligned);
            prop_assert!(aligned <= TimePoint::from_secs(secs));
        }
    }
}
