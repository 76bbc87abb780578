//! Display-zone shifting, DST dedup, and bucket alignment

use chrono::{Offset, TimeZone};
use chrono_tz::Tz;

use linea_core::{BucketWidth, LineaError, LineaResult, TimePoint, TimeShifted};

const SECS_PER_DAY: i64 = 86_400;

/// Which axis the rendering surface should display time on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    /// No shift; the source axis is already what the surface shows
    Utc,
    /// The machine's local zone
    Local,
    /// A named IANA zone
    Named(Tz),
}

impl DisplayMode {
    /// Parse a configured mode string. `"UTC"` and `"Local"` are keywords;
    /// anything else must be a valid IANA zone name.
    pub fn parse(s: &str) -> LineaResult<DisplayMode> {
        match s {
            "UTC" | "utc" => Ok(DisplayMode::Utc),
            "Local" | "local" => Ok(DisplayMode::Local),
            name => name
                .parse::<Tz>()
                .map(DisplayMode::Named)
                .map_err(|_| LineaError::TimezoneLookup(format!("unknown zone: {name}"))),
        }
    }
}

/// A plain time/value pair, the shape of one bar of a price series
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesPoint {
    pub time: TimePoint,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(time: TimePoint, value: f64) -> Self {
        SeriesPoint { time, value }
    }
}

impl TimeShifted for SeriesPoint {
    fn time(&self) -> TimePoint {
        self.time
    }

    fn shift_to(&mut self, time: TimePoint) {
        self.time = time;
    }
}

#[derive(Clone, Copy, Debug)]
struct DayOffset {
    /// Local calendar-day index (days since epoch, display zone)
    day: i64,
    /// Display-zone offset from UTC in seconds (local minus UTC)
    offset_secs: i64,
}

/// Shifts series and single points onto the display axis.
///
/// The UTC offset is recomputed only when a point's calendar-day key under
/// the display zone changes, which amortizes zone lookups and captures DST
/// boundary shifts as the series crosses them. A fall-back transition can
/// make the shifted axis non-monotonic (the repeated local hour), so full
/// series are re-sorted and adjacent equal timestamps collapsed, keeping
/// the later original element.
#[derive(Debug)]
pub struct TemporalNormalizer {
    mode: DisplayMode,
    bucket: Option<BucketWidth>,
    cache: Option<DayOffset>,
    lookup_warned: bool,
}

impl TemporalNormalizer {
    pub fn new(mode: DisplayMode) -> Self {
        TemporalNormalizer {
            mode,
            bucket: None,
            cache: None,
            lookup_warned: false,
        }
    }

    /// Enable bucket alignment at the given width
    pub fn with_bucket(mut self, width: BucketWidth) -> Self {
        self.bucket = Some(width);
        self
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Change the bucket width (e.g. the user switched display interval)
    pub fn set_bucket(&mut self, width: Option<BucketWidth>) {
        self.bucket = width;
    }

    /// Shift a whole series onto the display axis: strictly ascending
    /// output, length less than or equal to the input. Identity in UTC mode.
    pub fn shift_series<P: TimeShifted>(&mut self, mut points: Vec<P>) -> Vec<P> {
        if self.mode == DisplayMode::Utc {
            return points;
        }

        for point in &mut points {
            let t = point.time();
            point.shift_to(t.offset_by(self.offset_for(t)));
        }

        // A fall-back boundary can invert local order; stable sort keeps
        // original arrival order among equals so the later element survives
        // the collapse below.
        points.sort_by_key(|p| p.time());

        let mut out: Vec<P> = Vec::with_capacity(points.len());
        for point in points {
            match out.last_mut() {
                Some(last) if last.time() == point.time() => *last = point,
                _ => out.push(point),
            }
        }
        out
    }

    /// Shift one streaming point using the same cached offset, without the
    /// sort/dedup pass.
    pub fn shift_point(&mut self, t: TimePoint) -> TimePoint {
        if self.mode == DisplayMode::Utc {
            return t;
        }
        t.offset_by(self.offset_for(t))
    }

    /// Snap to the containing bucket when alignment is enabled
    pub fn align(&self, t: TimePoint) -> TimePoint {
        match self.bucket {
            Some(width) => t.align_to_bucket(width),
            None => t,
        }
    }

    /// Shift and align one point - the placement used for markers
    pub fn place(&mut self, t: TimePoint) -> TimePoint {
        let shifted = self.shift_point(t);
        self.align(shifted)
    }

    /// Offset for `t`, reusing the cached value while the calendar-day key
    /// is unchanged.
    fn offset_for(&mut self, t: TimePoint) -> i64 {
        if let Some(cached) = self.cache {
            let day = (t.as_secs() + cached.offset_secs).div_euclid(SECS_PER_DAY);
            if day == cached.day {
                return cached.offset_secs;
            }
        }

        let offset_secs = self.zone_offset(t);
        let day = (t.as_secs() + offset_secs).div_euclid(SECS_PER_DAY);
        self.cache = Some(DayOffset { day, offset_secs });
        offset_secs
    }

    /// Full zone lookup. A failed lookup falls back to zero offset for the
    /// point and is logged once.
    fn zone_offset(&mut self, t: TimePoint) -> i64 {
        let secs = t.as_secs();
        let offset = match self.mode {
            DisplayMode::Utc => Some(0),
            DisplayMode::Local => chrono::Local
                .timestamp_opt(secs, 0)
                .single()
                .map(|dt| i64::from(dt.offset().fix().local_minus_utc())),
            DisplayMode::Named(tz) => tz
                .timestamp_opt(secs, 0)
                .single()
                .map(|dt| i64::from(dt.offset().fix().local_minus_utc())),
        };

        match offset {
            Some(offset) => offset,
            None => {
                if !self.lookup_warned {
                    tracing::warn!(timestamp = secs, "zone lookup failed, using zero offset");
                    self.lookup_warned = true;
                }
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn series(times: &[i64]) -> Vec<SeriesPoint> {
        times
            .iter()
            .enumerate()
            .map(|(i, &t)| SeriesPoint::new(TimePoint::from_secs(t), i as f64))
            .collect()
    }

    fn new_york() -> TemporalNormalizer {
        TemporalNormalizer::new(DisplayMode::Named(chrono_tz::America::New_York))
    }

    #[test]
    fn test_utc_mode_is_identity() {
        let mut normalizer = TemporalNormalizer::new(DisplayMode::Utc);
        let input = series(&[100, 200, 300]);
        let output = normalizer.shift_series(input.clone());
        assert_eq!(output, input);
        assert_eq!(
            normalizer.shift_point(TimePoint::from_secs(12345)),
            TimePoint::from_secs(12345)
        );
    }

    #[test]
    fn test_named_zone_fixed_offset() {
        // 2024-01-15 12:00:00 UTC is well inside Eastern standard time
        let mut normalizer = new_york();
        let t = TimePoint::from_secs(1_705_320_000);
        assert_eq!(normalizer.shift_point(t), TimePoint::from_secs(1_705_320_000 - 5 * 3600));
    }

    #[test]
    fn test_offset_cache_reused_within_day() {
        let mut normalizer = new_york();
        let base = 1_705_320_000i64;
        // Successive points in the same local day reuse the cached offset
        for step in 0..10 {
            let t = TimePoint::from_secs(base + step * 600);
            assert_eq!(normalizer.shift_point(t), TimePoint::from_secs(base + step * 600 - 5 * 3600));
        }
    }

    #[test]
    fn test_fall_back_collapses_repeated_local_hour() {
        // America/Sao_Paulo, 2018-02-18: clocks fall back from UTC-2 to
        // UTC-3 at local midnight. UTC 01:30 and 02:30 both land on local
        // 23:30 of Feb 17.
        let mut normalizer =
            TemporalNormalizer::new(DisplayMode::Named(chrono_tz::America::Sao_Paulo));
        let input = series(&[1_518_913_800, 1_518_917_400, 1_518_921_000, 1_518_924_600]);
        let output = normalizer.shift_series(input);

        let times: Vec<i64> = output.iter().map(|p| p.time.as_secs()).collect();
        assert_eq!(times, vec![1_518_906_600, 1_518_910_200, 1_518_913_800]);

        // The later original element (index 2 of the input) won the collapse
        assert_eq!(output[1].value, 2.0);
    }

    #[test]
    fn test_output_strictly_ascending() {
        let mut normalizer =
            TemporalNormalizer::new(DisplayMode::Named(chrono_tz::America::Sao_Paulo));
        // Hourly series across the whole fall-back night
        let input: Vec<SeriesPoint> = (0..12)
            .map(|i| SeriesPoint::new(TimePoint::from_secs(1_518_904_800 + i * 3600), i as f64))
            .collect();
        let n = input.len();
        let output = normalizer.shift_series(input);

        assert!(output.len() <= n);
        for pair in output.windows(2) {
            assert!(pair[0].time < pair[1].time);
        }
    }

    #[test]
    fn test_alignment_only_when_enabled() {
        let unaligned = TemporalNormalizer::new(DisplayMode::Utc);
        assert_eq!(unaligned.align(TimePoint::from_secs(3725)), TimePoint::from_secs(3725));

        let mut aligned = TemporalNormalizer::new(DisplayMode::Utc).with_bucket(BucketWidth::ONE_MINUTE);
        assert_eq!(aligned.align(TimePoint::from_secs(3725)), TimePoint::from_secs(3720));
        assert_eq!(aligned.place(TimePoint::from_secs(3725)), TimePoint::from_secs(3720));

        aligned.set_bucket(None);
        assert_eq!(aligned.align(TimePoint::from_secs(3725)), TimePoint::from_secs(3725));
    }

    #[test]
    fn test_display_mode_parsing() {
        assert_eq!(DisplayMode::parse("UTC").unwrap(), DisplayMode::Utc);
        assert_eq!(DisplayMode::parse("Local").unwrap(), DisplayMode::Local);
        assert_eq!(
            DisplayMode::parse("America/New_York").unwrap(),
            DisplayMode::Named(chrono_tz::America::New_York)
        );
        assert!(DisplayMode::parse("Not/AZone").is_err());
    }

    proptest! {
        #[test]
        fn prop_series_never_longer_and_always_ascending(
            times in proptest::collection::vec(1_500_000_000i64..1_800_000_000, 0..64)
        ) {
            let mut normalizer = new_york();
            let input = series(&times);
            let n = input.len();
            let output = normalizer.shift_series(input);
            prop_assert!(output.len() <= n);
            for pair in output.windows(2) {
                prop_assert!(pair[0].time < pair[1].time);
            }
        }

        #[test]
        fn prop_utc_identity(times in proptest::collection::vec(0i64..2_000_000_000, 0..64)) {
            let mut normalizer = TemporalNormalizer::new(DisplayMode::Utc);
            let input = series(&times);
            prop_assert_eq!(normalizer.shift_series(input.clone()), input);
        }
    }
}
