use std::fmt;
use std::time::Duration;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Capture time of a frame, in nanoseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Negative or non-finite inputs saturate to zero.
    pub fn from_secs_f64(secs: f64) -> Self {
        if !secs.is_finite() || secs <= 0.0 {
            return Self(0);
        }
        Self((secs * NANOS_PER_SEC as f64).round() as u64)
    }

    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC as f64
    }

    /// Time elapsed since `earlier`, or `None` if `earlier` is not before `self`.
    pub fn duration_since(self, earlier: Timestamp) -> Option<Duration> {
        self.0
            .checked_sub(earlier.0)
            .filter(|&d| d > 0)
            .map(Duration::from_nanos)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:09}",
            self.0 / NANOS_PER_SEC,
            self.0 % NANOS_PER_SEC
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_secs_rounds_to_nearest_nanosecond() {
        assert_eq!(Timestamp::from_secs_f64(0.1).as_nanos(), 100_000_000);
        assert_eq!(Timestamp::from_secs_f64(0.15).as_nanos(), 150_000_000);
    }

    #[test]
    fn test_from_secs_saturates_invalid_input() {
        assert_eq!(Timestamp::from_secs_f64(-1.0), Timestamp::from_nanos(0));
        assert_eq!(Timestamp::from_secs_f64(f64::NAN), Timestamp::from_nanos(0));
    }

    #[test]
    fn test_as_secs_roundtrip() {
        let ts = Timestamp::from_nanos(1_500_000_000);
        assert_relative_eq!(ts.as_secs_f64(), 1.5);
    }

    #[test]
    fn test_duration_since_earlier() {
        let a = Timestamp::from_nanos(100);
        let b = Timestamp::from_nanos(350);
        assert_eq!(b.duration_since(a), Some(Duration::from_nanos(250)));
    }

    #[test]
    fn test_duration_since_equal_or_later_is_none() {
        let a = Timestamp::from_nanos(100);
        assert_eq!(a.duration_since(a), None);
        assert_eq!(a.duration_since(Timestamp::from_nanos(200)), None);
    }

    #[test]
    fn test_display_pads_fraction() {
        assert_eq!(Timestamp::from_nanos(2_000_000_042).to_string(), "2.000000042");
    }
}
