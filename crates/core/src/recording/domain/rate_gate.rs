use std::time::Duration;

use crate::shared::timestamp::Timestamp;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Throttles a frame stream down to a target rate by comparing capture
/// timestamps, not arrival times.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateGate {
    period: Duration,
}

impl RateGate {
    /// `fps` must be positive; configuration validation guarantees it.
    pub fn new(fps: u32) -> Self {
        let nanos = (NANOS_PER_SEC / fps.max(1) as f64).round() as u64;
        Self {
            period: Duration::from_nanos(nanos),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Admits a frame at least one period after the last accepted one.
    ///
    /// `None` means nothing was accepted since the last (re)start, so the
    /// frame is always admitted. Frames at or before `last_accepted` are
    /// never admitted, whatever order they arrive in.
    pub fn admit(&self, frame_timestamp: Timestamp, last_accepted: Option<Timestamp>) -> bool {
        match last_accepted {
            None => true,
            Some(last) => frame_timestamp
                .duration_since(last)
                .is_some_and(|elapsed| elapsed >= self.period),
        }
    }
}
