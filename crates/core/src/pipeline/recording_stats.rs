use std::time::Instant;

use super::ingest_frame_use_case::IngestOutcome;

/// Per-outcome frame counters with a throttled progress line and an
/// end-of-run summary.
pub struct RecordingStats {
    throttle_frames: u64,
    start_time: Instant,
    received: u64,
    not_recording: u64,
    rate_limited: u64,
    conversion_failed: u64,
    empty: u64,
    size_mismatch: u64,
    written: u64,
    commands: u64,
}

impl RecordingStats {
    pub fn new(throttle_frames: u64) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            start_time: Instant::now(),
            received: 0,
            not_recording: 0,
            rate_limited: 0,
            conversion_failed: 0,
            empty: 0,
            size_mismatch: 0,
            written: 0,
            commands: 0,
        }
    }

    pub fn record(&mut self, outcome: &IngestOutcome) {
        self.received += 1;
        match outcome {
            IngestOutcome::NotRecording => self.not_recording += 1,
            IngestOutcome::RateLimited => self.rate_limited += 1,
            IngestOutcome::ConversionFailed(_) => self.conversion_failed += 1,
            IngestOutcome::EmptyFrame => self.empty += 1,
            IngestOutcome::SizeMismatch { .. } => self.size_mismatch += 1,
            IngestOutcome::Written { frame_count } => {
                self.written += 1;
                if frame_count % self.throttle_frames == 0 {
                    log::info!("Recorded {frame_count} frames");
                }
            }
        }
    }

    pub fn record_command(&mut self) {
        self.commands += 1;
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn dropped(&self) -> u64 {
        self.rate_limited + self.conversion_failed + self.empty + self.size_mismatch
    }

    /// Returns the formatted summary, or `None` if no frame arrived.
    pub fn summary_string(&self) -> Option<String> {
        if self.received == 0 {
            return None;
        }

        let elapsed = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Recording summary ({} frames received, {elapsed:.1}s total):",
            self.received
        )];
        let rows = [
            ("written", self.written),
            ("rate limited", self.rate_limited),
            ("not recording", self.not_recording),
            ("unconvertible", self.conversion_failed),
            ("empty", self.empty),
            ("size mismatch", self.size_mismatch),
        ];
        for (label, count) in rows.iter().filter(|(_, count)| *count > 0) {
            lines.push(format!("  {label:14}: {count}"));
        }
        if self.commands > 0 {
            lines.push(format!("  commands      : {}", self.commands));
        }
        if elapsed > 0.0 && self.written > 0 {
            lines.push(format!(
                "  Throughput: {:.1} fps written",
                self.written as f64 / elapsed
            ));
        }

        Some(lines.join("\n"))
    }

    pub fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

impl Default for RecordingStats {
    fn default() -> Self {
        Self::new(100)
    }
}
