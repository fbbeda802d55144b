use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::shared::timestamp::Timestamp;

/// Shared "is recording" flag.
///
/// Writes happen on the dispatcher thread only; clones may be read from
/// anywhere (e.g. a Ctrl+C handler reporting where the video went).
#[derive(Clone, Debug, Default)]
pub struct RecordingFlag(Arc<AtomicBool>);

impl RecordingFlag {
    pub fn new(recording: bool) -> Self {
        Self(Arc::new(AtomicBool::new(recording)))
    }

    pub fn is_recording(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, recording: bool) {
        self.0.store(recording, Ordering::Release);
    }
}

/// Everything about the current recording except the flag and the sink.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordingState {
    pub output_path: String,
    /// `None` until a frame is written after a (re)start.
    pub last_accepted: Option<Timestamp>,
    pub frame_count: u64,
}

impl RecordingState {
    pub fn new(output_path: impl Into<String>) -> Self {
        Self {
            output_path: output_path.into(),
            last_accepted: None,
            frame_count: 0,
        }
    }

    /// Records a frame that actually reached the sink.
    pub fn record_written(&mut self, timestamp: Timestamp) {
        self.frame_count += 1;
        self.last_accepted = Some(timestamp);
    }
}
