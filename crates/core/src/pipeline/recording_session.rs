use crate::recording::domain::recording_state::{RecordingFlag, RecordingState};
use crate::recording::domain::writer_lifecycle::WriterLifecycle;
use crate::video::domain::video_writer::VideoWriter;

/// Everything the frame callback and the command handlers share.
///
/// Only dispatched callbacks touch `state` and `writer`; `flag` may also be
/// read from other threads.
pub struct RecordingSession {
    pub flag: RecordingFlag,
    pub state: RecordingState,
    pub writer: WriterLifecycle,
}

impl RecordingSession {
    pub fn new(output_path: impl Into<String>, recording: bool, writer: Box<dyn VideoWriter>) -> Self {
        Self {
            flag: RecordingFlag::new(recording),
            state: RecordingState::new(output_path),
            writer: WriterLifecycle::new(writer),
        }
    }

    pub fn is_recording(&self) -> bool {
        self.flag.is_recording()
    }
}
