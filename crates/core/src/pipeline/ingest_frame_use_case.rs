use crate::conversion::domain::frame_converter::{
    ConversionError, ConversionOptions, FrameConverter,
};
use crate::recording::domain::rate_gate::RateGate;
use crate::recording::domain::writer_lifecycle::WriteError;
use crate::shared::frame::Frame;

use super::record_error::RecordError;
use super::recording_session::RecordingSession;

/// What happened to one incoming frame.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    NotRecording,
    RateLimited,
    ConversionFailed(ConversionError),
    /// Conversion produced no pixels.
    EmptyFrame,
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    Written {
        frame_count: u64,
    },
}

/// Per-frame admission pipeline: open the sink if needed, throttle, convert,
/// then append.
pub struct IngestFrameUseCase {
    converter: Box<dyn FrameConverter>,
    options: ConversionOptions,
    gate: RateGate,
    codec: String,
    fps: u32,
}

impl IngestFrameUseCase {
    pub fn new(
        converter: Box<dyn FrameConverter>,
        options: ConversionOptions,
        codec: impl Into<String>,
        fps: u32,
    ) -> Self {
        let gate = RateGate::new(fps);
        log::debug!("Admitting at most one frame every {:?}", gate.period());
        Self {
            converter,
            options,
            gate,
            codec: codec.into(),
            fps,
        }
    }

    /// Runs one frame through the pipeline. Only a failure to open or feed
    /// the sink is an error; every other drop is reported as an outcome.
    pub fn execute(
        &self,
        session: &mut RecordingSession,
        frame: &Frame,
    ) -> Result<IngestOutcome, RecordError> {
        if !session.is_recording() {
            return Ok(IngestOutcome::NotRecording);
        }

        if !session.writer.is_open() {
            session.writer.ensure_open(
                &session.state.output_path,
                &self.codec,
                self.fps,
                frame.size(),
            )?;
        }

        if !self
            .gate
            .admit(frame.timestamp(), session.state.last_accepted)
        {
            return Ok(IngestOutcome::RateLimited);
        }

        let converted = match self.converter.convert(frame, &self.options) {
            Ok(converted) => converted,
            Err(e) => {
                log::error!(
                    "Unable to convert {} image to {}: {e}",
                    frame.encoding(),
                    self.options.target_encoding
                );
                return Ok(IngestOutcome::ConversionFailed(e));
            }
        };

        if converted.is_empty() {
            log::warn!("Frame skipped, no data!");
            return Ok(IngestOutcome::EmptyFrame);
        }

        match session.writer.write(&converted) {
            Ok(()) => {}
            Err(WriteError::SizeMismatch { expected, actual }) => {
                log::warn!(
                    "Frame skipped: {}x{} does not match the open {}x{} video",
                    actual.0,
                    actual.1,
                    expected.0,
                    expected.1
                );
                return Ok(IngestOutcome::SizeMismatch { expected, actual });
            }
            Err(e) => return Err(e.into()),
        }

        session.state.record_written(frame.timestamp());
        log::debug!("Recording frame {}", session.state.frame_count);
        Ok(IngestOutcome::Written {
            frame_count: session.state.frame_count,
        })
    }
}
