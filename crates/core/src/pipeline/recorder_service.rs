use crate::config::{ConfigError, RecorderConfig};
use crate::conversion::domain::frame_converter::FrameConverter;
use crate::recording::domain::output_file_namer::OutputFileNamer;
use crate::recording::domain::recording_state::RecordingFlag;
use crate::shared::constants::{COMMAND_START, COMMAND_START_NAMED, COMMAND_STOP};
use crate::shared::frame::Frame;
use crate::transport::domain::transport::{CommandResponse, Transport};
use crate::video::domain::video_writer::VideoWriter;

use super::ingest_frame_use_case::{IngestFrameUseCase, IngestOutcome};
use super::record_error::RecordError;
use super::recording_controller::RecordingController;
use super::recording_session::RecordingSession;
use super::recording_stats::RecordingStats;

/// Where a run ended up, reported once at shutdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownReport {
    pub output_path: String,
    pub frame_count: u64,
    pub was_recording: bool,
}

/// The recorder as a whole: the context every transport callback receives.
pub struct RecorderService {
    session: RecordingSession,
    controller: RecordingController,
    ingest: IngestFrameUseCase,
    stats: RecordingStats,
    topic: String,
    commands_enabled: bool,
}

impl RecorderService {
    /// Validates `config` and builds an armed or idle recorder from it.
    /// Nothing is opened yet; the sink opens on the first admitted frame.
    pub fn new(
        config: &RecorderConfig,
        writer: Box<dyn VideoWriter>,
        converter: Box<dyn FrameConverter>,
        namer: OutputFileNamer,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let fps = config.frame_rate()?;

        let mut controller = RecordingController::new(config.filename.clone(), namer);
        let output_path = if config.stamped_filename {
            controller.stamp(&config.filename)
        } else {
            config.filename.clone()
        };
        let recording = !config.save_all_video;
        if recording {
            log::info!("Video recording to {output_path}");
        }

        Ok(Self {
            session: RecordingSession::new(output_path, recording, writer),
            controller,
            ingest: IngestFrameUseCase::new(
                converter,
                config.conversion_options(),
                config.codec.clone(),
                fps,
            ),
            stats: RecordingStats::default(),
            topic: config.topic.clone(),
            commands_enabled: config.save_all_video,
        })
    }

    /// Subscribes to the frame topic and, when recording is command driven,
    /// exposes start/start_named/stop.
    pub fn register<T>(&self, transport: &mut T)
    where
        T: Transport<RecorderService, RecordError>,
    {
        transport.subscribe(
            &self.topic,
            Box::new(|service: &mut RecorderService, frame: &Frame| {
                service.on_frame(frame).map(|_| ())
            }),
        );

        if !self.commands_enabled {
            return;
        }
        for name in [COMMAND_START, COMMAND_START_NAMED, COMMAND_STOP] {
            transport.register_command(
                name,
                Box::new(move |service: &mut RecorderService, argument: Option<&str>| {
                    service.on_command(name, argument)
                }),
            );
        }
    }

    /// A fatal error also disarms the recorder: whatever was being written
    /// is not a saved video.
    pub fn on_frame(&mut self, frame: &Frame) -> Result<IngestOutcome, RecordError> {
        match self.ingest.execute(&mut self.session, frame) {
            Ok(outcome) => {
                self.stats.record(&outcome);
                Ok(outcome)
            }
            Err(e) => {
                self.session.flag.set(false);
                Err(e)
            }
        }
    }

    pub fn on_command(&mut self, name: &str, argument: Option<&str>) -> CommandResponse {
        self.stats.record_command();
        self.controller.dispatch(&mut self.session, name, argument)
    }

    /// Shared handle on the recording flag, readable from any thread.
    pub fn flag(&self) -> RecordingFlag {
        self.session.flag.clone()
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn commands_enabled(&self) -> bool {
        self.commands_enabled
    }

    pub fn output_path(&self) -> &str {
        &self.session.state.output_path
    }

    pub fn frame_count(&self) -> u64 {
        self.session.state.frame_count
    }

    pub fn stats(&self) -> &RecordingStats {
        &self.stats
    }

    /// Closes the sink and logs the run summary. Safe to call more than
    /// once; a finalize failure is logged since there is nobody left to
    /// hand it to.
    pub fn shutdown(&mut self) -> ShutdownReport {
        if let Err(e) = self.session.writer.close() {
            log::error!("Failed to finalize {}: {e}", self.session.state.output_path);
        }
        self.stats.summary();
        ShutdownReport {
            output_path: self.session.state.output_path.clone(),
            frame_count: self.session.state.frame_count,
            was_recording: self.session.is_recording(),
        }
    }
}
