use crate::recording::domain::command::Command;
use crate::recording::domain::output_file_namer::OutputFileNamer;
use crate::transport::domain::transport::CommandResponse;

use super::recording_session::RecordingSession;

/// Applies start/stop/rename commands to a live [`RecordingSession`].
///
/// `Start` and `StartNamed` arm the session under a freshly stamped path;
/// the sink itself opens on the next admitted frame. `Stop` disarms and
/// closes synchronously.
pub struct RecordingController {
    base_path: String,
    namer: OutputFileNamer,
}

impl RecordingController {
    pub fn new(base_path: impl Into<String>, namer: OutputFileNamer) -> Self {
        Self {
            base_path: base_path.into(),
            namer,
        }
    }

    /// Stamps a path without touching any session, used for the initial
    /// output path.
    pub fn stamp(&mut self, base_path: &str) -> String {
        self.namer.stamp(base_path)
    }

    /// Parses a transport-level command and applies it.
    pub fn dispatch(
        &mut self,
        session: &mut RecordingSession,
        name: &str,
        argument: Option<&str>,
    ) -> CommandResponse {
        match Command::parse(name, argument) {
            Ok(command) => self.handle(session, command),
            Err(e) => {
                log::warn!("Rejected command: {e}");
                CommandResponse::failed(e.to_string())
            }
        }
    }

    pub fn handle(&mut self, session: &mut RecordingSession, command: Command) -> CommandResponse {
        log::debug!("Handling '{}'", command.name());
        match command {
            Command::Start => {
                log::info!("STARTING");
                let base = self.base_path.clone();
                self.arm(session, &base)
            }
            Command::StartNamed(name) => {
                let response = self.arm(session, &name);
                log::info!("STARTING with name {}", session.state.output_path);
                response
            }
            Command::Stop => self.stop(session),
        }
    }

    fn arm(&mut self, session: &mut RecordingSession, base: &str) -> CommandResponse {
        let path = self.namer.stamp(base);
        log::info!("Video recording to {path}");
        if session.writer.is_open() {
            log::warn!(
                "Output video {} is still open; frames keep going there until stop",
                session.state.output_path
            );
        }
        session.state.output_path = path;
        session.flag.set(true);
        CommandResponse::ok(format!("Recording to {}", session.state.output_path))
    }

    fn stop(&mut self, session: &mut RecordingSession) -> CommandResponse {
        log::info!("Stopping");
        session.flag.set(false);
        session.state.last_accepted = None;
        let written_size = session.writer.metadata().map(|m| m.frame_size());
        match session.writer.close() {
            Ok(()) => match written_size {
                Some((width, height)) => CommandResponse::ok(format!(
                    "Recording stopped; video saved as {} ({width}x{height})",
                    session.state.output_path
                )),
                None => CommandResponse::ok("Recording stopped; no video was written"),
            },
            Err(e) => {
                log::error!("Failed to finalize {}: {e}", session.state.output_path);
                CommandResponse::failed(format!("Recording stopped but {e}"))
            }
        }
    }
}
