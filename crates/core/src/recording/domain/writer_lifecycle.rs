use std::path::Path;

use thiserror::Error;

use crate::shared::fourcc::FourCc;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriter;

#[derive(Error, Debug)]
pub enum OpenError {
    #[error("the video codec must be a FOURCC identifier (4 chars), got '{0}'")]
    InvalidCodec(String),
    #[error("could not create the output video {path}; check filename and/or support for codec {codec}")]
    CannotOpen {
        path: String,
        codec: String,
        #[source]
        source: Option<Box<dyn std::error::Error>>,
    },
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("output video is not open")]
    NotOpen,
    #[error("frame is {actual:?} but the open video is {expected:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("failed to encode frame: {0}")]
    Sink(#[source] Box<dyn std::error::Error>),
    #[error("failed to finalize output video: {0}")]
    Finalize(#[source] Box<dyn std::error::Error>),
}

/// Owns the output sink and its `Closed -> Open -> Closed` lifecycle.
///
/// The sink opens lazily with the size of the frame that triggered it and
/// keeps that size until closed. Closing and reopening may happen any
/// number of times, each time with a new path and size.
pub struct WriterLifecycle {
    writer: Box<dyn VideoWriter>,
    open: Option<VideoMetadata>,
}

impl WriterLifecycle {
    pub fn new(writer: Box<dyn VideoWriter>) -> Self {
        Self { writer, open: None }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Parameters of the currently open sink.
    pub fn metadata(&self) -> Option<&VideoMetadata> {
        self.open.as_ref()
    }

    /// Opens the sink unless it already is.
    pub fn ensure_open(
        &mut self,
        path: &str,
        codec: &str,
        fps: u32,
        frame_size: (u32, u32),
    ) -> Result<(), OpenError> {
        if self.open.is_some() {
            return Ok(());
        }

        let fourcc = FourCc::parse(codec).ok_or_else(|| OpenError::InvalidCodec(codec.into()))?;
        let metadata = VideoMetadata {
            width: frame_size.0,
            height: frame_size.1,
            fps,
            codec: fourcc,
        };

        let cannot_open = |source| OpenError::CannotOpen {
            path: path.to_string(),
            codec: codec.to_string(),
            source,
        };
        self.writer
            .open(Path::new(path), &metadata)
            .map_err(|e| cannot_open(Some(e)))?;
        if !self.writer.is_open() {
            return Err(cannot_open(None));
        }

        log::info!(
            "Starting to record {codec} video at {}x{}@{fps}fps to {path}",
            frame_size.0,
            frame_size.1
        );
        self.open = Some(metadata);
        Ok(())
    }

    /// Appends one frame. The frame must match the size the sink was
    /// opened with; mismatches never reach the sink.
    pub fn write(&mut self, frame: &Frame) -> Result<(), WriteError> {
        let metadata = self.open.as_ref().ok_or(WriteError::NotOpen)?;
        if frame.size() != metadata.frame_size() {
            return Err(WriteError::SizeMismatch {
                expected: metadata.frame_size(),
                actual: frame.size(),
            });
        }
        self.writer.write(frame).map_err(WriteError::Sink)
    }

    /// Flushes and releases the sink. A no-op when already closed; the
    /// lifecycle is Closed afterwards even if finalizing failed.
    pub fn close(&mut self) -> Result<(), WriteError> {
        if self.open.take().is_none() {
            return Ok(());
        }
        self.writer.close().map_err(WriteError::Finalize)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::shared::timestamp::Timestamp;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// What a [`RecordingSink`] saw, shared with the test body.
    #[derive(Default, Debug)]
    pub(crate) struct SinkLog {
        pub opened: Vec<(PathBuf, VideoMetadata)>,
        pub written: Vec<Frame>,
        pub closed: usize,
    }

    /// In-memory sink that logs calls and can be told to fail.
    pub(crate) struct RecordingSink {
        pub log: Arc<Mutex<SinkLog>>,
        pub fail_open: bool,
        pub fail_write: bool,
        pub open_silently_fails: bool,
        is_open: bool,
    }

    impl RecordingSink {
        pub(crate) fn new() -> (Self, Arc<Mutex<SinkLog>>) {
            let log = Arc::new(Mutex::new(SinkLog::default()));
            (
                Self {
                    log: log.clone(),
                    fail_open: false,
                    fail_write: false,
                    open_silently_fails: false,
                    is_open: false,
                },
                log,
            )
        }
    }

    impl VideoWriter for RecordingSink {
        fn open(
            &mut self,
            path: &Path,
            metadata: &VideoMetadata,
        ) -> Result<(), Box<dyn std::error::Error>> {
            if self.fail_open {
                return Err("permission denied".into());
            }
            self.log
                .lock()
                .unwrap()
                .opened
                .push((path.to_path_buf(), metadata.clone()));
            self.is_open = !self.open_silently_fails;
            Ok(())
        }

        fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            if self.fail_write {
                return Err("disk full".into());
            }
            self.log.lock().unwrap().written.push(frame.clone());
            Ok(())
        }

        fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            self.is_open = false;
            self.log.lock().unwrap().closed += 1;
            Ok(())
        }

        fn is_open(&self) -> bool {
            self.is_open
        }
    }

    fn frame(w: u32, h: u32) -> Frame {
        Frame::new(vec![0; (w * h * 3) as usize], w, h, "bgr8", Timestamp::default())
    }

    #[test]
    fn test_starts_closed() {
        let (sink, _) = RecordingSink::new();
        let lifecycle = WriterLifecycle::new(Box::new(sink));
        assert!(!lifecycle.is_open());
        assert!(lifecycle.metadata().is_none());
    }

    #[test]
    fn test_ensure_open_opens_once() {
        let (sink, log) = RecordingSink::new();
        let mut lifecycle = WriterLifecycle::new(Box::new(sink));

        lifecycle.ensure_open("a.avi", "MJPG", 15, (4, 2)).unwrap();
        lifecycle.ensure_open("b.avi", "MJPG", 15, (8, 8)).unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.opened.len(), 1);
        assert_eq!(log.opened[0].0, PathBuf::from("a.avi"));
        assert_eq!(log.opened[0].1.frame_size(), (4, 2));
        assert_eq!(log.opened[0].1.fps, 15);
        assert_eq!(lifecycle.metadata().unwrap().frame_size(), (4, 2));
    }

    #[test]
    fn test_invalid_codec_never_touches_sink() {
        let (sink, log) = RecordingSink::new();
        let mut lifecycle = WriterLifecycle::new(Box::new(sink));

        let err = lifecycle.ensure_open("a.avi", "MPEG4", 15, (4, 2)).unwrap_err();
        assert!(matches!(err, OpenError::InvalidCodec(ref c) if c == "MPEG4"));
        assert!(log.lock().unwrap().opened.is_empty());
        assert!(!lifecycle.is_open());
    }

    #[test]
    fn test_sink_open_failure_is_cannot_open() {
        let (mut sink, _) = RecordingSink::new();
        sink.fail_open = true;
        let mut lifecycle = WriterLifecycle::new(Box::new(sink));

        let err = lifecycle.ensure_open("/nope/a.avi", "MJPG", 15, (4, 2)).unwrap_err();
        assert!(matches!(err, OpenError::CannotOpen { ref path, .. } if path == "/nope/a.avi"));
        assert!(!lifecycle.is_open());
    }

    #[test]
    fn test_sink_reporting_closed_after_open_is_cannot_open() {
        let (mut sink, _) = RecordingSink::new();
        sink.open_silently_fails = true;
        let mut lifecycle = WriterLifecycle::new(Box::new(sink));

        let err = lifecycle.ensure_open("a.avi", "MJPG", 15, (4, 2)).unwrap_err();
        assert!(matches!(err, OpenError::CannotOpen { source: None, .. }));
    }

    #[test]
    fn test_write_while_closed_is_rejected() {
        let (sink, log) = RecordingSink::new();
        let mut lifecycle = WriterLifecycle::new(Box::new(sink));

        assert!(matches!(lifecycle.write(&frame(4, 2)), Err(WriteError::NotOpen)));
        assert!(log.lock().unwrap().written.is_empty());
    }

    #[test]
    fn test_write_size_mismatch_is_rejected() {
        let (sink, log) = RecordingSink::new();
        let mut lifecycle = WriterLifecycle::new(Box::new(sink));
        lifecycle.ensure_open("a.avi", "MJPG", 15, (4, 2)).unwrap();

        let err = lifecycle.write(&frame(8, 2)).unwrap_err();
        assert!(matches!(
            err,
            WriteError::SizeMismatch {
                expected: (4, 2),
                actual: (8, 2)
            }
        ));
        assert!(log.lock().unwrap().written.is_empty());
    }

    #[test]
    fn test_sink_write_failure_surfaces() {
        let (mut sink, _) = RecordingSink::new();
        sink.fail_write = true;
        let mut lifecycle = WriterLifecycle::new(Box::new(sink));
        lifecycle.ensure_open("a.avi", "MJPG", 15, (4, 2)).unwrap();

        assert!(matches!(lifecycle.write(&frame(4, 2)), Err(WriteError::Sink(_))));
    }

    #[test]
    fn test_close_is_idempotent() {
        let (sink, log) = RecordingSink::new();
        let mut lifecycle = WriterLifecycle::new(Box::new(sink));
        lifecycle.close().unwrap();
        lifecycle.ensure_open("a.avi", "MJPG", 15, (4, 2)).unwrap();
        lifecycle.close().unwrap();
        lifecycle.close().unwrap();

        assert_eq!(log.lock().unwrap().closed, 1);
        assert!(!lifecycle.is_open());
    }

    #[test]
    fn test_reopen_with_new_path_and_size() {
        let (sink, log) = RecordingSink::new();
        let mut lifecycle = WriterLifecycle::new(Box::new(sink));

        lifecycle.ensure_open("a.avi", "MJPG", 15, (4, 2)).unwrap();
        lifecycle.write(&frame(4, 2)).unwrap();
        lifecycle.close().unwrap();
        lifecycle.ensure_open("b.avi", "MJPG", 15, (6, 6)).unwrap();
        lifecycle.write(&frame(6, 6)).unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.opened.len(), 2);
        assert_eq!(log.opened[1].0, PathBuf::from("b.avi"));
        assert_eq!(log.opened[1].1.frame_size(), (6, 6));
        assert_eq!(log.written.len(), 2);
    }
}
