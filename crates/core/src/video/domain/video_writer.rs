use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Abstracts the container/codec encoder so recording logic does not
/// depend on a specific codec library.
pub trait VideoWriter: Send {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Frames arrive in a 3-channel color encoding (`bgr8` or `rgb8`).
    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Flushes pending packets and finalizes the container.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    fn is_open(&self) -> bool;
}
