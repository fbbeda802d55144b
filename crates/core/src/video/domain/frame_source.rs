use crate::shared::frame::Frame;

/// What a source reports once opened.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceInfo {
    pub width: u32,
    pub height: u32,
    /// Nominal rate, 0.0 when the container does not say.
    pub fps: f64,
}

/// Produces timestamped frames from a file, device or stream URL.
///
/// Implementations handle decoding; callers only see [`Frame`]s tagged
/// with their encoding and capture time.
pub trait FrameSource: Send {
    fn open(&mut self, url: &str) -> Result<SourceInfo, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in decode order.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the source.
    fn close(&mut self);
}
