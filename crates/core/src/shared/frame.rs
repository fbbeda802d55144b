use ndarray::ArrayView3;

use crate::shared::timestamp::Timestamp;

/// One timestamped image sample: tightly packed row-major pixel bytes plus
/// the tag of the encoding they are stored in.
///
/// The tag is kept as delivered by the transport. It is only interpreted at
/// conversion time, so a frame with an unknown encoding can still travel
/// through the pipeline and be rejected there.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    encoding: String,
    timestamp: Timestamp,
}

impl Frame {
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        encoding: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            data,
            width,
            height,
            encoding: encoding.into(),
            timestamp,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty() || self.width == 0 || self.height == 0
    }

    /// Views 8-bit pixel data as `(height, width, channels)`.
    ///
    /// Returns `None` when the buffer length does not match the dimensions.
    pub fn as_ndarray(&self, channels: usize) -> Option<ArrayView3<'_, u8>> {
        ArrayView3::from_shape(
            (self.height as usize, self.width as usize, channels),
            &self.data,
        )
        .ok()
    }
}
