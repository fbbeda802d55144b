use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("unsupported source encoding '{0}'")]
    UnsupportedEncoding(String),
    #[error("cannot convert to '{0}': target must be a 3-channel color encoding")]
    UnsupportedTarget(String),
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    DataLength { expected: usize, actual: usize },
    #[error("unknown colormap id {0}")]
    UnknownColormap(i32),
}

/// How raw frames are rendered for display before encoding.
#[derive(Clone, Debug, PartialEq)]
pub struct ConversionOptions {
    pub target_encoding: String,
    /// Rescale by each frame's observed min/max instead of fixed bounds.
    pub dynamic_scaling: bool,
    pub min_value: f64,
    pub max_value: f64,
    /// Negative disables colormapping.
    pub colormap: i32,
}

/// Renders a raw frame in a displayable 3-channel color encoding.
///
/// A failure concerns a single frame only; callers drop it and carry on.
pub trait FrameConverter: Send {
    fn convert(&self, frame: &Frame, options: &ConversionOptions)
        -> Result<Frame, ConversionError>;
}
