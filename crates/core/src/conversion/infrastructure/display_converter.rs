use crate::conversion::domain::colormap::Colormap;
use crate::conversion::domain::frame_converter::{
    ConversionError, ConversionOptions, FrameConverter,
};
use crate::shared::constants::{DEFAULT_DEPTH_MAX_M, DEFAULT_DEPTH_MAX_MM};
use crate::shared::encoding::Encoding;
use crate::shared::frame::Frame;

/// CPU conversion of raw frames into `bgr8`/`rgb8` for the encoder.
///
/// Color inputs are reordered (alpha dropped). Single-channel inputs are
/// scaled into 0-255, either by fixed bounds or by the frame's own range,
/// and optionally colormapped.
pub struct DisplayConverter;

impl DisplayConverter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DisplayConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameConverter for DisplayConverter {
    fn convert(
        &self,
        frame: &Frame,
        options: &ConversionOptions,
    ) -> Result<Frame, ConversionError> {
        let target = Encoding::from_tag(&options.target_encoding)
            .filter(|e| matches!(e, Encoding::Bgr8 | Encoding::Rgb8))
            .ok_or_else(|| ConversionError::UnsupportedTarget(options.target_encoding.clone()))?;
        let source = Encoding::from_tag(frame.encoding())
            .ok_or_else(|| ConversionError::UnsupportedEncoding(frame.encoding().to_string()))?;
        let colormap = match options.colormap {
            id if id < 0 => None,
            id => Some(Colormap::from_id(id).ok_or(ConversionError::UnknownColormap(id))?),
        };

        let (width, height) = frame.size();
        let pixel_count = width as usize * height as usize;
        if pixel_count == 0 {
            return Ok(Frame::new(
                Vec::new(),
                width,
                height,
                target.tag(),
                frame.timestamp(),
            ));
        }

        let expected = pixel_count * source.bytes_per_pixel();
        if frame.data().len() != expected {
            return Err(ConversionError::DataLength {
                expected,
                actual: frame.data().len(),
            });
        }

        let data = if source.is_color() {
            reorder_channels(frame, source, target)?
        } else {
            let samples = decode_samples(frame.data(), source);
            let (lo, hi) = scaling_bounds(&samples, source, options);
            render_samples(&samples, lo, hi, colormap, target)
        };

        Ok(Frame::new(data, width, height, target.tag(), frame.timestamp()))
    }
}

fn is_bgr_order(encoding: Encoding) -> bool {
    matches!(encoding, Encoding::Bgr8 | Encoding::Bgra8)
}

fn reorder_channels(
    frame: &Frame,
    source: Encoding,
    target: Encoding,
) -> Result<Vec<u8>, ConversionError> {
    let channels = source.channels();
    let view = frame
        .as_ndarray(channels)
        .ok_or(ConversionError::DataLength {
            expected: frame.width() as usize * frame.height() as usize * channels,
            actual: frame.data().len(),
        })?;

    let order = if is_bgr_order(source) == is_bgr_order(target) {
        [0, 1, 2]
    } else {
        [2, 1, 0]
    };

    let mut out = Vec::with_capacity(view.len() / channels * 3);
    for px in view.rows() {
        out.extend_from_slice(&[px[order[0]], px[order[1]], px[order[2]]]);
    }
    Ok(out)
}

fn decode_samples(data: &[u8], source: Encoding) -> Vec<f64> {
    match source {
        Encoding::Mono16 | Encoding::Type16UC1 => data
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]) as f64)
            .collect(),
        Encoding::Type32FC1 => data
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64)
            .collect(),
        _ => data.iter().map(|&b| b as f64).collect(),
    }
}

/// Dynamic scaling wins; otherwise explicit bounds, falling back to the
/// natural range of the encoding when min and max are equal.
fn scaling_bounds(samples: &[f64], source: Encoding, options: &ConversionOptions) -> (f64, f64) {
    if options.dynamic_scaling {
        let finite = samples.iter().copied().filter(|s| s.is_finite());
        let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s), hi.max(s))
        });
        return if lo <= hi { (lo, hi) } else { (0.0, 0.0) };
    }

    if options.min_value != options.max_value {
        return (options.min_value, options.max_value);
    }

    match source {
        Encoding::Mono16 => (0.0, u16::MAX as f64),
        Encoding::Type16UC1 => (0.0, DEFAULT_DEPTH_MAX_MM),
        Encoding::Type32FC1 => (0.0, DEFAULT_DEPTH_MAX_M),
        _ => (0.0, u8::MAX as f64),
    }
}

fn render_samples(
    samples: &[f64],
    lo: f64,
    hi: f64,
    colormap: Option<Colormap>,
    target: Encoding,
) -> Vec<u8> {
    let range = hi - lo;
    let bgr = is_bgr_order(target);
    let mut out = Vec::with_capacity(samples.len() * 3);

    for &sample in samples {
        let v = if !sample.is_finite() || range <= 0.0 {
            0.0
        } else {
            ((sample - lo) / range).clamp(0.0, 1.0)
        };

        let [r, g, b] = match colormap {
            Some(map) => map.apply(v),
            None => {
                let gray = (v * 255.0).round() as u8;
                [gray, gray, gray]
            }
        };

        if bgr {
            out.extend_from_slice(&[b, g, r]);
        } else {
            out.extend_from_slice(&[r, g, b]);
        }
    }
    out
}
