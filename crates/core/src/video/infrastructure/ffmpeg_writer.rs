use std::path::Path;

use ffmpeg_next::format::Pixel;

use crate::shared::encoding::Encoding;
use crate::shared::fourcc::FourCc;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriter;

/// Encodes frames via ffmpeg-next into the container implied by the output
/// path, using the encoder selected by the configured FourCC.
pub struct FfmpegWriter {
    octx: Option<ffmpeg_next::format::context::Output>,
    encoder: Option<ffmpeg_next::codec::encoder::video::Encoder>,
    scaler: Option<(Pixel, ffmpeg_next::software::scaling::Context)>,
    encoder_format: Pixel,
    width: u32,
    height: u32,
    fps: i32,
    frame_count: i64,
    video_stream_index: usize,
}

// Safety: FfmpegWriter is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegWriter {}

impl FfmpegWriter {
    pub fn new() -> Self {
        Self {
            octx: None,
            encoder: None,
            scaler: None,
            encoder_format: Pixel::YUV420P,
            width: 0,
            height: 0,
            fps: 0,
            frame_count: 0,
            video_stream_index: 0,
        }
    }

    fn scaler_for(
        &mut self,
        input: Pixel,
    ) -> Result<&mut ffmpeg_next::software::scaling::Context, ffmpeg_next::Error> {
        let ctx = match self.scaler.take() {
            Some((format, ctx)) if format == input => ctx,
            _ => ffmpeg_next::software::scaling::Context::get(
                input,
                self.width,
                self.height,
                self.encoder_format,
                self.width,
                self.height,
                ffmpeg_next::software::scaling::Flags::BILINEAR,
            )?,
        };
        Ok(&mut self.scaler.insert((input, ctx)).1)
    }

    /// Flushes the encoder and writes the container trailer.
    fn finish(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let Some(encoder) = self.encoder.as_mut() else {
            return Ok(());
        };
        encoder.send_eof()?;
        self.drain_packets()?;
        if let Some(octx) = self.octx.as_mut() {
            octx.write_trailer()?;
        }
        Ok(())
    }

    fn drain_packets(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let (Some(encoder), Some(octx)) = (self.encoder.as_mut(), self.octx.as_mut()) else {
            return Ok(());
        };
        let ost_time_base = octx
            .stream(self.video_stream_index)
            .ok_or("FfmpegWriter: output stream missing")?
            .time_base();

        let mut encoded = ffmpeg_next::Packet::empty();
        while encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(self.video_stream_index);
            encoded.rescale_ts(ffmpeg_next::Rational(1, self.fps), ost_time_base);
            encoded.write_interleaved(octx)?;
        }
        Ok(())
    }
}

impl Default for FfmpegWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a FourCC onto an ffmpeg encoder and the pixel format it expects.
fn encoder_for(fourcc: &FourCc) -> Option<(ffmpeg_next::codec::Id, Pixel)> {
    use ffmpeg_next::codec::Id;

    let id = match &fourcc.bytes().map(|b| b.to_ascii_uppercase()) {
        b"MJPG" => return Some((Id::MJPEG, Pixel::YUVJ420P)),
        b"XVID" | b"DIVX" | b"DX50" | b"FMP4" | b"MP4V" => Id::MPEG4,
        b"H264" | b"X264" | b"AVC1" => Id::H264,
        b"HEVC" | b"H265" | b"HVC1" | b"HEV1" => Id::HEVC,
        b"VP80" => Id::VP8,
        b"VP90" => Id::VP9,
        b"FFV1" => Id::FFV1,
        b"MPG1" => Id::MPEG1VIDEO,
        b"MPG2" => Id::MPEG2VIDEO,
        _ => return None,
    };
    Some((id, Pixel::YUV420P))
}

fn input_pixel(encoding: &str) -> Option<Pixel> {
    match Encoding::from_tag(encoding)? {
        Encoding::Bgr8 => Some(Pixel::BGR24),
        Encoding::Rgb8 => Some(Pixel::RGB24),
        _ => None,
    }
}

impl VideoWriter for FfmpegWriter {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let (codec_id, encoder_format) = encoder_for(&metadata.codec)
            .ok_or_else(|| format!("no encoder known for FourCC '{}'", metadata.codec))?;
        let codec = ffmpeg_next::encoder::find(codec_id)
            .ok_or_else(|| format!("{codec_id:?} encoder not available in this ffmpeg build"))?;

        let mut octx = ffmpeg_next::format::output(path)?;
        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);
        let tag_codec = octx.format().name() == "avi";

        let mut ost = octx.add_stream(Some(codec))?;

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()?;

        let fps = metadata.fps.max(1) as i32;
        encoder_ctx.set_width(metadata.width);
        encoder_ctx.set_height(metadata.height);
        encoder_ctx.set_format(encoder_format);
        encoder_ctx.set_time_base(ffmpeg_next::Rational(1, fps));
        encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(fps, 1)));

        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder_ctx.open_with(ffmpeg_next::Dictionary::new())?;
        ost.set_parameters(&encoder);
        if tag_codec {
            unsafe {
                (*ost.parameters().as_mut_ptr()).codec_tag = metadata.codec.as_u32();
            }
        }
        self.video_stream_index = ost.index();

        octx.write_header()?;

        self.width = metadata.width;
        self.height = metadata.height;
        self.fps = fps;
        self.encoder_format = encoder_format;
        self.octx = Some(octx);
        self.encoder = Some(encoder);
        self.scaler = None;
        self.frame_count = 0;

        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if self.encoder.is_none() {
            return Err("FfmpegWriter: not opened".into());
        }
        if frame.size() != (self.width, self.height) {
            return Err(format!(
                "FfmpegWriter: frame is {}x{}, stream is {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            )
            .into());
        }
        let format = input_pixel(frame.encoding()).ok_or_else(|| {
            format!("FfmpegWriter: cannot encode '{}' frames", frame.encoding())
        })?;

        let mut src_frame =
            ffmpeg_next::util::frame::video::Video::new(format, self.width, self.height);

        let row_bytes = self.width as usize * 3;
        let stride = src_frame.stride(0);
        let data = src_frame.data_mut(0);
        let src = frame.data();

        // Copy pixel data, respecting stride
        for row in 0..self.height as usize {
            let src_start = row * row_bytes;
            let dst_start = row * stride;
            data[dst_start..dst_start + row_bytes]
                .copy_from_slice(&src[src_start..src_start + row_bytes]);
        }

        let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
        self.scaler_for(format)?.run(&src_frame, &mut yuv_frame)?;
        yuv_frame.set_pts(Some(self.frame_count));

        if let Some(encoder) = self.encoder.as_mut() {
            encoder.send_frame(&yuv_frame)?;
        }
        self.drain_packets()?;

        self.frame_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let result = self.finish();

        self.octx = None;
        self.encoder = None;
        self.scaler = None;

        result
    }

    fn is_open(&self) -> bool {
        self.encoder.is_some()
    }
}
