use crate::shared::fourcc::FourCc;

/// Parameters an output sink is opened with.
///
/// `width`/`height` come from the first admitted frame and stay fixed for
/// the life of one open sink.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub codec: FourCc,
}

impl VideoMetadata {
    pub fn frame_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction() {
        let meta = VideoMetadata {
            width: 640,
            height: 480,
            fps: 15,
            codec: FourCc::parse("MJPG").unwrap(),
        };
        assert_eq!(meta.frame_size(), (640, 480));
        assert_eq!(meta.fps, 15);
        assert_eq!(meta.codec.as_str(), "MJPG");
    }

    #[test]
    fn test_clone_is_equal() {
        let meta = VideoMetadata {
            width: 320,
            height: 240,
            fps: 30,
            codec: FourCc::parse("XVID").unwrap(),
        };
        assert_eq!(meta.clone(), meta);
    }
}
