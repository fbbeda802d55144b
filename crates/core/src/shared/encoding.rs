/// Pixel encodings a frame can be tagged with.
///
/// Tags follow the usual image-transport names; `8UC1`, `16UC1` and `32FC1`
/// are raw single-channel buffers (the latter two typically depth images).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Encoding {
    Rgb8,
    Bgr8,
    Rgba8,
    Bgra8,
    Mono8,
    Mono16,
    Type8UC1,
    Type16UC1,
    Type32FC1,
}

impl Encoding {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "rgb8" => Some(Self::Rgb8),
            "bgr8" => Some(Self::Bgr8),
            "rgba8" => Some(Self::Rgba8),
            "bgra8" => Some(Self::Bgra8),
            "mono8" => Some(Self::Mono8),
            "mono16" => Some(Self::Mono16),
            "8UC1" => Some(Self::Type8UC1),
            "16UC1" => Some(Self::Type16UC1),
            "32FC1" => Some(Self::Type32FC1),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Rgb8 => "rgb8",
            Self::Bgr8 => "bgr8",
            Self::Rgba8 => "rgba8",
            Self::Bgra8 => "bgra8",
            Self::Mono8 => "mono8",
            Self::Mono16 => "mono16",
            Self::Type8UC1 => "8UC1",
            Self::Type16UC1 => "16UC1",
            Self::Type32FC1 => "32FC1",
        }
    }

    pub fn channels(self) -> usize {
        match self {
            Self::Rgb8 | Self::Bgr8 => 3,
            Self::Rgba8 | Self::Bgra8 => 4,
            Self::Mono8 | Self::Mono16 | Self::Type8UC1 | Self::Type16UC1 | Self::Type32FC1 => 1,
        }
    }

    pub fn bytes_per_sample(self) -> usize {
        match self {
            Self::Mono16 | Self::Type16UC1 => 2,
            Self::Type32FC1 => 4,
            _ => 1,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        self.channels() * self.bytes_per_sample()
    }

    pub fn is_color(self) -> bool {
        self.channels() >= 3
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("rgb8", Encoding::Rgb8, 3)]
    #[case("bgra8", Encoding::Bgra8, 4)]
    #[case("mono16", Encoding::Mono16, 2)]
    #[case("16UC1", Encoding::Type16UC1, 2)]
    #[case("32FC1", Encoding::Type32FC1, 4)]
    fn test_from_tag_and_pixel_size(
        #[case] tag: &str,
        #[case] expected: Encoding,
        #[case] bytes_per_pixel: usize,
    ) {
        let encoding = Encoding::from_tag(tag).unwrap();
        assert_eq!(encoding, expected);
        assert_eq!(encoding.bytes_per_pixel(), bytes_per_pixel);
        assert_eq!(encoding.tag(), tag);
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(Encoding::from_tag("yuv422"), None);
        assert_eq!(Encoding::from_tag("BGR8"), None);
    }

    #[test]
    fn test_is_color() {
        assert!(Encoding::Bgr8.is_color());
        assert!(Encoding::Rgba8.is_color());
        assert!(!Encoding::Mono8.is_color());
        assert!(!Encoding::Type32FC1.is_color());
    }
}
