use std::fmt;

/// A four-character codec identifier such as `MJPG` or `XVID`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FourCc([u8; 4]);

impl FourCc {
    /// Accepts exactly four ASCII characters.
    pub fn parse(tag: &str) -> Option<Self> {
        let bytes: [u8; 4] = tag.as_bytes().try_into().ok()?;
        if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            Some(Self(bytes))
        } else {
            None
        }
    }

    pub fn bytes(&self) -> [u8; 4] {
        self.0
    }

    /// Little-endian packing, as stored in AVI/MP4 codec tag fields.
    pub fn as_u32(&self) -> u32 {
        u32::from_le_bytes(self.0)
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII is accepted by `parse`.
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("MJPG")]
    #[case("XVID")]
    #[case("avc1")]
    fn test_parse_valid(#[case] tag: &str) {
        let fourcc = FourCc::parse(tag).unwrap();
        assert_eq!(fourcc.as_str(), tag);
    }

    #[rstest]
    #[case("")]
    #[case("MJP")]
    #[case("MJPEG")]
    #[case("MJ\u{e9}")]
    fn test_parse_rejects_wrong_length(#[case] tag: &str) {
        assert!(FourCc::parse(tag).is_none());
    }

    #[test]
    fn test_as_u32_is_little_endian() {
        let fourcc = FourCc::parse("MJPG").unwrap();
        assert_eq!(fourcc.as_u32(), 0x4750_4A4D);
    }
}
