use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conversion::domain::frame_converter::ConversionOptions;
use crate::shared::constants::{
    DEFAULT_CODEC, DEFAULT_ENCODING, DEFAULT_FILENAME, DEFAULT_FPS, DEFAULT_IMAGE_TOPIC,
    NO_COLORMAP,
};
use crate::shared::fourcc::FourCc;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("the video codec must be a FOURCC identifier (4 chars), got '{0}'")]
    InvalidCodec(String),
    #[error("fps must be a positive integer, got {0}")]
    InvalidFps(i64),
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Startup configuration, read once. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Base output path; used verbatim unless `stamped_filename` is set.
    pub filename: String,
    pub stamped_filename: bool,
    pub fps: i64,
    pub codec: String,
    /// Encoding frames are converted to before encoding.
    pub encoding: String,
    pub min_depth_range: f64,
    pub max_depth_range: f64,
    pub use_dynamic_depth_range: bool,
    pub colormap: i32,
    /// Start idle and expose start/start_named/stop instead of recording
    /// from launch.
    pub save_all_video: bool,
    pub topic: String,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            filename: DEFAULT_FILENAME.to_string(),
            stamped_filename: false,
            fps: DEFAULT_FPS as i64,
            codec: DEFAULT_CODEC.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            min_depth_range: 0.0,
            max_depth_range: 0.0,
            use_dynamic_depth_range: false,
            colormap: NO_COLORMAP,
            save_all_video: false,
            topic: DEFAULT_IMAGE_TOPIC.to_string(),
        }
    }
}

impl RecorderConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fourcc()?;
        self.frame_rate()?;
        Ok(())
    }

    pub fn fourcc(&self) -> Result<FourCc, ConfigError> {
        FourCc::parse(&self.codec).ok_or_else(|| ConfigError::InvalidCodec(self.codec.clone()))
    }

    pub fn frame_rate(&self) -> Result<u32, ConfigError> {
        u32::try_from(self.fps)
            .ok()
            .filter(|&fps| fps > 0)
            .ok_or(ConfigError::InvalidFps(self.fps))
    }

    pub fn conversion_options(&self) -> ConversionOptions {
        ConversionOptions {
            target_encoding: self.encoding.clone(),
            dynamic_scaling: self.use_dynamic_depth_range,
            min_value: self.min_depth_range,
            max_value: self.max_depth_range,
            colormap: self.colormap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RecorderConfig::default();
        assert_eq!(config.filename, "output");
        assert!(!config.stamped_filename);
        assert_eq!(config.fps, 15);
        assert_eq!(config.codec, "MJPG");
        assert_eq!(config.encoding, "bgr8");
        assert_relative_eq!(config.min_depth_range, 0.0);
        assert_relative_eq!(config.max_depth_range, 0.0);
        assert!(!config.use_dynamic_depth_range);
        assert_eq!(config.colormap, -1);
        assert!(!config.save_all_video);
        assert_eq!(config.topic, "image");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: RecorderConfig =
            serde_json::from_str(r#"{"fps": 30, "save_all_video": true}"#).unwrap();
        assert_eq!(config.fps, 30);
        assert!(config.save_all_video);
        assert_eq!(config.codec, "MJPG");
    }

    #[rstest]
    #[case("")]
    #[case("MJP")]
    #[case("MJPEG")]
    fn test_invalid_codec(#[case] codec: &str) {
        let config = RecorderConfig {
            codec: codec.to_string(),
            ..RecorderConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidCodec(ref c)) if c == codec));
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    #[case(i64::MAX)]
    fn test_invalid_fps(#[case] fps: i64) {
        let config = RecorderConfig {
            fps,
            ..RecorderConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidFps(f)) if f == fps));
    }

    #[test]
    fn test_conversion_options_mirror_config() {
        let config = RecorderConfig {
            encoding: "rgb8".into(),
            use_dynamic_depth_range: true,
            min_depth_range: 0.5,
            max_depth_range: 4.0,
            colormap: 2,
            ..RecorderConfig::default()
        };
        let options = config.conversion_options();
        assert_eq!(options.target_encoding, "rgb8");
        assert!(options.dynamic_scaling);
        assert_relative_eq!(options.min_value, 0.5);
        assert_relative_eq!(options.max_value, 4.0);
        assert_eq!(options.colormap, 2);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"filename": "/tmp/run", "codec": "XVID"}}"#).unwrap();
        let config = RecorderConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.filename, "/tmp/run");
        assert_eq!(config.codec, "XVID");
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = RecorderConfig::from_json_file(Path::new("/no/such/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_from_json_file_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = RecorderConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
