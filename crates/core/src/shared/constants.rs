pub const DEFAULT_FILENAME: &str = "output";
pub const DEFAULT_FPS: u32 = 15;
pub const DEFAULT_CODEC: &str = "MJPG";
pub const DEFAULT_ENCODING: &str = "bgr8";

/// Frame topic the recorder subscribes to unless configured otherwise.
pub const DEFAULT_IMAGE_TOPIC: &str = "image";

/// `-1` disables colormapping.
pub const NO_COLORMAP: i32 = -1;

/// Container extension appended to stamped filenames.
pub const STAMPED_EXTENSION: &str = "avi";

/// Depth images in millimetres render up to 10 m by default.
pub const DEFAULT_DEPTH_MAX_MM: f64 = 10_000.0;
/// Depth images in metres render up to 10 m by default.
pub const DEFAULT_DEPTH_MAX_M: f64 = 10.0;

pub const COMMAND_START: &str = "start";
pub const COMMAND_START_NAMED: &str = "start_named";
pub const COMMAND_STOP: &str = "stop";
