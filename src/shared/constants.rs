pub const APP_NAME: &str = "viddiff";

pub const ERROR_LOG_FILE: &str = "error.log";
pub const DEBUG_LOG_FILE: &str = "debug.log";

/// Frames sampled per video when the caller does not override it.
pub const DEFAULT_SAMPLE_COUNT: usize = 10;

/// Per-pixel similarity threshold on a 0-1 perceptual scale.
pub const DEFAULT_THRESHOLD: f32 = 0.1;

/// Frame rate of the generated diff video.
pub const DEFAULT_DIFF_FPS: u32 = 10;

/// Bounded wait for a single ffmpeg invocation.
pub const COLLABORATOR_TIMEOUT_SECS: u64 = 120;

/// The sampling stride formula partitions the timeline into this many units.
pub const TIMELINE_UNITS: usize = 100;

pub const FRAME_FILE_PATTERN: &str = "frame_%05d.png";
pub const DIFF_FILE_PATTERN: &str = "diff_%05d.png";
pub const DIFF_FILE_PREFIX: &str = "diff_";
pub const FRAME_EXTENSION: &str = "png";
