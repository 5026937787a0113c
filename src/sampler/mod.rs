mod ffmpeg;

pub use ffmpeg::FfmpegSampler;

use crate::error::PipelineError;
use crate::shared::constants;
use std::path::{Path, PathBuf};

/// Capability seam over the external video decode collaborator: produce
/// an ordered set of lossless frame images sampled across the video.
pub trait FrameSampler: Sync {
    /// Samples `count` frames from `video` into `dest`. Returns the frame
    /// paths in capture order, or fails explicitly instead of returning
    /// fewer frames than requested.
    fn sample(&self, video: &Path, count: usize, dest: &Path)
        -> Result<Vec<PathBuf>, PipelineError>;
}

/// Frame-index stride for a requested sample count, under the assumed
/// ~100-unit timeline partition. Counts above the partition size clamp to
/// a stride of 1 (every frame).
pub fn sample_stride(count: usize) -> usize {
    (constants::TIMELINE_UNITS / count.max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_for_typical_counts() {
        assert_eq!(sample_stride(10), 10);
        assert_eq!(sample_stride(1), 100);
        assert_eq!(sample_stride(3), 33);
        assert_eq!(sample_stride(100), 1);
    }

    #[test]
    fn test_stride_clamps_to_one() {
        assert_eq!(sample_stride(150), 1);
        assert_eq!(sample_stride(usize::MAX), 1);
    }
}
