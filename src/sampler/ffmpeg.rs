use super::{sample_stride, FrameSampler};
use crate::error::PipelineError;
use crate::shared::constants;
use crate::utils::{file_utils, logger, process};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// Samples frames by shelling out to ffmpeg with a frame-index select
/// filter. Frames land in `dest` as zero-padded PNGs so a filename sort
/// recovers capture order.
pub struct FfmpegSampler {
    timeout: Duration,
}

impl FfmpegSampler {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(constants::COLLABORATOR_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for FfmpegSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSampler for FfmpegSampler {
    fn sample(
        &self,
        video: &Path,
        count: usize,
        dest: &Path,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        let stride = sample_stride(count);
        let pattern = dest.join(constants::FRAME_FILE_PATTERN);

        logger::debug(&format!(
            "sampling {} frames (stride {}) from {}",
            count,
            stride,
            video.display()
        ));

        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(video)
            .arg("-vf")
            .arg(format!("select=not(mod(n\\,{}))", stride))
            .arg("-vsync")
            .arg("vfr")
            .arg("-frames:v")
            .arg(count.to_string())
            .arg(&pattern);

        let (status, stderr) = process::run_with_timeout(&mut cmd, "frame sampling", self.timeout)?;

        if !status.success() {
            let reason = if stderr.trim().is_empty() {
                format!("ffmpeg exited with {}", status)
            } else {
                stderr.trim().to_string()
            };
            return Err(PipelineError::Decode {
                path: video.to_path_buf(),
                reason,
            });
        }

        let frames = file_utils::list_files(dest, constants::FRAME_EXTENSION).map_err(|e| {
            PipelineError::Decode {
                path: video.to_path_buf(),
                reason: format!("{:#}", e),
            }
        })?;

        if frames.len() != count {
            return Err(PipelineError::Decode {
                path: video.to_path_buf(),
                reason: format!("expected {} sampled frames, got {}", count, frames.len()),
            });
        }

        Ok(frames)
    }
}
