use super::VideoEncoder;
use crate::error::PipelineError;
use crate::shared::constants;
use crate::utils::{logger, process};
use std::path::Path;
use std::process::Command;
use std::time::Duration;

/// Encodes the diff-image sequence with ffmpeg using the QuickTime
/// Animation codec, which keeps the alpha channel intact.
pub struct FfmpegEncoder {
    timeout: Duration,
}

impl FfmpegEncoder {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(constants::COLLABORATOR_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoEncoder for FfmpegEncoder {
    fn encode(
        &self,
        frames_dir: &Path,
        frame_count: usize,
        fps: u32,
        output: &Path,
    ) -> Result<(), PipelineError> {
        if frame_count == 0 {
            return Err(PipelineError::Encode {
                path: output.to_path_buf(),
                reason: "empty diff image sequence".to_string(),
            });
        }

        let pattern = frames_dir.join(constants::DIFF_FILE_PATTERN);
        logger::debug(&format!(
            "encoding {} diff frames at {} fps into {}",
            frame_count,
            fps,
            output.display()
        ));

        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-loglevel")
            .arg("error")
            .arg("-y")
            .arg("-framerate")
            .arg(fps.to_string())
            .arg("-start_number")
            .arg("1")
            .arg("-i")
            .arg(&pattern)
            .arg("-c:v")
            .arg("qtrle")
            .arg(output);

        let (status, stderr) =
            process::run_with_timeout(&mut cmd, "diff video encoding", self.timeout)?;

        if !status.success() {
            let reason = if stderr.trim().is_empty() {
                format!("ffmpeg exited with {}", status)
            } else {
                stderr.trim().to_string()
            };
            return Err(PipelineError::Encode {
                path: output.to_path_buf(),
                reason,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sequence_is_rejected_before_spawning() {
        let dir = tempfile::tempdir().unwrap();
        let encoder = FfmpegEncoder::new();
        let err = encoder
            .encode(dir.path(), 0, 10, &dir.path().join("out.mov"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Encode { .. }));
    }
}
