use crate::differ::{self, ComparisonReport, PixelComparator};
use crate::encoder::VideoEncoder;
use crate::error::PipelineError;
use crate::sampler::FrameSampler;
use crate::shared::constants;
use crate::utils::logger;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Stages of one comparison run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ExtractingA,
    ExtractingB,
    Comparing,
    EncodingDiff,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "preparing",
            Stage::ExtractingA => "extracting frames from the first video",
            Stage::ExtractingB => "extracting frames from the second video",
            Stage::Comparing => "comparing frame pairs",
            Stage::EncodingDiff => "encoding the diff video",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// A pipeline failure tagged with the stage it occurred in.
#[derive(Debug, Error)]
#[error("{stage}: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: PipelineError,
}

/// Final result of a successful run.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: ComparisonReport,
    pub diff_video: Option<PathBuf>,
}

/// Sequences sampling, comparison and optional encoding over scoped
/// temporary storage. Collaborators come in behind their capability
/// traits so any backend can be substituted.
pub struct Pipeline<'a> {
    pub sampler: &'a dyn FrameSampler,
    pub comparator: &'a dyn PixelComparator,
    pub encoder: &'a dyn VideoEncoder,
    pub sample_count: usize,
    pub diff_fps: u32,
}

impl Pipeline<'_> {
    /// Runs `Idle -> ExtractingA -> ExtractingB -> Comparing ->
    /// [EncodingDiff] -> Done`. Any failure surfaces as a `StageError`;
    /// the run's temporary storage is released exactly once on every
    /// exit path.
    pub fn run(
        &self,
        movie_a: &Path,
        movie_b: &Path,
        diff_output: Option<&Path>,
        mut progress: impl FnMut(&str),
    ) -> Result<RunOutcome, StageError> {
        let result = self.run_stages(movie_a, movie_b, diff_output, &mut progress);

        match &result {
            Ok(outcome) => logger::info(&format!(
                "{}: {:.4}% over {} pixels",
                Stage::Done,
                outcome.report.percentage,
                outcome.report.total_pixels
            )),
            Err(e) => logger::error(&format!("{}: {}", Stage::Failed, e)),
        }

        result
    }

    fn run_stages(
        &self,
        movie_a: &Path,
        movie_b: &Path,
        diff_output: Option<&Path>,
        progress: &mut impl FnMut(&str),
    ) -> Result<RunOutcome, StageError> {
        let tag = |stage: Stage| move |source: PipelineError| StageError { stage, source };

        // The randomized directory name is the per-run scope; concurrent
        // runs cannot collide. Dropping it removes everything below, so
        // cleanup also happens on early returns.
        let scope = tempfile::tempdir()
            .map_err(PipelineError::from)
            .map_err(tag(Stage::Idle))?;
        logger::debug(&format!("run scope: {}", scope.path().display()));

        progress(&format!("Extracting frames from {}", movie_a.display()));
        let a_dir = scope.path().join("a");
        fs::create_dir(&a_dir)
            .map_err(PipelineError::from)
            .map_err(tag(Stage::ExtractingA))?;
        let frames_a = self
            .sampler
            .sample(movie_a, self.sample_count, &a_dir)
            .map_err(tag(Stage::ExtractingA))?;

        progress(&format!("Extracting frames from {}", movie_b.display()));
        let b_dir = scope.path().join("b");
        fs::create_dir(&b_dir)
            .map_err(PipelineError::from)
            .map_err(tag(Stage::ExtractingB))?;
        let frames_b = self
            .sampler
            .sample(movie_b, self.sample_count, &b_dir)
            .map_err(tag(Stage::ExtractingB))?;

        progress(&format!("Comparing {} frame pairs", frames_a.len()));
        let results = differ::compare_frame_sets(
            self.comparator,
            &frames_a,
            &frames_b,
            diff_output.is_some(),
        )
        .map_err(tag(Stage::Comparing))?;
        let report = ComparisonReport::from_pairs(&results).map_err(tag(Stage::Comparing))?;

        let diff_video = match diff_output {
            None => None,
            Some(output) => {
                progress(&format!("Encoding diff video to {}", output.display()));
                let diff_dir = scope.path().join("diff");
                fs::create_dir(&diff_dir)
                    .map_err(PipelineError::from)
                    .map_err(tag(Stage::EncodingDiff))?;

                // Diff frames are numbered in original capture order so
                // the encoded video plays back in sequence.
                for (index, result) in results.iter().enumerate() {
                    let image = result.diff_image.as_ref().ok_or_else(|| {
                        tag(Stage::EncodingDiff)(PipelineError::Encode {
                            path: output.to_path_buf(),
                            reason: format!("missing diff raster for pair {}", index),
                        })
                    })?;
                    let name = format!("{}{:05}.png", constants::DIFF_FILE_PREFIX, index + 1);
                    image
                        .save(diff_dir.join(name))
                        .map_err(PipelineError::from)
                        .map_err(tag(Stage::EncodingDiff))?;
                }

                self.encoder
                    .encode(&diff_dir, results.len(), self.diff_fps, output)
                    .map_err(tag(Stage::EncodingDiff))?;
                Some(output.to_path_buf())
            }
        };

        // Explicit release on the success path; a failure here must not
        // mask the report, so it is only logged.
        if let Err(e) = scope.close() {
            logger::error(&format!("temp scope cleanup failed: {}", e));
        }

        Ok(RunOutcome { report, diff_video })
    }
}
