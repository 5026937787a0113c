pub mod comparator;
pub mod report;

pub use comparator::{PixelComparator, ThresholdComparator};
pub use report::{ComparisonReport, FramePairResult};

use crate::error::PipelineError;
use crate::utils::logger;
use rayon::prelude::*;
use std::path::PathBuf;

/// Compares two equal-length, equally-sized frame sequences pair by pair.
/// Pairs are compared in parallel; results come back in original frame
/// order. Inputs are never mutated.
pub fn compare_frame_sets(
    comparator: &dyn PixelComparator,
    left: &[PathBuf],
    right: &[PathBuf],
    make_diff: bool,
) -> Result<Vec<FramePairResult>, PipelineError> {
    if left.len() != right.len() {
        return Err(PipelineError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    left.par_iter()
        .zip(right.par_iter())
        .enumerate()
        .map(|(index, (path_a, path_b))| {
            let a = image::open(path_a)?.into_rgba8();
            let b = image::open(path_b)?.into_rgba8();

            if a.dimensions() != b.dimensions() {
                return Err(PipelineError::DimensionMismatch {
                    index,
                    left_width: a.width(),
                    left_height: a.height(),
                    right_width: b.width(),
                    right_height: b.height(),
                });
            }

            let result = comparator.compare(&a, &b, make_diff);
            logger::debug(&format!(
                "pair {}: {}/{} pixels changed",
                index, result.changed_pixels, result.total_pixels
            ));
            Ok(result)
        })
        .collect()
}
