use crate::error::PipelineError;
use image::RgbaImage;
use serde::Serialize;

/// Outcome of comparing one aligned frame pair.
#[derive(Debug, Clone)]
pub struct FramePairResult {
    pub changed_pixels: u64,
    pub total_pixels: u64,
    /// Present only when a diff video was requested.
    pub diff_image: Option<RgbaImage>,
}

/// Aggregate result for a whole video pair. The only durable output value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub changed_pixels: u64,
    pub total_pixels: u64,
    pub percentage: f64,
}

impl ComparisonReport {
    pub fn from_pairs(pairs: &[FramePairResult]) -> Result<Self, PipelineError> {
        let changed_pixels: u64 = pairs.iter().map(|p| p.changed_pixels).sum();
        let total_pixels: u64 = pairs.iter().map(|p| p.total_pixels).sum();

        if total_pixels == 0 {
            return Err(PipelineError::EmptyInput);
        }

        Ok(Self {
            changed_pixels,
            total_pixels,
            percentage: 100.0 * changed_pixels as f64 / total_pixels as f64,
        })
    }
}
