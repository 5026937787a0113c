use super::report::FramePairResult;
use crate::shared::constants;
use image::{Rgba, RgbaImage};

const CHANGED_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
const ANTIALIASED_COLOR: Rgba<u8> = Rgba([255, 255, 0, 255]);
const UNCHANGED_COLOR: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Minimum luminance delta to a neighbor for a pixel to count as sitting
/// on an edge.
const EDGE_LUMA_DELTA: i32 = 8;

/// Capability seam over the per-pixel perceptual comparison routine.
/// Implementations must not mutate their inputs.
pub trait PixelComparator: Sync {
    /// Compares two images of identical dimensions. `make_diff` asks for a
    /// diff raster: changed pixels opaque red, anti-aliased pixels opaque
    /// yellow, unchanged pixels fully transparent.
    fn compare(&self, a: &RgbaImage, b: &RgbaImage, make_diff: bool) -> FramePairResult;
}

/// Per-channel delta comparator. A pixel is changed when any RGBA channel
/// differs by more than `threshold * 255`. With `include_aa` off, changed
/// pixels that sit on a luminance edge in both images are treated as
/// anti-aliasing artifacts and not counted.
pub struct ThresholdComparator {
    threshold: f32,
    include_aa: bool,
}

impl ThresholdComparator {
    pub fn new() -> Self {
        Self {
            threshold: constants::DEFAULT_THRESHOLD,
            include_aa: false,
        }
    }

    pub fn with_options(threshold: f32, include_aa: bool) -> Self {
        Self {
            threshold,
            include_aa,
        }
    }
}

impl Default for ThresholdComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelComparator for ThresholdComparator {
    fn compare(&self, a: &RgbaImage, b: &RgbaImage, make_diff: bool) -> FramePairResult {
        debug_assert_eq!(a.dimensions(), b.dimensions());

        let (width, height) = a.dimensions();
        let max_delta = self.threshold * 255.0;

        let mut diff_image = if make_diff {
            Some(RgbaImage::new(width, height))
        } else {
            None
        };

        let mut changed_pixels: u64 = 0;
        for y in 0..height {
            for x in 0..width {
                let pa = a.get_pixel(x, y);
                let pb = b.get_pixel(x, y);

                let delta = channel_delta(pa, pb);
                let mut color = UNCHANGED_COLOR;

                if delta as f32 > max_delta {
                    if !self.include_aa && is_antialiased(a, x, y) && is_antialiased(b, x, y) {
                        color = ANTIALIASED_COLOR;
                    } else {
                        changed_pixels += 1;
                        color = CHANGED_COLOR;
                    }
                }

                if let Some(diff) = diff_image.as_mut() {
                    diff.put_pixel(x, y, color);
                }
            }
        }

        FramePairResult {
            changed_pixels,
            total_pixels: width as u64 * height as u64,
            diff_image,
        }
    }
}

fn channel_delta(a: &Rgba<u8>, b: &Rgba<u8>) -> i32 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(&ca, &cb)| (ca as i32 - cb as i32).abs())
        .max()
        .unwrap_or(0)
}

fn luma(p: &Rgba<u8>) -> i32 {
    ((p[0] as u32 * 299 + p[1] as u32 * 587 + p[2] as u32 * 114) / 1000) as i32
}

/// A pixel is an anti-aliasing candidate when its 3x3 neighborhood holds
/// both a clearly darker and a clearly lighter pixel, i.e. it is an
/// intermediate value on a luminance edge. Flat regions never qualify, so
/// solid-color comparisons stay exact.
fn is_antialiased(img: &RgbaImage, x: u32, y: u32) -> bool {
    let (width, height) = img.dimensions();
    let center = luma(img.get_pixel(x, y));

    let mut has_darker = false;
    let mut has_lighter = false;

    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                continue;
            }
            let neighbor = luma(img.get_pixel(nx as u32, ny as u32));
            if neighbor < center - EDGE_LUMA_DELTA {
                has_darker = true;
            } else if neighbor > center + EDGE_LUMA_DELTA {
                has_lighter = true;
            }
            if has_darker && has_lighter {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255]))
    }

    #[test]
    fn test_identical_images_have_no_changes() {
        let comparator = ThresholdComparator::new();
        let img = solid(16, 16, 128);
        let result = comparator.compare(&img, &img.clone(), false);
        assert_eq!(result.changed_pixels, 0);
        assert_eq!(result.total_pixels, 256);
        assert!(result.diff_image.is_none());
    }

    #[test]
    fn test_fully_different_images_change_everywhere() {
        let comparator = ThresholdComparator::new();
        let a = solid(8, 8, 0);
        let b = solid(8, 8, 255);
        let result = comparator.compare(&a, &b, false);
        assert_eq!(result.changed_pixels, 64);
        assert_eq!(result.total_pixels, 64);
    }

    #[test]
    fn test_delta_within_threshold_is_not_changed() {
        // Threshold 0.1 allows per-channel deltas up to 25.
        let comparator = ThresholdComparator::with_options(0.1, true);
        let a = solid(8, 8, 100);
        let b = solid(8, 8, 110);
        let result = comparator.compare(&a, &b, false);
        assert_eq!(result.changed_pixels, 0);

        let c = solid(8, 8, 140);
        let result = comparator.compare(&a, &c, false);
        assert_eq!(result.changed_pixels, 64);
    }

    #[test]
    fn test_diff_image_marks_changed_pixels() {
        let comparator = ThresholdComparator::new();
        let a = solid(4, 4, 0);
        let mut b = solid(4, 4, 0);
        b.put_pixel(2, 1, Rgba([255, 255, 255, 255]));

        let result = comparator.compare(&a, &b, true);
        assert_eq!(result.changed_pixels, 1);

        let diff = result.diff_image.unwrap();
        assert_eq!(*diff.get_pixel(2, 1), CHANGED_COLOR);
        assert_eq!(*diff.get_pixel(0, 0), UNCHANGED_COLOR);
    }

    fn edge_image(mid_value: u8) -> RgbaImage {
        // Black | gray | white vertical bands; the gray band sits on a
        // luminance edge.
        let mut img = RgbaImage::new(9, 9);
        for y in 0..9 {
            for x in 0..9 {
                let v = if x < 4 {
                    0
                } else if x == 4 {
                    mid_value
                } else {
                    255
                };
                img.put_pixel(x, y, Rgba([v, v, v, 255]));
            }
        }
        img
    }

    #[test]
    fn test_edge_pixels_skipped_unless_aa_included() {
        let a = edge_image(110);
        let b = edge_image(160);

        let without_aa = ThresholdComparator::with_options(0.1, false).compare(&a, &b, false);
        assert_eq!(without_aa.changed_pixels, 0);

        let with_aa = ThresholdComparator::with_options(0.1, true).compare(&a, &b, false);
        assert_eq!(with_aa.changed_pixels, 9);
    }

    #[test]
    fn test_solid_regions_are_never_antialiased() {
        let img = solid(5, 5, 77);
        assert!(!is_antialiased(&img, 2, 2));
        assert!(!is_antialiased(&img, 0, 0));
    }
}
