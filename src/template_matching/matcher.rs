//! Template matching implementation
//!
//! Zero-mean normalized cross-correlation over every placement of the
//! template inside the frame. Window sums come from the frame's integral
//! images; the cross term is an exact integer dot product per placement.

use super::types::{MatchError, MatchResult, Template};
use crate::capture::CapturedFrame;
use rayon::prelude::*;

/// Variance below this is treated as a flat (featureless) patch
const FLAT_ENERGY_EPSILON: f64 = 1e-6;

/// Stateless matcher; identical inputs always produce identical output
#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateMatcher;

impl TemplateMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Find the global maximum of the correlation surface.
    ///
    /// Placement rows are scored in parallel on the current rayon pool.
    /// Within a row and then across rows only a strictly higher score
    /// replaces the best, so the first maximum in row-major order wins ties.
    pub fn best_match(
        &self,
        template: &Template,
        frame: &CapturedFrame,
    ) -> Result<MatchResult, MatchError> {
        let (tw, th) = (template.width(), template.height());
        let (fw, fh) = (frame.width(), frame.height());

        if tw == 0 || th == 0 {
            return Err(MatchError::EmptyTemplate {
                label: template.label.clone(),
            });
        }
        if tw > fw || th > fh {
            return Err(MatchError::TemplateExceedsFrame {
                label: template.label.clone(),
                template_width: tw,
                template_height: th,
                frame_width: fw,
                frame_height: fh,
            });
        }

        let scorer = Scorer::new(template, frame);
        let row_bests: Vec<(u32, f32)> = (0..=(fh - th))
            .into_par_iter()
            .map(|y| scorer.best_in_row(y))
            .collect();

        let mut best = MatchResult {
            x: 0,
            y: 0,
            width: tw,
            height: th,
            confidence: f32::MIN,
        };
        for (y, (x, score)) in row_bests.into_iter().enumerate() {
            if score > best.confidence {
                best.x = x;
                best.y = y as u32;
                best.confidence = score;
            }
        }

        log::trace!(
            "  🔍 '{}' best at ({},{}) conf={:.4}",
            template.label,
            best.x,
            best.y,
            best.confidence
        );
        Ok(best)
    }
}

/// Per-call constants for scoring one template against one frame
struct Scorer<'a> {
    template: &'a [u8],
    frame: &'a CapturedFrame,
    width: usize,
    height: usize,
    n: f64,
    template_sum: f64,
    template_energy: f64,
    template_flat: bool,
}

impl<'a> Scorer<'a> {
    fn new(template: &'a Template, frame: &'a CapturedFrame) -> Self {
        let template_energy = template.centered_energy();
        Self {
            template: template.gray().as_raw(),
            frame,
            width: template.width() as usize,
            height: template.height() as usize,
            n: f64::from(template.width()) * f64::from(template.height()),
            template_sum: template.pixel_sum() as f64,
            template_energy,
            template_flat: template_energy <= FLAT_ENERGY_EPSILON,
        }
    }

    /// First maximum along one row of placements
    fn best_in_row(&self, y: u32) -> (u32, f32) {
        let last_x = self.frame.width() - self.width as u32;
        let mut best = (0, f32::MIN);
        for x in 0..=last_x {
            let score = self.score(x, y);
            if score > best.1 {
                best = (x, score);
            }
        }
        best
    }

    fn score(&self, x: u32, y: u32) -> f32 {
        let (sum, squared_sum) =
            self.frame.window_sums(x, y, self.width as u32, self.height as u32);
        let sum = sum as f64;
        let window_energy = squared_sum as f64 - sum * sum / self.n;
        let window_flat = window_energy <= FLAT_ENERGY_EPSILON;

        if self.template_flat || window_flat {
            // Two flat patches differ only by a brightness offset
            return if self.template_flat && window_flat {
                1.0
            } else {
                0.0
            };
        }

        // Centered cross term: sum(t * f) - sum(t) * sum(f) / n
        let cross = self.raw_cross(x, y) as f64 - self.template_sum * sum / self.n;
        (cross / (self.template_energy * window_energy).sqrt()).clamp(0.0, 1.0) as f32
    }

    /// Exact integer `sum(t * f)` over one placement
    fn raw_cross(&self, x: u32, y: u32) -> u64 {
        let stride = self.frame.width() as usize;
        let raw = self.frame.gray().as_raw();
        let (x, y) = (x as usize, y as usize);

        let mut acc = 0u64;
        for (ty, template_row) in self.template.chunks_exact(self.width).enumerate() {
            let start = (y + ty) * stride + x;
            let row = &raw[start..start + self.width];
            let row_sum: u32 = row
                .iter()
                .zip(template_row)
                .map(|(&pixel, &t)| u32::from(pixel) * u32::from(t))
                .sum();
            acc += u64::from(row_sum);
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::noise;
    use image::{GrayImage, Luma, Rgba, RgbaImage};
    use std::time::{Duration, Instant};

    /// Zero-mean NCC at one placement, straight from the definition
    fn direct_score(template: &GrayImage, frame: &GrayImage, x: u32, y: u32) -> f64 {
        let n = f64::from(template.width() * template.height());
        let window = |tx: u32, ty: u32| f64::from(frame.get_pixel(x + tx, y + ty)[0]);
        let t_mean = template.pixels().map(|p| f64::from(p[0])).sum::<f64>() / n;
        let mut f_mean = 0.0;
        for (tx, ty, _) in template.enumerate_pixels() {
            f_mean += window(tx, ty);
        }
        f_mean /= n;

        let (mut cross, mut t_energy, mut f_energy) = (0.0, 0.0, 0.0);
        for (tx, ty, p) in template.enumerate_pixels() {
            let t = f64::from(p[0]) - t_mean;
            let f = window(tx, ty) - f_mean;
            cross += t * f;
            t_energy += t * t;
            f_energy += f * f;
        }
        (cross / (t_energy * f_energy).sqrt()).clamp(0.0, 1.0)
    }

    fn frame_with(background: &GrayImage, patch: &GrayImage, at: (u32, u32), offset: u8) -> CapturedFrame {
        let mut pixels = RgbaImage::from_fn(background.width(), background.height(), |x, y| {
            let v = background.get_pixel(x, y)[0].saturating_add(offset);
            Rgba([v, v, v, 255])
        });
        for (px, py, p) in patch.enumerate_pixels() {
            let v = p[0].saturating_add(offset);
            pixels.put_pixel(at.0 + px, at.1 + py, Rgba([v, v, v, 255]));
        }
        CapturedFrame::new(pixels)
    }

    #[test]
    fn test_perfect_match_located() {
        let patch = noise(12, 12, 7);
        let frame = frame_with(&noise(64, 32, 99), &patch, (17, 5), 0);
        let template = Template::from_gray("patch", patch);

        let result = TemplateMatcher::new().best_match(&template, &frame).unwrap();
        assert_eq!((result.x, result.y), (17, 5));
        assert_eq!((result.width, result.height), (12, 12));
        assert!(result.confidence > 0.999, "got {}", result.confidence);
    }

    #[test]
    fn test_brightness_offset_invariance() {
        let patch = noise(10, 10, 3);
        let background = noise(48, 24, 42);
        let plain = frame_with(&background, &patch, (30, 9), 0);
        let brighter = frame_with(&background, &patch, (30, 9), 40);
        let template = Template::from_gray("patch", patch);
        let matcher = TemplateMatcher::new();

        let a = matcher.best_match(&template, &plain).unwrap();
        let b = matcher.best_match(&template, &brighter).unwrap();
        assert_eq!((a.x, a.y), (b.x, b.y));
        assert!(b.confidence > 0.999);
    }

    #[test]
    fn test_unrelated_pattern_scores_low() {
        let template = Template::from_gray("patch", noise(12, 12, 5));
        let frame = frame_with(&noise(64, 32, 1234), &noise(1, 1, 1), (0, 0), 0);

        let result = TemplateMatcher::new().best_match(&template, &frame).unwrap();
        assert!(result.confidence < 0.9, "got {}", result.confidence);
        assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn test_template_equal_to_frame() {
        let patch = noise(16, 8, 11);
        let frame = frame_with(&patch, &patch, (0, 0), 0);
        let template = Template::from_gray("full", patch);

        let result = TemplateMatcher::new().best_match(&template, &frame).unwrap();
        assert_eq!((result.x, result.y), (0, 0));
        assert!(result.confidence > 0.999);
    }

    #[test]
    fn test_template_larger_than_frame() {
        let template = Template::from_gray("big", noise(20, 20, 1));
        let frame = frame_with(&noise(10, 10, 2), &noise(1, 1, 1), (0, 0), 0);

        let result = TemplateMatcher::new().best_match(&template, &frame);
        assert!(matches!(result, Err(MatchError::TemplateExceedsFrame { .. })));
    }

    #[test]
    fn test_flat_template_and_flat_frame() {
        let template = Template::from_gray("flat", GrayImage::from_pixel(4, 4, Luma([90])));
        let flat = frame_with(&GrayImage::from_pixel(8, 8, Luma([10])), &noise(1, 1, 1), (0, 0), 0);
        let textured = frame_with(&noise(8, 8, 5), &noise(1, 1, 1), (0, 0), 0);
        let matcher = TemplateMatcher::new();

        // The 1x1 stamp at the origin breaks flatness there; the rest stays flat
        let result = matcher.best_match(&template, &flat).unwrap();
        assert_eq!(result.confidence, 1.0);
        assert_eq!(matcher.best_match(&template, &textured).unwrap().confidence, 0.0);
    }

    #[test]
    fn test_deterministic() {
        let template = Template::from_gray("patch", noise(8, 8, 21));
        let frame = frame_with(&noise(40, 20, 8), &noise(8, 8, 21), (3, 3), 0);
        let matcher = TemplateMatcher::new();

        let first = matcher.best_match(&template, &frame).unwrap();
        for _ in 0..3 {
            assert_eq!(matcher.best_match(&template, &frame).unwrap(), first);
        }
    }

    #[test]
    fn test_scores_agree_with_definition() {
        let patch = noise(6, 5, 13);
        let frame = frame_with(&noise(30, 20, 71), &noise(1, 1, 1), (0, 0), 0);
        let template = Template::from_gray("patch", patch.clone());

        let result = TemplateMatcher::new().best_match(&template, &frame).unwrap();

        let mut expected = (0, 0, f64::MIN);
        for y in 0..=(20 - 5) {
            for x in 0..=(30 - 6) {
                let score = direct_score(&patch, frame.gray(), x, y);
                if score > expected.2 {
                    expected = (x, y, score);
                }
            }
        }
        assert_eq!((result.x, result.y), (expected.0, expected.1));
        assert!((f64::from(result.confidence) - expected.2).abs() < 1e-5);
    }

    #[test]
    #[cfg_attr(debug_assertions, ignore = "timing needs an optimized build")]
    fn test_capture_region_within_update_interval() {
        // Default capture region against a large indicator template
        let patch = noise(40, 40, 77);
        let frame = frame_with(&noise(795, 160, 5), &patch, (300, 60), 0);
        let template = Template::from_gray("patch", patch);
        let matcher = TemplateMatcher::new();
        let budget = Duration::from_millis(50);

        let mut fastest = Duration::MAX;
        for _ in 0..3 {
            let started = Instant::now();
            let result = matcher.best_match(&template, &frame).unwrap();
            fastest = fastest.min(started.elapsed());
            assert_eq!((result.x, result.y), (300, 60));
        }
        assert!(fastest < budget, "best_match took {:?}, budget {:?}", fastest, budget);
    }
}
