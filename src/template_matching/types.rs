//! Template matching data types

use image::{DynamicImage, GrayImage};
use thiserror::Error;

/// An immutable reference image, reduced to one intensity channel
#[derive(Clone, Debug)]
pub struct Template {
    /// Template label (e.g., "soul_3_alt")
    pub label: String,
    gray: GrayImage,
    /// Sum of intensities
    pixel_sum: u64,
    /// Sum of squared deviations from the mean
    centered_energy: f64,
}

impl Template {
    /// Build a template from any decoded image (color is reduced to intensity)
    pub fn from_image(label: impl Into<String>, image: &DynamicImage) -> Self {
        Self::from_gray(label, image.to_luma8())
    }

    pub fn from_gray(label: impl Into<String>, gray: GrayImage) -> Self {
        let n = (gray.width() as usize * gray.height() as usize).max(1) as f64;
        let pixel_sum: u64 = gray.as_raw().iter().map(|&v| u64::from(v)).sum();
        let squared_sum: u64 = gray.as_raw().iter().map(|&v| u64::from(v) * u64::from(v)).sum();
        let sum = pixel_sum as f64;
        let centered_energy = (squared_sum as f64 - sum * sum / n).max(0.0);

        Self {
            label: label.into(),
            gray,
            pixel_sum,
            centered_energy,
        }
    }

    pub fn width(&self) -> u32 {
        self.gray.width()
    }

    pub fn height(&self) -> u32 {
        self.gray.height()
    }

    pub fn gray(&self) -> &GrayImage {
        &self.gray
    }

    pub(crate) fn pixel_sum(&self) -> u64 {
        self.pixel_sum
    }

    pub(crate) fn centered_energy(&self) -> f64 {
        self.centered_energy
    }
}

/// Best placement of one template inside one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchResult {
    /// Top-left X coordinate in the frame
    pub x: u32,
    /// Top-left Y coordinate in the frame
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Correlation score (0.0-1.0)
    pub confidence: f32,
}

impl MatchResult {
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Matching failures. These indicate a configuration defect (templates that
/// do not fit the capture region) and are handled like a failed capture.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error(
        "Template '{label}' ({template_width}x{template_height}) exceeds the {frame_width}x{frame_height} frame"
    )]
    TemplateExceedsFrame {
        label: String,
        template_width: u32,
        template_height: u32,
        frame_width: u32,
        frame_height: u32,
    },

    #[error("Template '{label}' is empty")]
    EmptyTemplate { label: String },
}
