//! Overlay composition
//!
//! Icons of the active categories are summed channel by channel (alpha
//! included) with saturation, then the sum is rescaled once by the display
//! scale factor.

use super::assets::AssetStore;
use super::types::BuffCategory;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::sync::Arc;

/// Composited overlay ready for display. Cheap to clone.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame(Arc<RgbaImage>);

impl OverlayFrame {
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.0
    }
}

#[derive(Debug)]
pub struct OverlayCompositor {
    assets: Arc<AssetStore>,
    scale: f32,
    cache: Option<(Vec<(BuffCategory, u8)>, OverlayFrame)>,
}

impl OverlayCompositor {
    pub fn new(assets: Arc<AssetStore>, scale: f32) -> Self {
        Self {
            assets,
            scale,
            cache: None,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Compose the overlay for the given (category, count) pairs.
    /// The input order does not matter; repeated state hits the cache.
    pub fn compose(&mut self, active: &[(BuffCategory, u8)]) -> OverlayFrame {
        let mut key = active.to_vec();
        key.sort();

        if let Some((cached_key, frame)) = &self.cache
            && *cached_key == key
        {
            return frame.clone();
        }

        let frame = OverlayFrame(Arc::new(self.render(&key)));
        self.cache = Some((key, frame.clone()));
        frame
    }

    fn render(&self, active: &[(BuffCategory, u8)]) -> RgbaImage {
        let (width, height) = self.assets.icon_size().unwrap_or((1, 1));
        let mut accumulator = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));

        for &(category, count) in active {
            let Some(icon) = self.assets.icon(category, count) else {
                log::warn!("⚠️ No overlay icon for {} at count {}", category, count);
                continue;
            };
            for (acc, src) in accumulator.pixels_mut().zip(icon.pixels()) {
                for channel in 0..4 {
                    acc[channel] = acc[channel].saturating_add(src[channel]);
                }
            }
        }

        self.rescale(accumulator)
    }

    fn rescale(&self, image: RgbaImage) -> RgbaImage {
        if self.scale == 1.0 {
            return image;
        }
        let (w, h) = scaled_dimensions(image.dimensions(), self.scale);
        imageops::resize(&image, w, h, FilterType::Triangle)
    }
}

/// `floor(dim * scale)`, never below one pixel
pub fn scaled_dimensions((width, height): (u32, u32), scale: f32) -> (u32, u32) {
    let scale = f64::from(scale);
    let w = (f64::from(width) * scale).floor().max(1.0) as u32;
    let h = (f64::from(height) * scale).floor().max(1.0) as u32;
    (w, h)
}
