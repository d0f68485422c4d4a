// Shared fixtures for unit tests: deterministic patterns and an on-disk asset tree
use crate::buff_tracking::{BuffCategory, TemplateVariant};
use crate::capture::CapturedFrame;
use crate::config::Configuration;
use image::{GrayImage, Luma, Rgba, RgbaImage};
use std::collections::HashMap;
use tempfile::TempDir;

/// Deterministic pseudo-random intensity pattern (xorshift, values 0..200)
pub(crate) fn noise(width: u32, height: u32, seed: u32) -> GrayImage {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    GrayImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        Luma([(state % 200) as u8])
    })
}

/// Opaque gray RGBA copy of an intensity image
pub(crate) fn to_rgba(gray: &GrayImage) -> RgbaImage {
    RgbaImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y)[0];
        Rgba([v, v, v, 255])
    })
}

pub(crate) fn paste(target: &mut RgbaImage, patch: &GrayImage, at: (u32, u32)) {
    for (x, y, p) in patch.enumerate_pixels() {
        let v = p[0];
        target.put_pixel(at.0 + x, at.1 + y, Rgba([v, v, v, 255]));
    }
}

/// Asset tree in a temp dir following the bundled naming convention.
///
/// Every template is a distinct noise pattern; every icon is a solid color
/// on its category's own channel so additive blending is observable.
pub(crate) struct AssetFixture {
    _dir: TempDir,
    pub config: Configuration,
    patterns: HashMap<(BuffCategory, u8, TemplateVariant), GrayImage>,
}

impl AssetFixture {
    pub const TEMPLATE_SIZE: u32 = 12;
    pub const ICON_SIZE: (u32, u32) = (8, 4);
    pub const FRAME_SIZE: (u32, u32) = (96, 32);

    pub fn write() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut config = Configuration::default();
        config.asset_root = dir.path().join("assets");
        config.scale = 1.0;

        let template_dir = config.template_dir();
        let icon_dir = config.icon_dir();
        std::fs::create_dir_all(&template_dir).expect("template dir");
        std::fs::create_dir_all(&icon_dir).expect("icon dir");

        let mut patterns = HashMap::new();
        for (cat_idx, category) in BuffCategory::ALL.into_iter().enumerate() {
            for &count in category.valid_counts() {
                Self::icon(category, count)
                    .save(icon_dir.join(category.icon_file_name(count)))
                    .expect("write icon");
            }
            for &count in category.template_counts() {
                for (var_idx, &variant) in category.variants().iter().enumerate() {
                    let seed = 1000 + cat_idx as u32 * 100 + u32::from(count) * 2 + var_idx as u32;
                    let pattern = noise(Self::TEMPLATE_SIZE, Self::TEMPLATE_SIZE, seed);
                    pattern
                        .save(template_dir.join(category.template_file_name(count, variant)))
                        .expect("write template");
                    patterns.insert((category, count, variant), pattern);
                }
            }
        }

        Self {
            _dir: dir,
            config,
            patterns,
        }
    }

    /// Solid icon: the category's channel carries the count, alpha is fixed
    pub fn icon(category: BuffCategory, count: u8) -> RgbaImage {
        let mut pixel = [0u8, 0, 0, 60];
        let channel = match category {
            BuffCategory::Souls => 0,
            BuffCategory::Necrosis => 1,
            BuffCategory::DeathSparks => 2,
        };
        pixel[channel] = 10 + count * 10;
        RgbaImage::from_pixel(Self::ICON_SIZE.0, Self::ICON_SIZE.1, Rgba(pixel))
    }

    pub fn pattern(&self, category: BuffCategory, count: u8, variant: TemplateVariant) -> &GrayImage {
        &self.patterns[&(category, count, variant)]
    }

    /// Noise background with the given indicators pasted in per-category slots
    pub fn frame_showing(&self, shown: &[(BuffCategory, u8, TemplateVariant)]) -> CapturedFrame {
        let (w, h) = Self::FRAME_SIZE;
        let mut pixels = to_rgba(&noise(w, h, 4242));
        for &(category, count, variant) in shown {
            let slot = BuffCategory::ALL
                .iter()
                .position(|c| *c == category)
                .unwrap_or(0) as u32;
            paste(&mut pixels, self.pattern(category, count, variant), (2 + slot * 30, 10));
        }
        CapturedFrame::new(pixels)
    }

    /// Frame with no indicator visible
    pub fn empty_frame(&self) -> CapturedFrame {
        self.frame_showing(&[])
    }
}
