// Core capture types and traits
use super::error::{CaptureError, CaptureResult};
use crate::config::CaptureRegion;
use image::{GrayImage, Luma, RgbaImage};
use imageproc::definitions::Image;
use imageproc::integral_image::{integral_image, integral_squared_image};

/// One immutable snapshot of the capture region.
///
/// The intensity channel and its integral images are derived once here so
/// every template matched during the cycle shares them.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pixels: RgbaImage,
    gray: GrayImage,
    sum: Image<Luma<u64>>,
    squared_sum: Image<Luma<u64>>,
}

impl CapturedFrame {
    pub fn new(pixels: RgbaImage) -> Self {
        let gray = image::imageops::grayscale(&pixels);
        let sum = integral_image::<_, u64>(&gray);
        let squared_sum = integral_squared_image::<_, u64>(&gray);
        Self {
            pixels,
            gray,
            sum,
            squared_sum,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Single intensity channel of the frame
    pub fn gray(&self) -> &GrayImage {
        &self.gray
    }

    /// Sum and sum of squares of the intensity window `[x, x+w) x [y, y+h)`.
    /// Caller guarantees the window lies inside the frame.
    pub fn window_sums(&self, x: u32, y: u32, w: u32, h: u32) -> (u64, u64) {
        (
            Self::rect_sum(&self.sum, x, y, w, h),
            Self::rect_sum(&self.squared_sum, x, y, w, h),
        )
    }

    // Integral images are one pixel larger than the source with a zero first row/column
    fn rect_sum(integral: &Image<Luma<u64>>, x: u32, y: u32, w: u32, h: u32) -> u64 {
        let at = |px: u32, py: u32| integral.get_pixel(px, py)[0];
        (at(x + w, y + h) + at(x, y)) - (at(x, y + h) + at(x + w, y))
    }
}

/// Trait implemented by every capture backend (live display, still image)
pub trait ScreenCapturer: Send {
    /// Capture exactly `region` at the time of the call
    fn capture(&mut self, region: &CaptureRegion) -> CaptureResult<CapturedFrame>;

    fn name(&self) -> &str;
}

/// Crop `region` out of a source surface whose top-left sits at `origin`
/// in desktop coordinates.
pub(crate) fn crop_region(
    source: &RgbaImage,
    origin: (i32, i32),
    region: &CaptureRegion,
) -> CaptureResult<RgbaImage> {
    let out_of_bounds = || CaptureError::RegionOutOfBounds {
        region: *region,
        width: source.width(),
        height: source.height(),
    };

    let left = i64::from(region.left) - i64::from(origin.0);
    let top = i64::from(region.top) - i64::from(origin.1);
    if left < 0
        || top < 0
        || left + i64::from(region.width) > i64::from(source.width())
        || top + i64::from(region.height) > i64::from(source.height())
    {
        return Err(out_of_bounds());
    }

    Ok(image::imageops::crop_imm(
        source,
        left as u32,
        top as u32,
        region.width,
        region.height,
    )
    .to_image())
}
