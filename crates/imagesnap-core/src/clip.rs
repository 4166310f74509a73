//! Reference pixel clip driven by an [`ImageSnapInfo`].
//!
//! Two interpolation methods are available:
//! - **Bilinear**: fast, for previews
//! - **Lanczos3**: sharper, for export
//!
//! # Algorithm
//!
//! Inverse mapping: every output pixel is placed in crop box coordinates
//! (view units, origin at the box center), moved into the image's frame by
//! undoing the translation, rotation and zoom, and then converted to source
//! pixel coordinates:
//!
//! ```text
//! u   = output pixel center in crop box units, relative to the box center
//! r   = rotate(u - translation, -rotation) / scale
//! src = r * pixels_per_unit + source_pixels / 2 - 0.5
//! ```
//!
//! The output has `snap_size / scale` view units worth of source pixels on
//! each axis. Samples within half a pixel of the image edge are clamped to
//! the edge; farther out they are black.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapError};
use crate::records::ImageSnapInfo;

/// Interpolation filter for clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpolation {
    /// Fast bilinear interpolation - good for preview rendering.
    #[default]
    Bilinear,
    /// High-quality Lanczos3 interpolation - good for export.
    Lanczos3,
}

/// An RGB raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl SnapImage {
    /// Wrap an RGB buffer.
    ///
    /// # Errors
    ///
    /// Returns [`SnapError::PixelBufferMismatch`] if `pixels` is not exactly
    /// `width * height * 3` bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(SnapError::PixelBufferMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Convert to an `image::RgbImage` for encoding or further processing.
    pub fn into_rgb_image(self) -> Result<image::RgbImage> {
        let expected = self.width as usize * self.height as usize * 3;
        let actual = self.pixels.len();
        image::RgbImage::from_raw(self.width, self.height, self.pixels)
            .ok_or(SnapError::PixelBufferMismatch { expected, actual })
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    #[inline]
    fn pixel_f64(&self, px: usize, py: usize) -> [f64; 3] {
        let idx = (py * self.width as usize + px) * 3;
        [
            self.pixels[idx] as f64,
            self.pixels[idx + 1] as f64,
            self.pixels[idx + 2] as f64,
        ]
    }
}

impl From<image::RgbImage> for SnapImage {
    fn from(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }
}

/// Largest output raster `clip_image` will allocate, in pixels.
pub const MAX_OUTPUT_PIXELS: u64 = 100_000_000;

/// Round the requested output size to whole pixels, at least 1x1.
fn output_dimensions(width: f64, height: f64) -> Result<(u32, u32)> {
    let to_pixels = |value: f64| -> Option<u64> {
        let rounded = value.round().max(1.0);
        (rounded.is_finite() && rounded <= MAX_OUTPUT_PIXELS as f64).then_some(rounded as u64)
    };
    let too_large = || {
        SnapError::InvalidSnapInfo(format!(
            "output of {width:.0}x{height:.0} pixels exceeds the {MAX_OUTPUT_PIXELS} pixel limit"
        ))
    };

    let (w, h) = to_pixels(width).zip(to_pixels(height)).ok_or_else(too_large)?;
    match w.checked_mul(h) {
        Some(total) if total <= MAX_OUTPUT_PIXELS => Ok((w as u32, h as u32)),
        _ => Err(too_large()),
    }
}

/// Cut the crop described by `info` out of `image`.
///
/// `info.source_size` is the image's size in view units; the ratio between
/// it and the pixel dimensions sets the output resolution.
///
/// # Errors
///
/// Returns [`SnapError::InvalidSnapInfo`] for unusable geometry or an output
/// larger than [`MAX_OUTPUT_PIXELS`], and [`SnapError::EmptyImage`] for an
/// image with no pixels.
pub fn clip_image(
    image: &SnapImage,
    info: &ImageSnapInfo,
    interpolation: Interpolation,
) -> Result<SnapImage> {
    info.validate()?;
    if image.is_empty() {
        return Err(SnapError::EmptyImage {
            width: image.width as f64,
            height: image.height as f64,
        });
    }

    let (src_w, src_h) = (image.width as f64, image.height as f64);
    let per_unit_x = src_w / info.source_size.width;
    let per_unit_y = src_h / info.source_size.height;

    let snap = info.snap_size;
    let (dst_w, dst_h) = output_dimensions(
        snap.width / info.scale * per_unit_x,
        snap.height / info.scale * per_unit_y,
    )?;

    let cos = (-info.rotation).cos();
    let sin = (-info.rotation).sin();
    let step_x = snap.width / dst_w as f64;
    let step_y = snap.height / dst_h as f64;

    tracing::debug!(dst_w, dst_h, ?interpolation, "clipping image");

    let mut output = vec![0u8; dst_w as usize * dst_h as usize * 3];

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            // Output pixel center relative to the image center, in view units
            let ux = (dst_x as f64 + 0.5) * step_x - snap.width / 2.0 - info.translation.x;
            let uy = (dst_y as f64 + 0.5) * step_y - snap.height / 2.0 - info.translation.y;

            let rx = (ux * cos - uy * sin) / info.scale;
            let ry = (ux * sin + uy * cos) / info.scale;

            let src_x = rx * per_unit_x + src_w / 2.0 - 0.5;
            let src_y = ry * per_unit_y + src_h / 2.0 - 0.5;

            let pixel = match interpolation {
                Interpolation::Bilinear => sample_bilinear(image, src_x, src_y),
                Interpolation::Lanczos3 => sample_lanczos3(image, src_x, src_y),
            };

            let dst_idx = (dst_y as usize * dst_w as usize + dst_x as usize) * 3;
            output[dst_idx..dst_idx + 3].copy_from_slice(&pixel);
        }
    }

    Ok(SnapImage {
        width: dst_w,
        height: dst_h,
        pixels: output,
    })
}

/// Bilinear sample with edge clamping.
fn sample_bilinear(image: &SnapImage, x: f64, y: f64) -> [u8; 3] {
    let (w, h) = (image.width as f64, image.height as f64);

    // More than half a pixel outside the image
    if x < -0.5 || x > w - 0.5 || y < -0.5 || y > h - 0.5 {
        return [0, 0, 0];
    }

    let x = x.clamp(0.0, w - 1.0);
    let y = y.clamp(0.0, h - 1.0);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(image.width as usize - 1);
    let y1 = (y0 + 1).min(image.height as usize - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = image.pixel_f64(x0, y0);
    let p10 = image.pixel_f64(x1, y0);
    let p01 = image.pixel_f64(x0, y1);
    let p11 = image.pixel_f64(x1, y1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Lanczos3 sample over a 6x6 neighborhood. Falls back to bilinear near the
/// edges, where the kernel would leave the image.
fn sample_lanczos3(image: &SnapImage, x: f64, y: f64) -> [u8; 3] {
    let (w, h) = (image.width as i64, image.height as i64);

    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(image, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;
            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);

            let pixel = image.pixel_f64(px as usize, py as usize);
            for i in 0..3 {
                sum[i] += pixel[i] * weight;
            }
            weight_sum += weight;
        }
    }

    let mut result = [0u8; 3];
    if weight_sum > 0.0 {
        for i in 0..3 {
            result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }

    result
}

/// Lanczos kernel: `sinc(x) * sinc(x / a)` for `|x| < a`, else 0.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
