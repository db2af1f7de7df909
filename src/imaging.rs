//! # Image Interop
//!
//! Conversions between [`PixelBuffer`] and the `image` crate's buffers, plus
//! file load/save helpers for the CLI. The filter core itself never sees a
//! file format; decoding and encoding happen only here.

use std::path::Path;

use enhance_filters::{PipelineError, PixelBuffer};
use image::{DynamicImage, ImageFormat, Rgba32FImage, RgbaImage};
use tracing::debug;

use crate::error::{EnhanceError, EnhanceResult};

/// Convert any decoded image to normalized RGBA samples.
pub fn from_dynamic(image: &DynamicImage) -> EnhanceResult<PixelBuffer> {
    let rgba = image.to_rgba32f();
    let (width, height) = rgba.dimensions();
    Ok(PixelBuffer::new(width, height, rgba.into_raw())?)
}

/// Convert 8-bit RGBA to normalized samples (`v / 255`).
pub fn from_rgba8(image: &RgbaImage) -> EnhanceResult<PixelBuffer> {
    let (width, height) = image.dimensions();
    let samples = image.as_raw().iter().map(|&v| v as f32 / 255.0).collect();
    Ok(PixelBuffer::new(width, height, samples)?)
}

/// Quantize to 8-bit RGBA, rounding and clamping each sample.
pub fn to_rgba8(buffer: &PixelBuffer) -> EnhanceResult<RgbaImage> {
    let raw: Vec<u8> = buffer
        .samples()
        .iter()
        .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();
    RgbaImage::from_raw(buffer.width(), buffer.height(), raw).ok_or_else(|| mismatch(buffer))
}

/// Copy into a 32-bit float RGBA image without quantization.
pub fn to_rgba32f(buffer: &PixelBuffer) -> EnhanceResult<Rgba32FImage> {
    Rgba32FImage::from_raw(buffer.width(), buffer.height(), buffer.samples().to_vec())
        .ok_or_else(|| mismatch(buffer))
}

fn mismatch(buffer: &PixelBuffer) -> EnhanceError {
    let expected = buffer.width() as usize * buffer.height() as usize * buffer.channels();
    EnhanceError::pipeline(PipelineError::InvalidDimensions {
        width: buffer.width(),
        height: buffer.height(),
        expected,
        actual: buffer.samples().len(),
    })
}

/// Decode an image file into a pixel buffer.
pub fn load(path: impl AsRef<Path>) -> EnhanceResult<PixelBuffer> {
    let path = path.as_ref();
    let image = image::open(path)
        .map_err(|e| EnhanceError::codec("decode", e).with_path(path.display().to_string()))?;
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "decoded source image"
    );
    from_dynamic(&image)
}

/// Encode a pixel buffer to `path`; the format follows the file extension.
///
/// Formats without an alpha channel (JPEG) receive the RGB channels only.
pub fn save(buffer: &PixelBuffer, path: impl AsRef<Path>) -> EnhanceResult<()> {
    let path = path.as_ref();
    let rgba = to_rgba8(buffer)?;
    let result = match ImageFormat::from_path(path) {
        Ok(ImageFormat::Jpeg) => DynamicImage::ImageRgba8(rgba).to_rgb8().save(path),
        _ => rgba.save(path),
    };
    result.map_err(|e| EnhanceError::codec("encode", e).with_path(path.display().to_string()))?;
    debug!(path = %path.display(), width = buffer.width(), height = buffer.height(), "wrote image");
    Ok(())
}
