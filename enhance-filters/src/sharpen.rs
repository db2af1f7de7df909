// SPDX-License-Identifier: MIT
//! Unsharp masking: `out = clamp(x + intensity * (x - gaussian(x)), 0, 1)`.
//!
//! The blur uses `sigma = radius / 3` with a separable kernel of half-width
//! `ceil(3 * sigma)` and replicated edges. Radii too small to produce a
//! non-trivial kernel act as identity; radii above [`MAX_RADIUS`] are rejected.

use crate::buffer::{CHANNELS, PixelBuffer};
use crate::error::{PipelineError, Result};

/// Largest accepted radius. The blur kernel spans `2 * ceil(radius) + 1` taps.
pub const MAX_RADIUS: f32 = 4096.0;

/// Below this sigma every off-centre tap underflows to zero.
const MIN_SIGMA: f32 = 1e-3;

#[derive(Clone, Copy, Debug, Default)]
pub struct SharpenStage;

impl SharpenStage {
    pub fn apply(&self, buffer: PixelBuffer, radius: f32, intensity: f32) -> Result<PixelBuffer> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(PipelineError::invalid_parameter(
                "unsharp_radius",
                radius,
                "must be finite and non-negative",
            ));
        }
        if radius > MAX_RADIUS {
            return Err(PipelineError::invalid_parameter(
                "unsharp_radius",
                radius,
                "exceeds the largest supported blur kernel",
            ));
        }
        if !(0.0..=1.0).contains(&intensity) {
            return Err(PipelineError::invalid_parameter(
                "unsharp_intensity",
                intensity,
                "must be within 0.0..=1.0",
            ));
        }
        let sigma = radius / 3.0;
        if sigma < MIN_SIGMA {
            return Ok(buffer);
        }

        let blurred = gaussian_blur(&buffer, sigma);
        let mut out = buffer;
        for (v, b) in out.samples_mut().iter_mut().zip(&blurred) {
            *v = (*v + intensity * (*v - b)).clamp(0.0, 1.0);
        }
        Ok(out)
    }
}

/// Normalized 1D Gaussian kernel of half-width `ceil(3 * sigma)`.
fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let half = (3.0 * sigma).ceil().max(1.0) as i32;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-half..=half)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for k in kernel.iter_mut() {
        *k /= sum;
    }
    kernel
}

/// Separable Gaussian blur, returned as raw interleaved samples.
fn gaussian_blur(buffer: &PixelBuffer, sigma: f32) -> Vec<f32> {
    let kernel = gaussian_kernel(sigma);
    let half = (kernel.len() / 2) as isize;
    let (w, h) = (buffer.width() as isize, buffer.height() as isize);
    let src = buffer.samples();
    let at = |x: isize, y: isize| ((y * w + x) as usize) * CHANNELS;

    let mut horizontal = vec![0.0f32; src.len()];
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; CHANNELS];
            for (i, k) in kernel.iter().enumerate() {
                let sx = (x + i as isize - half).clamp(0, w - 1);
                let o = at(sx, y);
                for c in 0..CHANNELS {
                    acc[c] += src[o + c] * k;
                }
            }
            let o = at(x, y);
            horizontal[o..o + CHANNELS].copy_from_slice(&acc);
        }
    }

    let mut out = vec![0.0f32; src.len()];
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; CHANNELS];
            for (i, k) in kernel.iter().enumerate() {
                let sy = (y + i as isize - half).clamp(0, h - 1);
                let o = at(x, sy);
                for c in 0..CHANNELS {
                    acc[c] += horizontal[o + c] * k;
                }
            }
            let o = at(x, y);
            out[o..o + CHANNELS].copy_from_slice(&acc);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: u32) -> PixelBuffer {
        let mut samples = Vec::new();
        for _ in 0..3 {
            for x in 0..width {
                let v = if x < width / 2 { 0.3 } else { 0.7 };
                samples.extend_from_slice(&[v, v * 0.5, 1.0 - v, 1.0]);
            }
        }
        PixelBuffer::new(width, 3, samples).unwrap()
    }

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        for sigma in [0.2f32, 0.8, 2.5] {
            let k = gaussian_kernel(sigma);
            assert_eq!(k.len() % 2, 1);
            assert!((k.iter().sum::<f32>() - 1.0).abs() < 1e-5);
            for i in 0..k.len() / 2 {
                assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-7);
            }
        }
    }

    #[test]
    fn zero_radius_is_identity() {
        let src = ramp(10);
        let out = SharpenStage.apply(src.clone(), 0.0, 1.0).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn zero_intensity_leaves_in_range_samples_alone() {
        let src = ramp(10);
        let out = SharpenStage.apply(src.clone(), 2.5, 0.0).unwrap();
        for (a, b) in src.samples().iter().zip(out.samples()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn increases_edge_contrast() {
        let src = ramp(12);
        let out = SharpenStage.apply(src.clone(), 3.0, 1.0).unwrap();
        // dark side of the edge gets darker, bright side brighter
        assert!(out.sample(5, 1, 0).unwrap() < src.sample(5, 1, 0).unwrap());
        assert!(out.sample(6, 1, 0).unwrap() > src.sample(6, 1, 0).unwrap());
        assert!(out.samples().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn flat_image_is_preserved() {
        let src = PixelBuffer::filled(5, 5, [0.4, 0.4, 0.4, 1.0]).unwrap();
        let out = SharpenStage.apply(src.clone(), 2.0, 1.0).unwrap();
        for (a, b) in src.samples().iter().zip(out.samples()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn vanishing_radius_stays_finite() {
        let src = ramp(6);
        for radius in [1e-30f32, 1e-10, 1e-3] {
            let out = SharpenStage.apply(src.clone(), radius, 1.0).unwrap();
            assert!(out.samples().iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)));
            assert_eq!(out, src);
        }
    }

    #[test]
    fn rejects_oversized_radius() {
        let src = PixelBuffer::filled(2, 2, [0.5; 4]).unwrap();
        assert!(matches!(
            SharpenStage.apply(src, 1e9, 0.5),
            Err(PipelineError::InvalidParameter { name: "unsharp_radius", .. })
        ));
    }

    #[test]
    fn rejects_negative_radius() {
        let src = PixelBuffer::filled(2, 2, [0.5; 4]).unwrap();
        assert!(matches!(
            SharpenStage.apply(src, -1.0, 0.5),
            Err(PipelineError::InvalidParameter { name: "unsharp_radius", .. })
        ));
    }
}
