// SPDX-License-Identifier: MIT
//! # Edge-Aware Noise Reduction
//!
//! Bilateral-style smoothing. Every output pixel is a weighted average over a
//! `(2r + 1)^2` window where the weight falls off with both spatial distance
//! and RGB distance to the centre pixel, so strong edges contribute little to
//! each other.
//!
//! The smoothed estimate is blended back into the original:
//!
//! ```text
//! edge  = clamp(stddev(luma in window) / 0.5, 0, 1)
//! blend = clamp(noise_level * (1 - sharpness * edge), 0, 1)
//! out   = original + blend * (smoothed - original)
//! ```
//!
//! The stage is deterministic: the same input and parameters always produce
//! the same output bits.

use crate::buffer::{CHANNELS, PixelBuffer};
use crate::error::{PipelineError, Result};

pub const DEFAULT_RADIUS: u32 = 2;
pub const DEFAULT_SIGMA_SPATIAL: f32 = 1.5;
pub const DEFAULT_SIGMA_RANGE: f32 = 0.1;

/// Largest possible standard deviation of values confined to `[0, 1]`.
const MAX_STDDEV: f32 = 0.5;

#[derive(Clone, Debug)]
pub struct DenoiseStage {
    radius: u32,
    range_denominator: f32,
    /// Spatial weights for the window, row-major.
    spatial: Vec<f32>,
}

impl Default for DenoiseStage {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS, DEFAULT_SIGMA_SPATIAL, DEFAULT_SIGMA_RANGE)
    }
}

impl DenoiseStage {
    /// Sigmas below `1e-3` are raised to `1e-3`.
    pub fn new(radius: u32, sigma_spatial: f32, sigma_range: f32) -> Self {
        let sigma_spatial = sigma_spatial.max(1e-3);
        let sigma_range = sigma_range.max(1e-3);
        let r = radius as i32;
        let mut spatial = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
        for dy in -r..=r {
            for dx in -r..=r {
                let d2 = (dx * dx + dy * dy) as f32;
                spatial.push((-d2 / (2.0 * sigma_spatial * sigma_spatial)).exp());
            }
        }
        Self {
            radius,
            range_denominator: 2.0 * sigma_range * sigma_range,
            spatial,
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn apply(&self, buffer: PixelBuffer, noise_level: f32, sharpness: f32) -> Result<PixelBuffer> {
        if !(0.0..=1.0).contains(&noise_level) {
            return Err(PipelineError::invalid_parameter(
                "noise_level",
                noise_level,
                "must be within 0.0..=1.0",
            ));
        }
        if !(0.0..=1.0).contains(&sharpness) {
            return Err(PipelineError::invalid_parameter(
                "sharpness",
                sharpness,
                "must be within 0.0..=1.0",
            ));
        }
        if noise_level == 0.0 {
            return Ok(buffer);
        }

        let (width, height) = buffer.dimensions();
        let r = self.radius as isize;
        let window = self.spatial.len() as f32;
        let mut out = Vec::with_capacity(buffer.samples().len());

        for y in 0..height as isize {
            for x in 0..width as isize {
                let center = buffer.pixel_clamped(x, y);

                let mut acc = [0.0f32; CHANNELS];
                let mut weight_sum = 0.0f32;
                let mut luma_sum = 0.0f32;
                let mut luma_sq_sum = 0.0f32;
                let mut k = 0;
                for dy in -r..=r {
                    for dx in -r..=r {
                        let p = buffer.pixel_clamped(x + dx, y + dy);
                        let dr = p[0] - center[0];
                        let dg = p[1] - center[1];
                        let db = p[2] - center[2];
                        let w = self.spatial[k]
                            * (-(dr * dr + dg * dg + db * db) / self.range_denominator).exp();
                        for c in 0..CHANNELS {
                            acc[c] += p[c] * w;
                        }
                        weight_sum += w;

                        let l = luma(&p);
                        luma_sum += l;
                        luma_sq_sum += l * l;
                        k += 1;
                    }
                }

                let mean = luma_sum / window;
                let variance = (luma_sq_sum / window - mean * mean).max(0.0);
                let edge = (variance.sqrt() / MAX_STDDEV).min(1.0);
                let blend = (noise_level * (1.0 - sharpness * edge)).clamp(0.0, 1.0);

                // centre weight is always exp(0) * exp(0) = 1, so weight_sum >= 1
                for c in 0..CHANNELS {
                    let smoothed = acc[c] / weight_sum;
                    out.push(center[c] + blend * (smoothed - center[c]));
                }
            }
        }

        PixelBuffer::new(width, height, out)
    }
}

/// Rec. 709 luma.
#[inline]
fn luma(p: &[f32; 4]) -> f32 {
    0.2126 * p[0] + 0.7152 * p[1] + 0.0722 * p[2]
}
