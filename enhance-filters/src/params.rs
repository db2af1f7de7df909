// SPDX-License-Identifier: MIT
//! # Filter Parameters and Presets
//!
//! [`FilterParameters`] is the immutable value handed to a pipeline run. It is
//! validated once, up front, so stages can assume their inputs are in range.
//!
//! ## Ranges
//!
//! | Field | Range | Notes |
//! |-------|-------|-------|
//! | `scale_factor` | `> 0` | practically 1.0–8.0 |
//! | `aspect_ratio` | `1.0` | anything else is a non-uniform scale |
//! | `noise_level` | 0.0–1.0 | 0 disables denoising |
//! | `sharpness` | 0.0–1.0 | edge protection during denoising |
//! | `unsharp_radius` | 0 to [`MAX_RADIUS`](crate::sharpen::MAX_RADIUS) | 0 disables the unsharp mask |
//! | `unsharp_intensity` | 0.0–1.0 | |

use crate::error::{PipelineError, Result};
use crate::sharpen;

/// Parameters for one pipeline run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterParameters {
    /// Uniform upscale factor applied by the resample stage.
    pub scale_factor: f32,
    /// Horizontal/vertical scale ratio. Must stay at 1.0.
    pub aspect_ratio: f32,
    /// Strength of the edge-aware smoothing.
    pub noise_level: f32,
    /// How strongly edges are protected from smoothing.
    pub sharpness: f32,
    /// Unsharp mask radius in pixels (about 3 sigma).
    pub unsharp_radius: f32,
    /// Unsharp mask gain.
    pub unsharp_intensity: f32,
}

impl Default for FilterParameters {
    /// The values the interactive demo starts from.
    fn default() -> Self {
        EnhancePreset::Demo.parameters()
    }
}

impl FilterParameters {
    pub fn new(
        scale_factor: f32,
        noise_level: f32,
        sharpness: f32,
        unsharp_radius: f32,
        unsharp_intensity: f32,
    ) -> Self {
        Self {
            scale_factor,
            aspect_ratio: 1.0,
            noise_level,
            sharpness,
            unsharp_radius,
            unsharp_intensity,
        }
    }

    /// Parameters under which every stage preserves a flat image.
    pub fn identity(scale_factor: f32) -> Self {
        Self::new(scale_factor, 0.0, 0.0, 0.0, 0.0)
    }

    /// Check every field, failing with [`PipelineError::InvalidParameter`] on the first bad one.
    pub fn validate(&self) -> Result<()> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            return Err(PipelineError::invalid_parameter(
                "scale_factor",
                self.scale_factor,
                "must be finite and greater than 0",
            ));
        }
        if self.aspect_ratio != 1.0 {
            return Err(PipelineError::invalid_parameter(
                "aspect_ratio",
                self.aspect_ratio,
                "non-uniform scaling is not supported",
            ));
        }
        check_unit("noise_level", self.noise_level)?;
        check_unit("sharpness", self.sharpness)?;
        if !self.unsharp_radius.is_finite() || self.unsharp_radius < 0.0 {
            return Err(PipelineError::invalid_parameter(
                "unsharp_radius",
                self.unsharp_radius,
                "must be finite and non-negative",
            ));
        }
        if self.unsharp_radius > sharpen::MAX_RADIUS {
            return Err(PipelineError::invalid_parameter(
                "unsharp_radius",
                self.unsharp_radius,
                "exceeds the largest supported blur kernel",
            ));
        }
        check_unit("unsharp_intensity", self.unsharp_intensity)
    }
}

fn check_unit(name: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PipelineError::invalid_parameter(
            name,
            value,
            "must be within 0.0..=1.0",
        ))
    }
}

/// Named parameter sets for common enhancement goals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum EnhancePreset {
    /// 4x upscale with the slider defaults of the original demo
    #[clap(name = "demo")]
    Demo,
    /// 2x upscale, stronger smoothing, soft sharpening
    #[clap(name = "gentle")]
    Gentle,
    /// 2x upscale, light smoothing, strong sharpening
    #[clap(name = "crisp")]
    Crisp,
    /// 2x Lanczos upscale only
    #[clap(name = "upscale-only")]
    UpscaleOnly,
}

impl EnhancePreset {
    pub fn parameters(self) -> FilterParameters {
        match self {
            EnhancePreset::Demo => FilterParameters::new(4.0, 0.02, 0.4, 2.5, 0.8),
            EnhancePreset::Gentle => FilterParameters::new(2.0, 0.3, 0.6, 1.5, 0.4),
            EnhancePreset::Crisp => FilterParameters::new(2.0, 0.05, 0.2, 3.0, 1.0),
            EnhancePreset::UpscaleOnly => FilterParameters::identity(2.0),
        }
    }
}
