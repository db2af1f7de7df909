//! # Enhancement Configuration
//!
//! Common interface between the CLI, configuration files and the filter core.
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Range | Description |
//! |-----------|------|-------|-------------|
//! | `scale_factor` | `f32` | (0, 16] | Uniform Lanczos upscale factor |
//! | `noise_level` | `f32` | 0-1 | Edge-aware smoothing strength |
//! | `sharpness` | `f32` | 0-1 | Edge protection while smoothing |
//! | `unsharp_radius` | `f32` | 0-10 | Unsharp mask radius in pixels |
//! | `unsharp_intensity` | `f32` | 0-1 | Unsharp mask gain |
//! | `backend` | `String` | `native`, `simd` | Resample implementation |
//! | `lanczos_lobes` | `u32` | 1-8 | Lanczos window size |
//! | `denoise_radius` | `u32` | 0-8 | Denoise window is `2r + 1` wide |
//! | `denoise_sigma_spatial` | `f32` | (0, 10] | Spatial falloff of the denoise weights |
//! | `denoise_sigma_range` | `f32` | (0, 1] | Color-distance falloff of the denoise weights |
//! | `median_radius` | `u32` | 0-4 | Median window is `2r + 1` wide |
//!
//! Defaults are the starting slider values of the interactive demo: 4x upscale,
//! noise 0.02, sharpness 0.4, radius 2.5, intensity 0.8.
//!
//! ## Examples
//!
//! ```rust
//! use image_enhance::config::EnhanceConfig;
//!
//! let config = EnhanceConfig::default();
//! assert!(config.validate().is_ok());
//!
//! let params = config.to_filter_parameters();
//! assert_eq!(params.scale_factor, 4.0);
//! ```
//!
//! A JSON file may set any subset of the fields:
//!
//! ```json
//! { "scale_factor": 2.0, "noise_level": 0.1, "backend": "simd" }
//! ```

use std::path::Path;

use clap::ValueEnum;
use enhance_filters::{
    EnhancePreset, FilterParameters, Pipeline, PipelineSettings, ResampleBackend,
};
use serde::{Deserialize, Serialize};

use crate::error::{EnhanceError, EnhanceResult};

/// Largest accepted upscale factor.
pub const MAX_SCALE_FACTOR: f32 = 16.0;
/// Largest accepted unsharp radius. Larger radii blur away all detail at
/// typical upscale sizes while costing `O(radius)` per sample.
pub const MAX_UNSHARP_RADIUS: f32 = 10.0;

/// Configuration for one enhancement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    pub scale_factor: f32,
    pub noise_level: f32,
    pub sharpness: f32,
    pub unsharp_radius: f32,
    pub unsharp_intensity: f32,
    /// `native` or `simd`.
    pub backend: String,
    pub lanczos_lobes: u32,
    pub denoise_radius: u32,
    pub denoise_sigma_spatial: f32,
    pub denoise_sigma_range: f32,
    pub median_radius: u32,
}

impl Default for EnhanceConfig {
    /// Demo defaults with the stock pipeline constants.
    fn default() -> Self {
        Self::from_preset(EnhancePreset::Demo)
    }
}

impl EnhanceConfig {
    pub fn new(
        scale_factor: f32,
        noise_level: f32,
        sharpness: f32,
        unsharp_radius: f32,
        unsharp_intensity: f32,
    ) -> Self {
        Self::from_parameters(FilterParameters::new(
            scale_factor,
            noise_level,
            sharpness,
            unsharp_radius,
            unsharp_intensity,
        ))
    }

    pub fn from_preset(preset: EnhancePreset) -> Self {
        Self::from_parameters(preset.parameters())
    }

    fn from_parameters(params: FilterParameters) -> Self {
        let settings = PipelineSettings::default();
        Self {
            scale_factor: params.scale_factor,
            noise_level: params.noise_level,
            sharpness: params.sharpness,
            unsharp_radius: params.unsharp_radius,
            unsharp_intensity: params.unsharp_intensity,
            backend: "native".to_string(),
            lanczos_lobes: settings.lanczos_lobes,
            denoise_radius: settings.denoise_radius,
            denoise_sigma_spatial: settings.denoise_sigma_spatial,
            denoise_sigma_range: settings.denoise_sigma_range,
            median_radius: settings.median_radius,
        }
    }

    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> EnhanceResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            EnhanceError::io("read config", e).with_path(path.display().to_string())
        })?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| EnhanceError::from(e).with_context(path.display().to_string()))?;
        Ok(config)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.scale_factor > 0.0 && self.scale_factor <= MAX_SCALE_FACTOR) {
            return Err(format!(
                "Scale factor must be greater than 0 and at most {}",
                MAX_SCALE_FACTOR
            ));
        }
        if !(0.0..=1.0).contains(&self.noise_level) {
            return Err("Noise level must be between 0 and 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.sharpness) {
            return Err("Sharpness must be between 0 and 1".to_string());
        }
        if !(0.0..=MAX_UNSHARP_RADIUS).contains(&self.unsharp_radius) {
            return Err(format!(
                "Unsharp radius must be between 0 and {}",
                MAX_UNSHARP_RADIUS
            ));
        }
        if !(0.0..=1.0).contains(&self.unsharp_intensity) {
            return Err("Unsharp intensity must be between 0 and 1".to_string());
        }
        if !(1..=8).contains(&self.lanczos_lobes) {
            return Err("Lanczos lobes must be between 1 and 8".to_string());
        }
        if self.denoise_radius > 8 {
            return Err("Denoise radius must be at most 8".to_string());
        }
        if !(self.denoise_sigma_spatial > 0.0 && self.denoise_sigma_spatial <= 10.0) {
            return Err("Denoise spatial sigma must be greater than 0 and at most 10".to_string());
        }
        if !(self.denoise_sigma_range > 0.0 && self.denoise_sigma_range <= 1.0) {
            return Err("Denoise range sigma must be greater than 0 and at most 1".to_string());
        }
        if self.median_radius > 4 {
            return Err("Median radius must be at most 4".to_string());
        }
        self.resample_backend()?;
        Ok(())
    }

    pub fn resample_backend(&self) -> Result<ResampleBackend, String> {
        ResampleBackend::from_str(&self.backend, true)
            .map_err(|_| format!("Unknown backend '{}'. Use: native, simd", self.backend))
    }

    pub fn to_filter_parameters(&self) -> FilterParameters {
        FilterParameters::new(
            self.scale_factor,
            self.noise_level,
            self.sharpness,
            self.unsharp_radius,
            self.unsharp_intensity,
        )
    }

    /// Build a pipeline from the tunable constants. Validates first.
    pub fn build_pipeline(&self) -> EnhanceResult<Pipeline> {
        self.validate()
            .map_err(|reason| EnhanceError::config("config", format!("{:?}", self), reason))?;
        let backend = self
            .resample_backend()
            .map_err(|reason| EnhanceError::config("backend", &self.backend, reason))?;

        Ok(Pipeline::builder()
            .lanczos_lobes(self.lanczos_lobes)
            .resample_backend(backend)
            .denoise_radius(self.denoise_radius)
            .denoise_sigmas(self.denoise_sigma_spatial, self.denoise_sigma_range)
            .median_radius(self.median_radius)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EnhanceConfig::default();
        assert_eq!(config.scale_factor, 4.0);
        assert_eq!(config.noise_level, 0.02);
        assert_eq!(config.sharpness, 0.4);
        assert_eq!(config.unsharp_radius, 2.5);
        assert_eq!(config.unsharp_intensity, 0.8);
        assert_eq!(config.backend, "native");
        assert_eq!(config.lanczos_lobes, 3);
    }

    #[test]
    fn test_config_validation() {
        let mut config = EnhanceConfig::default();
        assert!(config.validate().is_ok());

        config.scale_factor = 0.0;
        assert!(config.validate().is_err());
        config.scale_factor = 20.0;
        assert!(config.validate().is_err());
        config.scale_factor = 2.0; // Reset

        config.noise_level = 1.5;
        assert!(config.validate().is_err());
        config.noise_level = 0.1; // Reset

        config.unsharp_radius = 11.0;
        assert!(config.validate().is_err());
        config.unsharp_radius = 2.5; // Reset

        config.backend = "gpu".to_string();
        assert!(config.validate().is_err());
        config.backend = "SIMD".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.resample_backend().unwrap(), ResampleBackend::Simd);

        config.lanczos_lobes = 0;
        assert!(config.validate().is_err());
        config.lanczos_lobes = 3; // Reset

        config.denoise_sigma_range = 0.0;
        assert!(config.validate().is_err());
        config.denoise_sigma_range = 0.1; // Reset

        config.denoise_sigma_spatial = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EnhanceConfig =
            serde_json::from_str(r#"{ "scale_factor": 2.0, "backend": "simd" }"#).unwrap();
        assert_eq!(config.scale_factor, 2.0);
        assert_eq!(config.noise_level, 0.02);
        assert_eq!(config.backend, "simd");
    }

    #[test]
    fn test_build_pipeline_applies_constants() {
        let mut config = EnhanceConfig::from_preset(EnhancePreset::Crisp);
        config.median_radius = 2;
        config.denoise_sigma_spatial = 2.0;
        config.denoise_sigma_range = 0.25;
        let pipeline = config.build_pipeline().unwrap();
        assert_eq!(pipeline.settings().median_radius, 2);
        assert_eq!(pipeline.settings().denoise_sigma_spatial, 2.0);
        assert_eq!(pipeline.settings().denoise_sigma_range, 0.25);

        config.median_radius = 9;
        let err = config.build_pipeline().unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_to_filter_parameters() {
        let params = EnhanceConfig::new(2.0, 0.1, 0.2, 1.0, 0.5).to_filter_parameters();
        assert_eq!(params, FilterParameters::new(2.0, 0.1, 0.2, 1.0, 0.5));
        assert_eq!(params.aspect_ratio, 1.0);
    }
}
