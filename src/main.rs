use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use enhance_filters::{EnhancePreset, ResampleBackend};
use image_enhance::config::EnhanceConfig;
use image_enhance::{EnhanceOptions, HasRecoverySuggestion};

/// Upscale an image with Lanczos resampling, then denoise, sharpen and
/// despeckle it.
#[derive(Parser, Debug)]
#[command(name = "enhance")]
#[command(about = "Upscale and enhance an image")]
#[command(long_about = "Upscale an image with a Lanczos kernel, then apply edge-aware noise reduction,
an unsharp mask and a 3x3 median. Start from a preset and override individual values.")]
struct Args {
    /// Source image (PNG, JPEG, ...)
    input: PathBuf,

    /// Output path [default: <input stem>_enhanced.png]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Starting parameter set
    #[arg(short, long, value_enum, default_value_t = EnhancePreset::Demo)]
    preset: EnhancePreset,

    /// JSON configuration file; replaces the preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Uniform upscale factor
    #[arg(short, long)]
    scale: Option<f32>,

    /// Noise reduction strength, 0-1
    #[arg(long)]
    noise_level: Option<f32>,

    /// Edge protection during noise reduction, 0-1
    #[arg(long)]
    sharpness: Option<f32>,

    /// Unsharp mask radius in pixels, 0-10
    #[arg(long)]
    unsharp_radius: Option<f32>,

    /// Unsharp mask intensity, 0-1
    #[arg(long)]
    unsharp_intensity: Option<f32>,

    /// Resample implementation
    #[arg(long, value_enum)]
    backend: Option<ResampleBackend>,

    /// Log per-stage timings
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<(EnhanceConfig, PathBuf, PathBuf)> {
        let mut config = match &self.config {
            Some(path) => EnhanceConfig::load(path)?,
            None => EnhanceConfig::from_preset(self.preset),
        };

        if let Some(v) = self.scale {
            config.scale_factor = v;
        }
        if let Some(v) = self.noise_level {
            config.noise_level = v;
        }
        if let Some(v) = self.sharpness {
            config.sharpness = v;
        }
        if let Some(v) = self.unsharp_radius {
            config.unsharp_radius = v;
        }
        if let Some(v) = self.unsharp_intensity {
            config.unsharp_intensity = v;
        }
        if let Some(backend) = self.backend {
            config.backend = match backend {
                ResampleBackend::Native => "native",
                ResampleBackend::Simd => "simd",
            }
            .to_string();
        }

        let output = self
            .output
            .unwrap_or_else(|| image_enhance::default_output_path(&self.input));
        Ok((config, self.input, output))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    image_enhance::logging::init(args.verbose);

    let (config, input, output) = args.into_config()?;
    config.validate().map_err(anyhow::Error::msg)?;

    let options = EnhanceOptions {
        input,
        output,
        config,
    };

    let summary = match image_enhance::enhance_file(&options) {
        Ok(summary) => summary,
        Err(e) => {
            if let Some(hint) = e.recovery_suggestion() {
                eprintln!("hint: {}", hint);
            }
            return Err(e).with_context(|| format!("failed to enhance {}", options.input.display()));
        }
    };

    println!(
        "Original size: {} x {}",
        summary.original_size.0, summary.original_size.1
    );
    println!(
        "Scaled size: {} x {}",
        summary.scaled_size.0, summary.scaled_size.1
    );
    for stage in &summary.report.stages {
        tracing::debug!(
            stage = stage.stage.name(),
            ms = stage.elapsed.as_secs_f64() * 1000.0,
            "stage timing"
        );
    }
    println!("Saved {}", options.output.display());
    Ok(())
}
