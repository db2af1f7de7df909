//! # Image Enhance
//!
//! Upscale and clean up images with a fixed Lanczos → denoise → unsharp mask →
//! median chain. The pixel work lives in the `enhance-filters` crate; this
//! crate adds configuration, file I/O, error context and a tuning session for
//! interactive front-ends.
//!
//! ## Architecture
//!
//! - `config`: validated run configuration, JSON config files
//! - `error`: application errors with context and recovery hints
//! - `imaging`: `PixelBuffer` ↔ `image` crate conversions, load/save
//! - `session`: last-write-wins re-runs for slider-driven tuning
//! - `logging`: `tracing` subscriber setup for the binaries
//!
//! ## Example
//!
//! ```rust,no_run
//! use image_enhance::{enhance_file, EnhanceOptions};
//! use image_enhance::config::EnhanceConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = EnhanceOptions {
//!     input: "photo.jpg".into(),
//!     output: "photo_enhanced.png".into(),
//!     config: EnhanceConfig::default(),
//! };
//!
//! let summary = enhance_file(&options)?;
//! println!("{}x{} -> {}x{}",
//!     summary.original_size.0, summary.original_size.1,
//!     summary.scaled_size.0, summary.scaled_size.1);
//! # Ok(())
//! # }
//! ```

// Standard library imports
use std::path::{Path, PathBuf};

// External crate imports
use enhance_filters::PipelineReport;
use tracing::info;

// Internal module imports
pub mod config;
pub mod error;
pub mod imaging;
pub mod logging;
pub mod session;

/// Re-export error types for convenience
pub use error::{
    EnhanceError, EnhanceResult, HasRecoverySuggestion, HasSeverity, Recoverable,
};

/// Re-export the filter core
pub use enhance_filters;

/// Everything needed to enhance one image file.
#[derive(Debug, Clone)]
pub struct EnhanceOptions {
    /// Source image path; any format the `image` crate decodes.
    pub input: PathBuf,
    /// Destination path. The extension picks the encoder.
    pub output: PathBuf,
    pub config: config::EnhanceConfig,
}

/// What a file run produced.
#[derive(Debug, Clone)]
pub struct EnhanceSummary {
    pub original_size: (u32, u32),
    pub scaled_size: (u32, u32),
    pub report: PipelineReport,
}

/// `<dir>/<stem>_enhanced.png` next to `input`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{}_enhanced.png", stem))
}

/// Decode `options.input`, run the pipeline and encode `options.output`.
pub fn enhance_file(options: &EnhanceOptions) -> EnhanceResult<EnhanceSummary> {
    let pipeline = options.config.build_pipeline()?;
    let params = options.config.to_filter_parameters();

    let source = imaging::load(&options.input)?;
    let (enhanced, report) = pipeline
        .run_with_report(&source, &params)
        .map_err(|e| EnhanceError::pipeline(e).with_operation("enhance_file"))?;
    imaging::save(&enhanced, &options.output)?;

    info!(
        input = %options.input.display(),
        output = %options.output.display(),
        elapsed_ms = report.total().as_secs_f64() * 1000.0,
        "enhanced image"
    );

    Ok(EnhanceSummary {
        original_size: source.dimensions(),
        scaled_size: enhanced.dimensions(),
        report,
    })
}
