// SPDX-License-Identifier: MIT
//! # enhance-filters: CPU Upscale and Enhancement Pipeline
//!
//! Pure, synchronous pixel processing on RGBA `f32` buffers. A source image is
//! upscaled with a Lanczos kernel and then cleaned up by three fixed filters.
//!
//! ## Key Components
//!
//! - [`buffer`]: [`PixelBuffer`], the owned sample grid passed between stages
//! - [`params`]: [`FilterParameters`] and named [`EnhancePreset`]s
//! - [`resample`]: separable Lanczos upscaling (native or `fast_image_resize`)
//! - [`denoise`]: bilateral-style edge-aware smoothing
//! - [`sharpen`]: Gaussian unsharp mask
//! - [`median`]: per-channel median for residual speckle
//! - [`pipeline`]: the fixed Resample → Denoise → Sharpen → Median chain
//!
//! ## Usage Example
//!
//! ```rust
//! use enhance_filters::{FilterParameters, Pipeline, PixelBuffer};
//!
//! let source = PixelBuffer::filled(2, 2, [1.0; 4])?;
//! let out = Pipeline::new().run(&source, &FilterParameters::identity(2.0))?;
//! assert_eq!(out.dimensions(), (4, 4));
//! # Ok::<(), enhance_filters::PipelineError>(())
//! ```
//!
//! ## Concurrency
//!
//! Nothing here blocks or shares mutable state. Run it on a worker thread if
//! the caller must stay responsive.

pub mod buffer;
pub mod denoise;
pub mod error;
pub mod median;
pub mod params;
pub mod pipeline;
pub mod resample;
pub mod sharpen;

pub use buffer::{CHANNELS, PixelBuffer};
pub use error::{PipelineError, Result};
pub use params::{EnhancePreset, FilterParameters};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineReport, PipelineSettings, StageKind, StageReport};
pub use resample::ResampleBackend;
