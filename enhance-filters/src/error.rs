// SPDX-License-Identifier: MIT
//! Failure kinds reported by buffers and stages.

use thiserror::Error;

/// Errors surfaced by [`PixelBuffer`](crate::buffer::PixelBuffer) and every pipeline stage.
///
/// Each stage returns on the first invalid condition; nothing here is retried
/// or silently replaced by an identity pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Sample count does not match `width * height * channels`, or an extent is zero.
    #[error("invalid dimensions {width}x{height}: expected {expected} samples, got {actual}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// A NaN or infinite sample was handed to a buffer constructor.
    #[error("sample {index} is not finite")]
    NonFiniteSample { index: usize },

    /// Sample access outside the buffer extent.
    #[error("sample ({x}, {y}, channel {channel}) is outside a {width}x{height} buffer")]
    OutOfBounds {
        x: u32,
        y: u32,
        channel: usize,
        width: u32,
        height: u32,
    },

    /// A filter parameter is outside its accepted range.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },

    /// The computed output would have zero extent on at least one axis.
    #[error("degenerate output {width}x{height} from scale factor {scale}")]
    DegenerateOutput { width: u32, height: u32, scale: f32 },

    /// The SIMD resample backend rejected the request.
    #[error("resample backend error: {0}")]
    Backend(String),
}

impl PipelineError {
    pub(crate) fn invalid_parameter(name: &'static str, value: f32, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    /// Short machine-friendly name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDimensions { .. } => "invalid_dimensions",
            Self::NonFiniteSample { .. } => "non_finite_sample",
            Self::OutOfBounds { .. } => "out_of_bounds",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::DegenerateOutput { .. } => "degenerate_output",
            Self::Backend(_) => "backend",
        }
    }
}

impl From<fast_image_resize::ResizeError> for PipelineError {
    fn from(e: fast_image_resize::ResizeError) -> Self {
        Self::Backend(e.to_string())
    }
}

impl From<fast_image_resize::ImageBufferError> for PipelineError {
    fn from(e: fast_image_resize::ImageBufferError) -> Self {
        Self::Backend(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
