// SPDX-License-Identifier: MIT
//! # Pixel Buffer
//!
//! Owned RGBA grid of `f32` samples, the unit of data flow between stages.
//!
//! Samples are stored row-major and interleaved (`R, G, B, A, R, G, ...`).
//! The buffer never shares storage: `clone()` deep-copies the sample vector,
//! so a stage holding a buffer can mutate it without affecting anyone else.

use crate::error::{PipelineError, Result};

/// Number of interleaved channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Owned 2D grid of RGBA samples in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    samples: Vec<f32>,
}

impl PixelBuffer {
    /// Build a buffer from interleaved RGBA samples.
    ///
    /// Fails with [`PipelineError::InvalidDimensions`] when either extent is
    /// zero or `samples.len() != width * height * 4`, and with
    /// [`PipelineError::NonFiniteSample`] on NaN or infinity. Finite samples
    /// outside `[0, 1]` are accepted; every stage clamps its output.
    pub fn new(width: u32, height: u32, samples: Vec<f32>) -> Result<Self> {
        let expected = sample_count(width, height);
        if width == 0 || height == 0 || samples.len() != expected {
            return Err(PipelineError::InvalidDimensions {
                width,
                height,
                expected,
                actual: samples.len(),
            });
        }
        if let Some(index) = samples.iter().position(|v| !v.is_finite()) {
            return Err(PipelineError::NonFiniteSample { index });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Build a buffer with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [f32; 4]) -> Result<Self> {
        let pixels = width as usize * height as usize;
        let mut samples = Vec::with_capacity(pixels * CHANNELS);
        for _ in 0..pixels {
            samples.extend_from_slice(&rgba);
        }
        Self::new(width, height, samples)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn channels(&self) -> usize {
        CHANNELS
    }

    /// Read one sample with bounds checking. Never clamps.
    pub fn sample(&self, x: u32, y: u32, channel: usize) -> Result<f32> {
        if x >= self.width || y >= self.height || channel >= CHANNELS {
            return Err(PipelineError::OutOfBounds {
                x,
                y,
                channel,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.samples[self.offset(x as usize, y as usize) + channel])
    }

    /// Read a whole pixel with bounds checking.
    pub fn pixel(&self, x: u32, y: u32) -> Result<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return Err(PipelineError::OutOfBounds {
                x,
                y,
                channel: 0,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.pixel_clamped(x as isize, y as isize))
    }

    /// All samples, row-major and interleaved.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Writes through this slice are not range-checked.
    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Interleaved samples of row `y`. Callers guarantee `y < height`.
    pub(crate) fn row(&self, y: usize) -> &[f32] {
        let stride = self.width as usize * CHANNELS;
        &self.samples[y * stride..(y + 1) * stride]
    }

    /// Pixel at `(x, y)` with coordinates clamped into the buffer (replicated edges).
    #[inline]
    pub(crate) fn pixel_clamped(&self, x: isize, y: isize) -> [f32; 4] {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        let o = self.offset(cx, cy);
        [
            self.samples[o],
            self.samples[o + 1],
            self.samples[o + 2],
            self.samples[o + 3],
        ]
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width as usize + x) * CHANNELS
    }
}

#[inline]
fn sample_count(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_length_mismatch() {
        let err = PixelBuffer::new(2, 2, vec![0.0; 15]).unwrap_err();
        assert_eq!(
            err,
            PipelineError::InvalidDimensions {
                width: 2,
                height: 2,
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn rejects_non_finite_samples() {
        let mut samples = vec![0.5; 8];
        samples[5] = f32::NAN;
        assert_eq!(
            PixelBuffer::new(2, 1, samples).unwrap_err(),
            PipelineError::NonFiniteSample { index: 5 }
        );
        assert!(matches!(
            PixelBuffer::filled(1, 1, [0.0, f32::INFINITY, 0.0, 1.0]),
            Err(PipelineError::NonFiniteSample { index: 1 })
        ));
        // finite but out of range is allowed
        assert!(PixelBuffer::new(1, 1, vec![-0.5, 1.5, 0.0, 1.0]).is_ok());
    }

    #[test]
    fn rejects_zero_extent() {
        assert!(matches!(
            PixelBuffer::new(0, 3, Vec::new()),
            Err(PipelineError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn sample_reads_interleaved_layout() {
        let samples: Vec<f32> = (0..16).map(|v| v as f32 / 16.0).collect();
        let buf = PixelBuffer::new(2, 2, samples).unwrap();
        // pixel (1, 1) starts at sample 12
        assert_eq!(buf.sample(1, 1, 0).unwrap(), 12.0 / 16.0);
        assert_eq!(buf.sample(0, 1, 3).unwrap(), 11.0 / 16.0);
    }

    #[test]
    fn sample_out_of_range_fails() {
        let buf = PixelBuffer::filled(3, 2, [1.0; 4]).unwrap();
        assert!(matches!(
            buf.sample(3, 0, 0),
            Err(PipelineError::OutOfBounds { x: 3, .. })
        ));
        assert!(matches!(
            buf.sample(0, 2, 0),
            Err(PipelineError::OutOfBounds { y: 2, .. })
        ));
        assert!(matches!(
            buf.sample(0, 0, 4),
            Err(PipelineError::OutOfBounds { channel: 4, .. })
        ));
        assert!(buf.pixel(0, 2).is_err());
    }

    #[test]
    fn clone_is_independent() {
        let original = PixelBuffer::filled(2, 2, [0.5; 4]).unwrap();
        let mut copy = original.clone();
        copy.samples_mut()[0] = 0.0;
        assert_eq!(original.sample(0, 0, 0).unwrap(), 0.5);
        assert_eq!(copy.sample(0, 0, 0).unwrap(), 0.0);
    }

    #[test]
    fn clamped_access_replicates_edges() {
        let mut buf = PixelBuffer::filled(2, 1, [0.0; 4]).unwrap();
        buf.samples_mut()[4] = 1.0;
        assert_eq!(buf.pixel_clamped(-5, 0)[0], 0.0);
        assert_eq!(buf.pixel_clamped(7, 3)[0], 1.0);
    }
}
