// SPDX-License-Identifier: MIT
//! # Lanczos Resampling
//!
//! Separable windowed-sinc resampling: a horizontal pass into a scratch buffer
//! of `out_w x in_h`, then a vertical pass into the output. Source coordinates
//! are clamped to the buffer (no wraparound). When downscaling, the kernel is
//! stretched by `1 / scale` so it keeps acting as a low-pass filter.
//!
//! Two backends are available:
//! - [`ResampleBackend::Native`]: the reference implementation in this module,
//!   with a configurable lobe count.
//! - [`ResampleBackend::Simd`]: `fast_image_resize` Lanczos3 convolution on
//!   `F32x4` pixels. Always three lobes.

use std::f64::consts::PI;

use fast_image_resize as fir;
use fir::images::{TypedImage, TypedImageRef};
use fir::pixels::F32x4;
use fir::{FilterType, ResizeAlg, ResizeOptions, Resizer};

use crate::buffer::{CHANNELS, PixelBuffer};
use crate::error::{PipelineError, Result};

/// Default number of Lanczos lobes.
pub const DEFAULT_LOBES: u32 = 3;

/// Largest output accepted, in pixels (8192 x 8192, 1 GiB of `f32` samples).
pub const MAX_OUTPUT_PIXELS: u64 = 1 << 26;

/// Which implementation performs the convolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ResampleBackend {
    #[default]
    Native,
    Simd,
}

/// Upscales (or downscales) a buffer by a uniform factor.
#[derive(Clone, Copy, Debug)]
pub struct ResampleStage {
    lobes: u32,
    backend: ResampleBackend,
}

impl Default for ResampleStage {
    fn default() -> Self {
        Self::new(DEFAULT_LOBES, ResampleBackend::Native)
    }
}

impl ResampleStage {
    /// `lobes` is clamped to at least 1.
    pub fn new(lobes: u32, backend: ResampleBackend) -> Self {
        Self {
            lobes: lobes.max(1),
            backend,
        }
    }

    pub fn backend(&self) -> ResampleBackend {
        self.backend
    }

    /// Output extent for a uniform `scale`: `round(width * scale) x round(height * scale)`.
    ///
    /// Checked before anything is allocated: extents above [`MAX_OUTPUT_PIXELS`]
    /// fail with [`PipelineError::InvalidParameter`].
    pub fn output_size(width: u32, height: u32, scale: f32) -> Result<(u32, u32)> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(PipelineError::invalid_parameter(
                "scale_factor",
                scale,
                "must be finite and greater than 0",
            ));
        }
        let w = (width as f64 * scale as f64).round();
        let h = (height as f64 * scale as f64).round();
        if w > u32::MAX as f64 || h > u32::MAX as f64 {
            return Err(PipelineError::invalid_parameter(
                "scale_factor",
                scale,
                "output extent overflows u32",
            ));
        }
        let (w, h) = (w as u32, h as u32);
        if w == 0 || h == 0 {
            return Err(PipelineError::DegenerateOutput {
                width: w,
                height: h,
                scale,
            });
        }
        match (w as u64).checked_mul(h as u64) {
            Some(pixels) if pixels <= MAX_OUTPUT_PIXELS => Ok((w, h)),
            _ => Err(PipelineError::invalid_parameter(
                "scale_factor",
                scale,
                "output exceeds MAX_OUTPUT_PIXELS",
            )),
        }
    }

    /// Resample `src` into a new buffer. The source is never modified.
    ///
    /// `scale_x` and `scale_y` must be equal; a non-uniform request fails with
    /// [`PipelineError::InvalidParameter`].
    pub fn apply(&self, src: &PixelBuffer, scale_x: f32, scale_y: f32) -> Result<PixelBuffer> {
        if scale_x != scale_y {
            return Err(PipelineError::invalid_parameter(
                "scale_factor",
                scale_y,
                "horizontal and vertical scale must be equal",
            ));
        }
        let (out_w, out_h) = Self::output_size(src.width(), src.height(), scale_x)?;

        match self.backend {
            ResampleBackend::Native => self.resample_native(src, out_w, out_h),
            ResampleBackend::Simd => resample_simd(src, out_w, out_h),
        }
    }

    fn resample_native(&self, src: &PixelBuffer, out_w: u32, out_h: u32) -> Result<PixelBuffer> {
        let (in_w, in_h) = (src.width() as usize, src.height() as usize);
        let (out_w, out_h) = (out_w as usize, out_h as usize);

        let columns = contributions(in_w, out_w, self.lobes);
        let rows = contributions(in_h, out_h, self.lobes);

        // Horizontal pass: in_w x in_h -> out_w x in_h
        let mut scratch = vec![0.0f32; out_w * in_h * CHANNELS];
        for y in 0..in_h {
            let src_row = src.row(y);
            let dst_row = &mut scratch[y * out_w * CHANNELS..(y + 1) * out_w * CHANNELS];
            for (ox, taps) in columns.iter().enumerate() {
                let mut acc = [0.0f32; CHANNELS];
                for tap in taps {
                    let px = &src_row[tap.index * CHANNELS..(tap.index + 1) * CHANNELS];
                    for c in 0..CHANNELS {
                        acc[c] += px[c] * tap.weight;
                    }
                }
                dst_row[ox * CHANNELS..(ox + 1) * CHANNELS].copy_from_slice(&acc);
            }
        }

        // Vertical pass: out_w x in_h -> out_w x out_h
        let mut out = vec![0.0f32; out_w * out_h * CHANNELS];
        for (oy, taps) in rows.iter().enumerate() {
            let dst_row = &mut out[oy * out_w * CHANNELS..(oy + 1) * out_w * CHANNELS];
            for tap in taps {
                let src_row = &scratch[tap.index * out_w * CHANNELS..(tap.index + 1) * out_w * CHANNELS];
                for (d, s) in dst_row.iter_mut().zip(src_row) {
                    *d += s * tap.weight;
                }
            }
            for v in dst_row.iter_mut() {
                *v = v.clamp(0.0, 1.0);
            }
        }

        PixelBuffer::new(out_w as u32, out_h as u32, out)
    }
}

fn resample_simd(src: &PixelBuffer, out_w: u32, out_h: u32) -> Result<PixelBuffer> {
    let src_view =
        TypedImageRef::<F32x4>::from_buffer(src.width(), src.height(), bytemuck::cast_slice(src.samples()))?;

    let mut out = vec![0.0f32; out_w as usize * out_h as usize * CHANNELS];
    {
        let mut dst_image =
            TypedImage::<F32x4>::from_buffer(out_w, out_h, bytemuck::cast_slice_mut(out.as_mut_slice()))?;
        let opts = ResizeOptions::new()
            .resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3))
            .use_alpha(false);
        Resizer::new().resize_typed::<F32x4>(&src_view, &mut dst_image, &opts)?;
    }
    for v in out.iter_mut() {
        *v = v.clamp(0.0, 1.0);
    }

    PixelBuffer::new(out_w, out_h, out)
}

/// One source sample contributing to an output sample.
#[derive(Clone, Copy, Debug)]
struct Tap {
    index: usize,
    weight: f32,
}

/// Normalized Lanczos taps for every output position along one axis.
fn contributions(in_len: usize, out_len: usize, lobes: u32) -> Vec<Vec<Tap>> {
    let scale = out_len as f64 / in_len as f64;
    let filter_scale = (1.0 / scale).max(1.0);
    let a = lobes as f64;
    let support = a * filter_scale;
    let last = in_len as isize - 1;

    (0..out_len)
        .map(|i| {
            let center = (i as f64 + 0.5) / scale - 0.5;
            let start = (center - support).ceil() as isize;
            let end = (center + support).floor() as isize;

            let mut weights = Vec::with_capacity((end - start + 1).max(1) as usize);
            let mut sum = 0.0f64;
            for j in start..=end {
                let w = lanczos((j as f64 - center) / filter_scale, a);
                if w != 0.0 {
                    weights.push((j.clamp(0, last) as usize, w));
                    sum += w;
                }
            }

            if sum.abs() < 1e-12 {
                let nearest = (center.round() as isize).clamp(0, last) as usize;
                return vec![Tap {
                    index: nearest,
                    weight: 1.0,
                }];
            }
            weights
                .into_iter()
                .map(|(index, w)| Tap {
                    index,
                    weight: (w / sum) as f32,
                })
                .collect()
        })
        .collect()
}

/// Lanczos window: `sinc(x) * sinc(x / a)` for `|x| < a`, zero elsewhere.
fn lanczos(x: f64, a: f64) -> f64 {
    if x == 0.0 {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }
    let pix = PI * x;
    a * pix.sin() * (pix / a).sin() / (pix * pix)
}
