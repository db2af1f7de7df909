// SPDX-License-Identifier: MIT
//! # Enhancement Pipeline
//!
//! Fixed four-stage chain:
//!
//! ```text
//! source ─► Resample ─► Denoise ─► Sharpen ─► Median ─► result
//! ```
//!
//! The resample stage reads the caller's buffer and always allocates a new
//! one, so the caller's source is never touched. Every later stage takes
//! ownership of the previous stage's output. The first failure aborts the run.
//!
//! A [`Pipeline`] holds only immutable settings, so one instance can be shared
//! across threads and invoked concurrently with independent buffers.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, debug_span};

use crate::buffer::PixelBuffer;
use crate::denoise::{self, DenoiseStage};
use crate::error::Result;
use crate::median::{self, MedianStage};
use crate::params::FilterParameters;
use crate::resample::{self, ResampleBackend, ResampleStage};
use crate::sharpen::SharpenStage;

/// Stages in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
    Resample,
    Denoise,
    Sharpen,
    Median,
}

impl StageKind {
    pub const ORDER: [StageKind; 4] = [
        StageKind::Resample,
        StageKind::Denoise,
        StageKind::Sharpen,
        StageKind::Median,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StageKind::Resample => "resample",
            StageKind::Denoise => "denoise",
            StageKind::Sharpen => "sharpen",
            StageKind::Median => "median",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tunable numeric constants of the stages.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineSettings {
    pub lanczos_lobes: u32,
    pub resample_backend: ResampleBackend,
    pub denoise_radius: u32,
    pub denoise_sigma_spatial: f32,
    pub denoise_sigma_range: f32,
    pub median_radius: u32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            lanczos_lobes: resample::DEFAULT_LOBES,
            resample_backend: ResampleBackend::Native,
            denoise_radius: denoise::DEFAULT_RADIUS,
            denoise_sigma_spatial: denoise::DEFAULT_SIGMA_SPATIAL,
            denoise_sigma_range: denoise::DEFAULT_SIGMA_RANGE,
            median_radius: median::DEFAULT_RADIUS,
        }
    }
}

/// Timing and output extent of one stage.
#[derive(Clone, Copy, Debug)]
pub struct StageReport {
    pub stage: StageKind,
    pub elapsed: Duration,
    pub width: u32,
    pub height: u32,
}

/// Per-stage breakdown of a successful run.
#[derive(Clone, Debug, Default)]
pub struct PipelineReport {
    pub stages: Vec<StageReport>,
}

impl PipelineReport {
    pub fn total(&self) -> Duration {
        self.stages.iter().map(|s| s.elapsed).sum()
    }

    pub fn stage(&self, kind: StageKind) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == kind)
    }
}

/// The Resample → Denoise → Sharpen → Median chain.
#[derive(Clone, Debug)]
pub struct Pipeline {
    settings: PipelineSettings,
    resample: ResampleStage,
    denoise: DenoiseStage,
    sharpen: SharpenStage,
    median: MedianStage,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::with_settings(PipelineSettings::default())
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn with_settings(settings: PipelineSettings) -> Self {
        Self {
            settings,
            resample: ResampleStage::new(settings.lanczos_lobes, settings.resample_backend),
            denoise: DenoiseStage::new(
                settings.denoise_radius,
                settings.denoise_sigma_spatial,
                settings.denoise_sigma_range,
            ),
            sharpen: SharpenStage,
            median: MedianStage::new(settings.median_radius),
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run all four stages on `source`. `source` is left untouched.
    pub fn run(&self, source: &PixelBuffer, params: &FilterParameters) -> Result<PixelBuffer> {
        self.run_with_report(source, params).map(|(buffer, _)| buffer)
    }

    /// Like [`run`](Self::run), also returning per-stage timings.
    pub fn run_with_report(
        &self,
        source: &PixelBuffer,
        params: &FilterParameters,
    ) -> Result<(PixelBuffer, PipelineReport)> {
        let _span = debug_span!(
            "pipeline",
            width = source.width(),
            height = source.height(),
            scale = params.scale_factor
        )
        .entered();

        params.validate()?;
        let mut report = PipelineReport::default();

        let started = Instant::now();
        let buffer = self.resample.apply(
            source,
            params.scale_factor,
            params.scale_factor * params.aspect_ratio,
        )?;
        record(&mut report, StageKind::Resample, started, &buffer);

        let started = Instant::now();
        let buffer = self
            .denoise
            .apply(buffer, params.noise_level, params.sharpness)?;
        record(&mut report, StageKind::Denoise, started, &buffer);

        let started = Instant::now();
        let buffer = self
            .sharpen
            .apply(buffer, params.unsharp_radius, params.unsharp_intensity)?;
        record(&mut report, StageKind::Sharpen, started, &buffer);

        let started = Instant::now();
        let buffer = self.median.apply(buffer)?;
        record(&mut report, StageKind::Median, started, &buffer);

        debug!(total_ms = report.total().as_secs_f64() * 1000.0, "pipeline finished");
        Ok((buffer, report))
    }
}

fn record(report: &mut PipelineReport, stage: StageKind, started: Instant, buffer: &PixelBuffer) {
    let elapsed = started.elapsed();
    debug!(
        stage = stage.name(),
        width = buffer.width(),
        height = buffer.height(),
        elapsed_us = elapsed.as_micros() as u64,
        "stage complete"
    );
    report.stages.push(StageReport {
        stage,
        elapsed,
        width: buffer.width(),
        height: buffer.height(),
    });
}

/// Fluent construction of a [`Pipeline`] with non-default constants.
#[derive(Clone, Debug, Default)]
pub struct PipelineBuilder {
    settings: PipelineSettings,
}

impl PipelineBuilder {
    pub fn lanczos_lobes(mut self, lobes: u32) -> Self {
        self.settings.lanczos_lobes = lobes;
        self
    }

    pub fn resample_backend(mut self, backend: ResampleBackend) -> Self {
        self.settings.resample_backend = backend;
        self
    }

    /// Window of `(2 * radius + 1)^2` samples.
    pub fn denoise_radius(mut self, radius: u32) -> Self {
        self.settings.denoise_radius = radius;
        self
    }

    pub fn denoise_sigmas(mut self, spatial: f32, range: f32) -> Self {
        self.settings.denoise_sigma_spatial = spatial;
        self.settings.denoise_sigma_range = range;
        self
    }

    pub fn median_radius(mut self, radius: u32) -> Self {
        self.settings.median_radius = radius;
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline::with_settings(self.settings)
    }
}
