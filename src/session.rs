//! # Parameter Tuning Session
//!
//! Interactive front-ends re-run the pipeline every time a control moves. A
//! [`TuningSession`] keeps the decoded source image and the pipeline, runs each
//! submission on tokio's blocking pool, and applies last-write-wins: a run that
//! completes after a newer submission resolves to
//! [`EnhanceError::Superseded`] and never replaces the newer result.
//!
//! The filter core stays synchronous and stateless; generations and staleness
//! live entirely here.
//!
//! ```rust,no_run
//! use image_enhance::session::TuningSession;
//! use enhance_filters::{FilterParameters, Pipeline, PixelBuffer};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = PixelBuffer::filled(64, 64, [0.5; 4])?;
//! let session = TuningSession::new(source, Pipeline::new());
//!
//! let stale = session.submit(FilterParameters::default());
//! let fresh = session.submit(FilterParameters { noise_level: 0.3, ..Default::default() });
//! assert!(stale.wait().await.is_err());
//! let result = fresh.wait().await?;
//! println!("{}x{}", result.buffer.width(), result.buffer.height());
//! # Ok(())
//! # }
//! ```

// Standard library imports
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

// External crate imports
use enhance_filters::{FilterParameters, Pipeline, PipelineError, PipelineReport, PixelBuffer};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

// Internal module imports
use crate::error::{EnhanceError, EnhanceResult};

/// Output of an accepted (non-stale) run.
#[derive(Clone, Debug)]
pub struct TuningResult {
    pub generation: u64,
    pub params: FilterParameters,
    pub buffer: Arc<PixelBuffer>,
    pub report: PipelineReport,
}

struct Shared {
    generation: AtomicU64,
    latest: RwLock<Option<TuningResult>>,
}

/// Source image plus pipeline, re-run on every parameter change.
#[derive(Clone)]
pub struct TuningSession {
    source: Arc<PixelBuffer>,
    pipeline: Arc<Pipeline>,
    shared: Arc<Shared>,
}

impl TuningSession {
    pub fn new(source: PixelBuffer, pipeline: Pipeline) -> Self {
        Self {
            source: Arc::new(source),
            pipeline: Arc::new(pipeline),
            shared: Arc::new(Shared {
                generation: AtomicU64::new(0),
                latest: RwLock::new(None),
            }),
        }
    }

    pub fn source(&self) -> &PixelBuffer {
        &self.source
    }

    /// Generation number of the most recent submission (0 before any).
    pub fn current_generation(&self) -> u64 {
        self.shared.generation.load(Ordering::SeqCst)
    }

    /// Start a run with `params`. Must be called from within a tokio runtime.
    ///
    /// The generation is assigned immediately, so any run submitted earlier is
    /// already stale when this returns.
    pub fn submit(&self, params: FilterParameters) -> PendingRun {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, ?params, "submitting tuning run");

        let source = Arc::clone(&self.source);
        let pipeline = Arc::clone(&self.pipeline);
        let handle = tokio::task::spawn_blocking(move || pipeline.run_with_report(&source, &params));

        PendingRun {
            generation,
            params,
            handle,
            shared: Arc::clone(&self.shared),
        }
    }

    /// Most recent accepted result, if any run has completed.
    pub async fn latest(&self) -> Option<TuningResult> {
        self.shared.latest.read().await.clone()
    }
}

/// A submitted run that has not been awaited yet.
pub struct PendingRun {
    generation: u64,
    params: FilterParameters,
    handle: JoinHandle<Result<(PixelBuffer, PipelineReport), PipelineError>>,
    shared: Arc<Shared>,
}

impl PendingRun {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait for the run. Stale runs resolve to [`EnhanceError::Superseded`]
    /// even when the pipeline itself failed.
    pub async fn wait(self) -> EnhanceResult<TuningResult> {
        let outcome = self
            .handle
            .await
            .map_err(|e| EnhanceError::worker(e.to_string()))?;

        let mut latest = self.shared.latest.write().await;
        let newest = self.shared.generation.load(Ordering::SeqCst);
        if self.generation != newest {
            debug!(generation = self.generation, newest, "discarding stale tuning run");
            return Err(EnhanceError::superseded(self.generation, newest));
        }

        let (buffer, report) = outcome.map_err(EnhanceError::pipeline)?;
        info!(
            generation = self.generation,
            width = buffer.width(),
            height = buffer.height(),
            elapsed_ms = report.total().as_secs_f64() * 1000.0,
            "tuning run complete"
        );

        let result = TuningResult {
            generation: self.generation,
            params: self.params,
            buffer: Arc::new(buffer),
            report,
        };
        if latest.as_ref().is_none_or(|r| r.generation < result.generation) {
            *latest = Some(result.clone());
        }
        Ok(result)
    }
}
