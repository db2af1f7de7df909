use std::time::Duration;

use enhance_filters::{FilterParameters, Pipeline, PixelBuffer, ResampleBackend, StageKind};

/// Per-stage timing of the enhancement pipeline on a synthetic image.
///
/// Runs both resample backends over the same gradient-plus-noise source so the
/// native Lanczos path can be compared against the SIMD one. Stage timings
/// come straight from `Pipeline::run_with_report`.
fn main() -> anyhow::Result<()> {
    println!("Enhancement Pipeline Benchmark");
    println!("═══════════════════════════════════");

    let width = 320;
    let height = 240;
    let runs = 5;
    let params = FilterParameters::default();

    println!(
        "Benchmarking: {}x{} source, {}x scale, {} runs per backend",
        width, height, params.scale_factor, runs
    );
    println!();

    let source = synthetic_source(width, height)?;

    let mut totals = Vec::new();
    for backend in [ResampleBackend::Native, ResampleBackend::Simd] {
        let pipeline = Pipeline::builder().resample_backend(backend).build();
        println!("Running {:?} backend...", backend);

        let mut per_stage = [Duration::ZERO; 4];
        let mut output_size = (0, 0);
        for _ in 0..runs {
            let (output, report) = pipeline.run_with_report(&source, &params)?;
            output_size = output.dimensions();
            for (slot, kind) in per_stage.iter_mut().zip(StageKind::ORDER) {
                if let Some(stage) = report.stage(kind) {
                    *slot += stage.elapsed;
                }
            }
        }

        println!("Results ({:?}, output {}x{}):", backend, output_size.0, output_size.1);
        println!("───────────");
        let mut total = Duration::ZERO;
        for (elapsed, kind) in per_stage.iter().zip(StageKind::ORDER) {
            total += *elapsed;
            println!(
                "{:<10} {:>9.2} ms per run",
                kind.name(),
                elapsed.as_secs_f64() * 1000.0 / runs as f64
            );
        }
        println!(
            "{:<10} {:>9.2} ms per run",
            "total",
            total.as_secs_f64() * 1000.0 / runs as f64
        );
        println!();
        totals.push(total);
    }

    if let [native, simd] = totals[..] {
        println!(
            "SIMD backend: {:.1}x the native pipeline throughput",
            native.as_secs_f64() / simd.as_secs_f64().max(f64::EPSILON)
        );
    }
    Ok(())
}

/// Diagonal gradient with a deterministic speckle pattern.
fn synthetic_source(width: u32, height: u32) -> enhance_filters::Result<PixelBuffer> {
    let mut samples = Vec::with_capacity(width as usize * height as usize * 4);
    let mut state: u32 = 0x9e37_79b9;
    for y in 0..height {
        for x in 0..width {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let noise = (state % 1000) as f32 / 1000.0 * 0.1 - 0.05;
            let base = (x + y) as f32 / (width + height) as f32;
            samples.extend_from_slice(&[
                (base + noise).clamp(0.0, 1.0),
                (1.0 - base + noise).clamp(0.0, 1.0),
                0.5,
                1.0,
            ]);
        }
    }
    PixelBuffer::new(width, height, samples)
}
