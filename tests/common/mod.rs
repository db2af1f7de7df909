//! Shared helpers for the integration tests.

#![allow(dead_code)]

use enhance_filters::PixelBuffer;

pub const EPSILON: f32 = 1e-4;

/// Assert every sample of `buffer` is within `eps` of `expected`.
pub fn assert_flat(buffer: &PixelBuffer, expected: [f32; 4], eps: f32) {
    for (i, px) in buffer.samples().chunks_exact(4).enumerate() {
        for c in 0..4 {
            assert!(
                (px[c] - expected[c]).abs() <= eps,
                "pixel {} channel {}: expected {}, got {}",
                i,
                c,
                expected[c],
                px[c]
            );
        }
    }
}

/// Assert every sample lies within 0..=1.
pub fn assert_normalized(buffer: &PixelBuffer) {
    for v in buffer.samples() {
        assert!((0.0..=1.0).contains(v), "sample out of range: {}", v);
    }
}

/// Horizontal black-to-white ramp, opaque.
pub fn gradient(width: u32, height: u32) -> PixelBuffer {
    let mut samples = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..height {
        for x in 0..width {
            let v = if width > 1 {
                x as f32 / (width - 1) as f32
            } else {
                0.5
            };
            samples.extend_from_slice(&[v, v, v, 1.0]);
        }
    }
    PixelBuffer::new(width, height, samples).unwrap()
}

/// Mid-gray field with a deterministic salt-and-pepper pattern.
pub fn speckled(width: u32, height: u32) -> PixelBuffer {
    let mut samples = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let v = match (x * 7 + y * 13) % 11 {
                0 => 1.0,
                5 => 0.0,
                _ => 0.5,
            };
            samples.extend_from_slice(&[v, v, v, 1.0]);
        }
    }
    PixelBuffer::new(width, height, samples).unwrap()
}

/// Mean absolute difference between two equally sized buffers.
pub fn mean_abs_diff(a: &PixelBuffer, b: &PixelBuffer) -> f32 {
    assert_eq!(a.dimensions(), b.dimensions());
    let total: f32 = a
        .samples()
        .iter()
        .zip(b.samples())
        .map(|(x, y)| (x - y).abs())
        .sum();
    total / a.samples().len() as f32
}
