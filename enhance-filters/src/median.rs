// SPDX-License-Identifier: MIT
//! Per-channel median over a square window with replicated edges.
//! Removes isolated speckles left behind by sharpening.

use crate::buffer::{CHANNELS, PixelBuffer};
use crate::error::Result;

pub const DEFAULT_RADIUS: u32 = 1;

#[derive(Clone, Copy, Debug)]
pub struct MedianStage {
    radius: u32,
}

impl Default for MedianStage {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS)
    }
}

impl MedianStage {
    /// A radius of 1 gives the classic 3x3 median.
    pub fn new(radius: u32) -> Self {
        Self { radius }
    }

    pub fn apply(&self, buffer: PixelBuffer) -> Result<PixelBuffer> {
        if self.radius == 0 {
            return Ok(buffer);
        }
        let (width, height) = buffer.dimensions();
        let r = self.radius as isize;
        let side = 2 * self.radius as usize + 1;
        let mid = side * side / 2;

        let mut window: [Vec<f32>; CHANNELS] = std::array::from_fn(|_| Vec::with_capacity(side * side));
        let mut out = Vec::with_capacity(buffer.samples().len());

        for y in 0..height as isize {
            for x in 0..width as isize {
                for values in window.iter_mut() {
                    values.clear();
                }
                for dy in -r..=r {
                    for dx in -r..=r {
                        let p = buffer.pixel_clamped(x + dx, y + dy);
                        for c in 0..CHANNELS {
                            window[c].push(p[c]);
                        }
                    }
                }
                for values in window.iter_mut() {
                    let (_, median, _) = values.select_nth_unstable_by(mid, f32::total_cmp);
                    out.push(*median);
                }
            }
        }

        PixelBuffer::new(width, height, out)
    }
}
