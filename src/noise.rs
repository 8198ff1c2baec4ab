// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An approximate blue-noise texture, used to rotate each pixel's
//! sample pattern.
//!
//! Real blue noise is expensive to generate.  This is a cheap stand-in:
//! walk a square grid along a Hilbert curve, and give each cell the next
//! value of an additive golden-ratio sequence.  Cells that are close on
//! the curve are close on the grid, and consecutive golden-ratio values
//! are always far apart, so neighbouring pixels end up with
//! well-separated values.

use crate::error::RenderError;

/// The fractional part of the golden ratio, scaled to 2^64.  Odd, so
/// the additive sequence visits every 64-bit value before repeating.
const GOLDEN_RATIO_64: u64 = 11_400_714_819_323_198_487;

/// Scale from a raw 16-bit noise value to [0, 1).
const INV_U16_RANGE: f64 = 1.0 / 65536.0;

type Step = (i64, i64);

fn hilbert(dx: Step, dy: Step, mut p: Step, size: usize, width: usize, out: &mut Vec<usize>) {
    if size > 1 {
        let size = size >> 1;
        let s = size as i64;
        hilbert(dy, dx, p, size, width, out);
        p = (p.0 + dy.0 * s, p.1 + dy.1 * s);
        hilbert(dx, dy, p, size, width, out);
        p = (p.0 + dx.0 * s, p.1 + dx.1 * s);
        hilbert(dx, dy, p, size, width, out);
        p = (p.0 + dx.0 * (s - 1) - dy.0, p.1 + dx.1 * (s - 1) - dy.1);
        hilbert((-dy.0, -dy.1), (-dx.0, -dx.1), p, size, width, out);
    } else {
        out.push(p.1 as usize * width + p.0 as usize);
    }
}

/// The order in which a Hilbert curve visits the cells of a
/// `size` x `size` grid, as row-major linear indices.  Every index in
/// `0..size * size` appears exactly once, and consecutive entries are
/// always edge-adjacent cells.  `size` must be a power of two.
pub fn hilbert_ordering(size: usize) -> Vec<usize> {
    assert!(size.is_power_of_two(), "hilbert grid size must be a power of two");
    let mut ordering = Vec::with_capacity(size * size);
    hilbert((1, 0), (0, 1), (0, 0), size, size, &mut ordering);
    ordering
}

/// A square, tileable grid of 16-bit noise values.  Built once and then
/// only read.
#[derive(Clone, Debug)]
pub struct NoiseField {
    size: usize,
    values: Vec<u16>,
}

impl NoiseField {
    /// Build a `size` x `size` field.  Fails if `size` is not a power
    /// of two.
    pub fn new(size: usize) -> Result<NoiseField, RenderError> {
        if !size.is_power_of_two() {
            return Err(RenderError::config(format!(
                "noise size {} is not a power of two",
                size
            )));
        }
        let mut values = vec![0 as u16; size * size];
        let mut acc: u64 = 0;
        for cell in hilbert_ordering(size) {
            acc = acc.wrapping_add(GOLDEN_RATIO_64);
            values[cell] = (acc >> 48) as u16;
        }
        Ok(NoiseField { size, values })
    }

    /// The edge length of the field.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The raw noise value for a pixel.  The field repeats in both
    /// directions, so any pixel coordinate is valid.
    #[inline]
    pub fn raw(&self, x: usize, y: usize) -> u16 {
        self.values[(y % self.size) * self.size + (x % self.size)]
    }

    /// The noise value for a pixel as a fraction in [0, 1).
    #[inline]
    pub fn value(&self, x: usize, y: usize) -> f64 {
        f64::from(self.raw(x, y)) * INV_U16_RANGE
    }
}
