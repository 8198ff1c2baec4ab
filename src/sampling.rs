// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sample positions for supersampling a pixel.
//!
//! Every pixel is evaluated at the same fixed set of Hammersley-style
//! points, built once from the radical inverses in base 2 and base 3.
//! To keep neighbouring pixels from sharing exactly the same pattern,
//! each pixel shifts the whole set by its own noise value (a
//! Cranley-Patterson rotation) and then reshapes the uniform points
//! into a triangular distribution, which is the right shape for a
//! pixel-wide box filter.

/// Reverse the base-`base` digits of `index` about the radix point,
/// producing a fraction in [0, 1).  `radical_inverse(2, 1)` is 0.5,
/// `radical_inverse(2, 2)` is 0.25, `radical_inverse(3, 1)` is 1/3.
pub fn radical_inverse(base: u32, mut index: u32) -> f64 {
    assert!(base >= 2, "radical inverse base must be at least 2");
    let inv_base = 1.0 / f64::from(base);
    let (mut f, mut r) = (1.0_f64, 0.0_f64);
    while index > 0 {
        let digit = index % base;
        f *= inv_base;
        r += f64::from(digit) * f;
        index /= base;
    }
    r
}

/// One low-discrepancy point in the unit square.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    /// Radical inverse of the sample index in base 2.
    pub x: f64,
    /// Radical inverse of the sample index in base 3.
    pub y: f64,
}

/// The fixed, ordered set of sample points shared by every pixel of
/// every frame.  Immutable once built, so threads read it freely.
#[derive(Clone, Debug)]
pub struct SampleSet {
    samples: Vec<Sample>,
}

impl SampleSet {
    /// Build `count` points.  Fully deterministic.
    pub fn new(count: usize) -> SampleSet {
        let samples = (0..count)
            .map(|s| Sample {
                x: radical_inverse(2, s as u32),
                y: radical_inverse(3, s as u32),
            })
            .collect();
        SampleSet { samples }
    }

    /// Number of samples taken per pixel.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True only for a degenerate, zero-sample set.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate over the samples in index order.
    pub fn iter(&self) -> std::slice::Iter<Sample> {
        self.samples.iter()
    }
}

impl std::ops::Index<usize> for SampleSet {
    type Output = Sample;

    fn index(&self, i: usize) -> &Sample {
        &self.samples[i]
    }
}

/// Shift `v` by `offset`, wrapping back into [0, 1).  Both inputs are
/// expected in [0, 1), so one subtraction is enough.
#[inline]
pub fn rotate(v: f64, offset: f64) -> f64 {
    let r = v + offset;
    if r < 1.0 {
        r
    } else {
        r - 1.0
    }
}

#[inline]
fn sign(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Remap a uniform value in [0, 1) to a triangular distribution over
/// (-1, 1), peaked at zero.  `tri_dist(0.5)` is exactly zero, and the
/// map is odd around 0.5: `tri_dist(v) == -tri_dist(1 - v)`.
///
/// A NaN never escapes: it is clamped to -1 and then offset back to 0.
#[inline]
pub fn tri_dist(v: f64) -> f64 {
    let orig = v * 2.0 - 1.0;
    // 0 * rsqrt(0) would be NaN; the limit is zero.
    let v = if orig == 0.0 {
        0.0
    } else {
        orig / orig.abs().sqrt()
    };
    let v = v.max(-1.0);
    v - sign(orig)
}

/// The three jitter offsets for one sample of one pixel: horizontal,
/// vertical and temporal, each in (-1, 1).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Jitter {
    /// Horizontal offset, in pixels.
    pub x: f64,
    /// Vertical offset, in pixels.
    pub y: f64,
    /// Temporal offset, in frames.
    pub t: f64,
}

impl SampleSet {
    /// The jitter for sample `s` of a pixel whose noise value is
    /// `rotation`.  The same rotation is applied to all three
    /// dimensions.
    pub fn jitter(&self, s: usize, rotation: f64) -> Jitter {
        let sample = &self.samples[s];
        let stratum = s as f64 / self.samples.len() as f64;
        Jitter {
            x: tri_dist(rotate(stratum, rotation)),
            y: tri_dist(rotate(sample.x, rotation)),
            t: tri_dist(rotate(sample.y, rotation)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radical_inverse_known_values() {
        assert_eq!(radical_inverse(2, 0), 0.0);
        assert_eq!(radical_inverse(2, 1), 0.5);
        assert_eq!(radical_inverse(2, 2), 0.25);
        assert_eq!(radical_inverse(2, 3), 0.75);
        assert!((radical_inverse(3, 1) - 1.0 / 3.0).abs() < 1e-15);
        assert!((radical_inverse(3, 5) - (2.0 / 3.0 + 1.0 / 9.0)).abs() < 1e-15);
    }

    #[test]
    fn radical_inverse_stays_in_unit_interval() {
        for base in 2..8 {
            for i in 0..5000 {
                let r = radical_inverse(base, i);
                assert!(r >= 0.0 && r < 1.0, "base {} index {} gave {}", base, i, r);
            }
        }
        assert!(radical_inverse(2, u32::max_value()) < 1.0);
    }

    #[test]
    fn sample_set_has_requested_length_and_range() {
        for &n in &[1, 6, 36, 216, 1296] {
            let set = SampleSet::new(n);
            assert_eq!(set.len(), n);
            for s in set.iter() {
                assert!(s.x >= 0.0 && s.x < 1.0);
                assert!(s.y >= 0.0 && s.y < 1.0);
            }
        }
        assert!(SampleSet::new(0).is_empty());
    }

    #[test]
    fn sample_set_is_reproducible() {
        let a = SampleSet::new(216);
        let b = SampleSet::new(216);
        assert!(a.iter().zip(b.iter()).all(|(p, q)| p == q));
        assert_eq!(a[3], Sample { x: 0.75, y: radical_inverse(3, 3) });
    }

    #[test]
    fn rotate_wraps_into_unit_interval() {
        assert_eq!(rotate(0.25, 0.5), 0.75);
        assert_eq!(rotate(0.75, 0.5), 0.25);
        assert_eq!(rotate(0.5, 0.5), 0.0);
    }

    #[test]
    fn tri_dist_midpoint_is_zero() {
        assert_eq!(tri_dist(0.5), 0.0);
    }

    #[test]
    fn tri_dist_is_odd_about_the_midpoint() {
        for i in 1..1000 {
            let v = i as f64 / 1000.0;
            assert!((tri_dist(v) + tri_dist(1.0 - v)).abs() < 1e-12, "v = {}", v);
        }
    }

    #[test]
    fn tri_dist_endpoints_and_range() {
        assert_eq!(tri_dist(0.0), 0.0);
        assert!((tri_dist(0.75) - (0.5_f64.sqrt() - 1.0)).abs() < 1e-15);
        for i in 0..1000 {
            let t = tri_dist(i as f64 / 1000.0);
            assert!(t > -1.0 && t < 1.0);
        }
    }

    #[test]
    fn tri_dist_never_returns_nan() {
        assert_eq!(tri_dist(std::f64::NAN), 0.0);
    }

    #[test]
    fn jitter_uses_a_shared_rotation() {
        let set = SampleSet::new(6);
        let j = set.jitter(1, 0.5);
        assert_eq!(j.x, tri_dist(rotate(1.0 / 6.0, 0.5)));
        assert_eq!(j.y, tri_dist(0.0));
        assert_eq!(j.t, tri_dist(rotate(1.0 / 3.0, 0.5)));
    }
}
