// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between the image plane, with its origin at the top left and y
//! growing downward, and a square window of the complex plane centred
//! on an arbitrary point, with y growing upward.
use num::Complex;

/// Linearly map `x` from the range [a, b] onto the range [c, d].
#[inline]
pub fn linear_mapping(a: f64, b: f64, c: f64, d: f64, x: f64) -> f64 {
    (x - a) / (b - a) * (d - c) + c
}

/// Maps continuous pixel coordinates onto the complex plane.  The
/// image width always spans `[-scale, scale]` on the real axis; the
/// imaginary axis is shortened by the image's aspect ratio so that
/// pixels stay square.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    width: f64,
    height: f64,
    aspect: f64,
    scale: f64,
    centre: Complex<f64>,
}

impl PlaneMapper {
    /// Constructor.  Takes the image size in pixels, the half-width of
    /// the complex window, and the point the window is centred on.
    pub fn new(width: usize, height: usize, scale: f64, centre: Complex<f64>) -> PlaneMapper {
        let (width, height) = (width as f64, height as f64);
        PlaneMapper {
            width,
            height,
            aspect: height / width,
            scale,
            centre,
        }
    }

    /// Given a (possibly fractional) pixel position, return the complex
    /// number under it.
    #[inline]
    pub fn pixel_to_point(&self, x: f64, y: f64) -> Complex<f64> {
        Complex::new(
            linear_mapping(0.0, self.width, -self.scale, self.scale, x),
            linear_mapping(0.0, self.height, self.scale, -self.scale, y) * self.aspect,
        ) + self.centre
    }
}
