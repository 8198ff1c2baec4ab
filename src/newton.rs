// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The image function: Newton's method on z^3 - 1.
//!
//! Every point of the complex plane, used as a starting guess, converges
//! to one of the three cube roots of unity.  Instead of colouring by
//! which root wins, we colour by the shape of the path taken to get
//! there: an exponentially smoothed measure of how close to the origin
//! the path stays, or, for the rare points that never settle, how the
//! step sizes evolved.  The modulo wrap in the colouring produces the
//! banding, and is intended.
//!
//! The animation is a single zoom cycle.  Frame time runs once around
//! the circle, is eased with a cosine, and drives an exponential zoom,
//! so the second half of the loop is the first half played backward.

use num::Complex;
use crate::planes::{linear_mapping, PlaneMapper};
use std::f64::consts::PI;
use std::ops::{AddAssign, Mul};

/// Iteration cap for a single starting point.
pub const MAX_ITERATIONS: usize = 255;

/// Successive iterates closer than this are considered converged.
const CONVERGENCE_RADIUS: f64 = 0.000_000_001;

/// Half-width of the complex window on the first frame.
const INITIAL_SCALE: f64 = 3.0;

/// Zoom depth reached at the middle of the loop, as a power of e.
const ZOOM_RATE: f64 = -11.0;

/// An RGBA colour with linear float channels on a 0..1 scale.  Image
/// function results are summed into one of these, then averaged.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    /// A grey of the given level, at full weight.
    pub fn grey(level: f32) -> Color {
        Color([level, level, level, 1.0])
    }

    /// Convert to 8-bit RGB, using a square root as a rough
    /// linear-to-sRGB curve.  Out-of-range and NaN channels clamp to
    /// 0 or 255.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let gamma = |c: f32| {
            let v = (c.sqrt() * 256.0) as i32;
            v.max(0).min(255) as u8
        };
        [gamma(self.0[0]), gamma(self.0[1]), gamma(self.0[2])]
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, other: Color) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a += *b;
        }
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, k: f32) -> Color {
        let c = self.0;
        Color([c[0] * k, c[1] * k, c[2] * k, c[3] * k])
    }
}

/// Where in the zoom cycle a (possibly jittered) frame time falls.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameClock {
    /// Frame time as an angle in [0, 2pi) over the whole loop.
    pub time: f64,
    /// `time` eased to [0, 1]: zero at the loop's ends, one at its middle.
    pub eased: f64,
    /// Half-width of the visible complex window.
    pub scale: f64,
}

impl FrameClock {
    /// Clock for a frame position out of `num_frames`.
    pub fn new(frame: f64, num_frames: usize) -> FrameClock {
        let time = linear_mapping(0.0, num_frames as f64, 0.0, PI * 2.0, frame);
        let eased = (PI - time).cos() * 0.5 + 0.5;
        let scale = INITIAL_SCALE * (eased * ZOOM_RATE).exp();
        FrameClock { time, eased, scale }
    }
}

/// What happened to one starting point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Orbit {
    /// Steps taken, `MAX_ITERATIONS` if the point never converged.
    pub iterations: usize,
    /// Sum of exp(-|z|) over the path.
    pub div_sum: f64,
    /// Sum of exp(-1 / |step|) over the path.
    pub conv_sum: f64,
}

impl Orbit {
    /// Whether the iteration hit the cap without converging.
    pub fn exhausted(&self) -> bool {
        self.iterations == MAX_ITERATIONS
    }

    /// The colour this orbit is drawn with.
    pub fn color(&self) -> Color {
        let level = if self.exhausted() {
            banded_level(10.0, self.conv_sum)
        } else {
            banded_level(50.0, self.div_sum)
        };
        Color::grey(level as f32 / 256.0)
    }
}

/// Run Newton's method for z^3 - 1 from `z0`.
pub fn newton_orbit(z0: Complex<f64>) -> Orbit {
    let r2 = CONVERGENCE_RADIUS * CONVERGENCE_RADIUS;
    let mut z = z0;
    let mut z_old = Complex::new(0.0, 0.0);
    let mut orbit = Orbit {
        iterations: 0,
        div_sum: 0.0,
        conv_sum: 0.0,
    };
    while orbit.iterations < MAX_ITERATIONS && (z - z_old).norm_sqr() > r2 {
        z_old = z;
        z = z - (z * z * z - 1.0) / (z * z * 3.0);
        orbit.div_sum += (-z.norm()).exp();
        orbit.conv_sum += (-1.0 / (z_old - z).norm()).exp();
        orbit.iterations += 1;
    }
    orbit
}

/// The grey level `int(256 - weight * sum) % 256`, using truncating
/// float-to-int conversion and a remainder that keeps the sign of the
/// dividend.  Negative levels are expected and are not folded back
/// into range.
#[inline]
pub fn banded_level(weight: f64, sum: f64) -> i32 {
    (256.0 - weight * sum) as i32 % 256
}

/// The image function.  Maps a continuous pixel position and frame time
/// to a colour.  Pure; safe to call from any number of threads.
pub fn color(x: f64, y: f64, frame: f64, width: usize, height: usize, num_frames: usize) -> Color {
    let clock = FrameClock::new(frame, num_frames);
    let plane = PlaneMapper::new(width, height, clock.scale, Complex::new(0.0, 0.0));
    newton_orbit(plane.pixel_to_point(x, y)).color()
}
