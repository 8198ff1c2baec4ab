#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Newton fractal loop renderer
//!
//! Newton's method, applied to z^3 - 1 from every point of the complex
//! plane, carves the plane into three basins with an infinitely fine,
//! self-similar boundary between them.  This crate renders a looping
//! zoom into that boundary: the first half of the loop dives in, and the
//! second half is the first half played backward.
//!
//! Each pixel is supersampled.  The sample points are a fixed
//! Hammersley set shared by every pixel, rotated per pixel by an
//! approximate blue-noise texture and reshaped into a triangular
//! filter.  The same jitter also spreads samples across the frame's
//! time, which gives a touch of motion blur.
//!
//! Frames are rendered by a pool of threads pulling small tiles off a
//! shared atomic counter until the frame is exhausted.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
extern crate num;
extern crate num_cpus;

pub mod config;
pub mod error;
pub mod newton;
pub mod noise;
pub mod output;
pub mod planes;
pub mod pool;
pub mod render;
pub mod sampling;
pub mod tiles;

pub use config::{Quality, RenderConfig};
pub use error::RenderError;
pub use noise::NoiseField;
pub use render::{build_noise_field, build_sample_set, render_frame, FrameDriver, RenderedFrame};
pub use sampling::SampleSet;
