// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Rendering one frame.
//!
//! Each frame gets a fresh tile scheduler and a fresh set of worker
//! threads.  A worker loops: claim a tile, supersample every pixel in
//! it, keep the finished pixels.  When the scheduler runs dry the
//! worker hands back everything it rendered.  After all workers have
//! joined, the driver copies each tile into the frame buffer.  Tiles
//! never overlap, so every pixel is written exactly once.

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::newton::{self, Color};
use crate::noise::NoiseField;
use crate::pool::run_workers;
use crate::sampling::SampleSet;
use crate::tiles::{Tile, TileGrid, TileScheduler};
use image::RgbImage;
use std::time::Instant;
use tracing::{debug, trace};

/// Bytes per pixel in a frame buffer.
const CHANNELS: usize = 3;

/// A finished tile, waiting to be copied into the frame.
struct RenderedTile {
    tile: Tile,
    pixels: Vec<[u8; 3]>,
}

/// A finished frame, and how long it took.
#[derive(Debug)]
pub struct RenderedFrame {
    /// The frame's pixels.
    pub image: RgbImage,
    /// Wall-clock render time, in seconds.
    pub elapsed: f64,
}

/// Renders frames of the loop.  Holds only shared, read-only state, so
/// one driver serves the whole run.
pub struct FrameDriver<'a> {
    width: usize,
    height: usize,
    num_frames: usize,
    threads: usize,
    samples: &'a SampleSet,
    noise: &'a NoiseField,
}

impl<'a> FrameDriver<'a> {
    /// A driver for frames of `width` x `height` out of a loop of
    /// `num_frames`.
    pub fn new(
        width: usize,
        height: usize,
        num_frames: usize,
        threads: usize,
        samples: &'a SampleSet,
        noise: &'a NoiseField,
    ) -> Result<FrameDriver<'a>, RenderError> {
        RenderConfig {
            width,
            height,
            frames: num_frames,
            samples: samples.len(),
            noise_size: noise.size(),
            threads,
        }
        .validate()?;
        Ok(FrameDriver {
            width,
            height,
            num_frames,
            threads,
            samples,
            noise,
        })
    }

    /// A driver for the settings in `config`.  The sample set and noise
    /// field are expected to have been built from the same settings.
    pub fn from_config(
        config: &RenderConfig,
        samples: &'a SampleSet,
        noise: &'a NoiseField,
    ) -> Result<FrameDriver<'a>, RenderError> {
        FrameDriver::new(
            config.width,
            config.height,
            config.frames,
            config.threads,
            samples,
            noise,
        )
    }

    /// Supersample one pixel of `frame`.
    pub fn pixel(&self, frame: usize, x: usize, y: usize) -> [u8; 3] {
        let rotation = self.noise.value(x, y);
        let mut sum = Color::default();
        for s in 0..self.samples.len() {
            let jitter = self.samples.jitter(s, rotation);
            sum += newton::color(
                x as f64 + 0.5 + jitter.x,
                y as f64 + 0.5 + jitter.y,
                frame as f64 + 0.5 + jitter.t,
                self.width,
                self.height,
                self.num_frames,
            );
        }
        (sum * (1.0 / self.samples.len() as f32)).to_rgb8()
    }

    fn render_tile(&self, frame: usize, tile: Tile) -> RenderedTile {
        let pixels = tile.pixels().map(|(x, y)| self.pixel(frame, x, y)).collect();
        RenderedTile { tile, pixels }
    }

    /// Render `frame` into `buffer`, which is resized to fit.  Returns
    /// the elapsed wall-clock seconds.  Reusing one buffer across frames
    /// avoids reallocating it every time.
    pub fn render_into(&self, frame: usize, buffer: &mut Vec<u8>) -> Result<f64, RenderError> {
        let start = Instant::now();
        let scheduler = TileScheduler::new(TileGrid::new(self.width, self.height));
        debug!(
            frame,
            tiles = scheduler.grid().len(),
            threads = self.threads,
            "rendering frame"
        );

        let rendered = run_workers(self.threads, |worker| {
            let mut done = vec![];
            while let Some(tile) = scheduler.next_tile() {
                done.push(self.render_tile(frame, tile));
            }
            trace!(worker, tiles = done.len(), "worker finished");
            done
        })?;

        buffer.clear();
        buffer.resize(self.width * self.height * CHANNELS, 0);
        for rendered in rendered.into_iter().flatten() {
            for ((x, y), rgb) in rendered.tile.pixels().zip(rendered.pixels) {
                let offset = (y * self.width + x) * CHANNELS;
                buffer[offset..offset + CHANNELS].copy_from_slice(&rgb);
            }
        }

        Ok(start.elapsed().as_secs_f64())
    }

    /// Render `frame` into a new image.
    pub fn render(&self, frame: usize) -> Result<RenderedFrame, RenderError> {
        let mut buffer = vec![];
        let elapsed = self.render_into(frame, &mut buffer)?;
        let image = RgbImage::from_raw(self.width as u32, self.height as u32, buffer)
            .ok_or_else(|| RenderError::config("frame is too large for an image buffer"))?;
        Ok(RenderedFrame { image, elapsed })
    }
}

/// Build the sample set shared by every frame.
pub fn build_sample_set(count: usize) -> SampleSet {
    SampleSet::new(count)
}

/// Build the noise field shared by every frame.
pub fn build_noise_field(size: usize) -> Result<NoiseField, RenderError> {
    NoiseField::new(size)
}

/// Render frame `frame` of a `total_frames` loop at `width` x `height`,
/// using `threads` workers.  Returns the pixels and the elapsed seconds.
pub fn render_frame(
    frame: usize,
    width: usize,
    height: usize,
    total_frames: usize,
    samples: &SampleSet,
    noise: &NoiseField,
    threads: usize,
) -> Result<(RgbImage, f64), RenderError> {
    let driver = FrameDriver::new(width, height, total_frames, threads, samples, noise)?;
    let rendered = driver.render(frame)?;
    Ok((rendered.image, rendered.elapsed))
}
