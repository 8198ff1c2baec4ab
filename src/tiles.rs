// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Work distribution for a frame.
//!
//! The image is cut into small square buckets, numbered row-major.
//! Workers share one atomic counter and take the next bucket number
//! from it until the numbers run out.  Small buckets keep every thread
//! busy to the end of the frame no matter how uneven the per-pixel cost
//! is, and a bucket's pixels are close together in memory.

use itertools::iproduct;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Edge length of a bucket, in pixels.
pub const TILE_SIZE: usize = 4;

/// A rectangle of pixels, `[x0, x1) x [y0, y1)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tile {
    /// Left edge, inclusive.
    pub x0: usize,
    /// Right edge, exclusive.
    pub x1: usize,
    /// Top edge, inclusive.
    pub y0: usize,
    /// Bottom edge, exclusive.
    pub y1: usize,
}

impl Tile {
    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.x1 - self.x0
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.y1 - self.y0
    }

    /// Number of pixels covered.
    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    /// True for a tile that covers nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `(x, y)` coordinates of every pixel in the tile, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize)> {
        iproduct!(self.y0..self.y1, self.x0..self.x1).map(|(y, x)| (x, y))
    }
}

/// How a `width` x `height` image divides into buckets.  Buckets on the
/// right and bottom edges are clipped to the image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tile_size: usize,
    x_tiles: usize,
    y_tiles: usize,
}

impl TileGrid {
    /// A grid of `TILE_SIZE` buckets.
    pub fn new(width: usize, height: usize) -> TileGrid {
        TileGrid::with_tile_size(width, height, TILE_SIZE)
    }

    /// A grid of buckets of an arbitrary, positive edge length.
    pub fn with_tile_size(width: usize, height: usize, tile_size: usize) -> TileGrid {
        assert!(tile_size > 0, "tile size must be positive");
        TileGrid {
            width,
            height,
            tile_size,
            x_tiles: (width + tile_size - 1) / tile_size,
            y_tiles: (height + tile_size - 1) / tile_size,
        }
    }

    /// Total number of buckets in a frame.
    pub fn len(&self) -> usize {
        self.x_tiles * self.y_tiles
    }

    /// True when the image has no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The bucket with the given row-major number, or `None` once the
    /// numbers are past the end of the frame.
    pub fn tile(&self, index: usize) -> Option<Tile> {
        if index >= self.len() {
            return None;
        }
        let (tile_y, tile_x) = (index / self.x_tiles, index % self.x_tiles);
        let (x0, y0) = (tile_x * self.tile_size, tile_y * self.tile_size);
        Some(Tile {
            x0,
            x1: (x0 + self.tile_size).min(self.width),
            y0,
            y1: (y0 + self.tile_size).min(self.height),
        })
    }
}

/// The shared bucket counter for one frame.  Lives only as long as the
/// frame it hands out work for.
#[derive(Debug, Default)]
pub struct TileCounter(AtomicUsize);

impl TileCounter {
    /// A counter starting at bucket zero.
    pub fn new() -> TileCounter {
        TileCounter(AtomicUsize::new(0))
    }

    /// Take the next bucket number.  Every call returns a different
    /// number, in increasing order across all callers.
    #[inline]
    pub fn claim(&self) -> usize {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// A grid paired with the counter handing out its buckets.  Shared by
/// reference among all the workers of a frame.
#[derive(Debug)]
pub struct TileScheduler {
    grid: TileGrid,
    counter: TileCounter,
}

impl TileScheduler {
    /// A fresh scheduler for one frame, starting at bucket zero.
    pub fn new(grid: TileGrid) -> TileScheduler {
        TileScheduler {
            grid,
            counter: TileCounter::new(),
        }
    }

    /// The layout being handed out.
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Claim the next unclaimed bucket.  `None` means the frame has no
    /// more work; it stays `None` for every later call.
    pub fn next_tile(&self) -> Option<Tile> {
        self.grid.tile(self.counter.claim())
    }
}
