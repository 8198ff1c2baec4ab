// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fixed render settings, chosen once at startup.

use crate::error::RenderError;
use std::fmt;
use std::str::FromStr;

/// Samples-per-pixel presets, each six times the last.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Quality {
    /// 6 samples; only good for checking framing.
    Test,
    /// 36 samples.
    Low,
    /// 216 samples.
    Medium,
    /// 1296 samples.
    Final,
}

impl Quality {
    /// Samples per pixel for this preset.
    pub fn samples(self) -> usize {
        match self {
            Quality::Test => 6,
            Quality::Low => 6 * 6,
            Quality::Medium => 6 * 6 * 6,
            Quality::Final => 6 * 6 * 6 * 6,
        }
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Quality, String> {
        match s {
            "test" => Ok(Quality::Test),
            "low" => Ok(Quality::Low),
            "medium" => Ok(Quality::Medium),
            "final" => Ok(Quality::Final),
            _ => Err(format!("unknown quality '{}'", s)),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Quality::Test => "test",
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::Final => "final",
        };
        write!(f, "{}", name)
    }
}

/// Everything that shapes a run.  Nothing here changes once rendering
/// has started.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Frames in the whole loop, both halves.
    pub frames: usize,
    /// Samples per pixel.
    pub samples: usize,
    /// Edge length of the noise texture; a power of two.
    pub noise_size: usize,
    /// Worker threads per frame.
    pub threads: usize,
}

impl RenderConfig {
    /// The thread count used when none is given: every core, or just
    /// one in a debug build.
    pub fn default_threads() -> usize {
        if cfg!(debug_assertions) {
            1
        } else {
            num_cpus::get()
        }
    }

    /// Frames that are actually rendered, `0..=frames / 2`.  The rest
    /// of the loop is a mirror of these.
    pub fn loop_frames(&self) -> usize {
        self.frames / 2 + 1
    }

    /// Check that the settings can be rendered.
    pub fn validate(&self) -> Result<(), RenderError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("frame count", self.frames),
            ("sample count", self.samples),
            ("thread count", self.threads),
        ];
        for &(name, value) in &positive {
            if value == 0 {
                return Err(RenderError::config(format!("{} must be positive", name)));
            }
        }
        if !self.noise_size.is_power_of_two() {
            return Err(RenderError::config(format!(
                "noise size {} is not a power of two",
                self.noise_size
            )));
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig {
            width: 8 * 480 / 3,
            height: 8 * 270 / 3,
            frames: 30 * 12,
            samples: Quality::Medium.samples(),
            noise_size: 1 << 8,
            threads: RenderConfig::default_threads(),
        }
    }
}
