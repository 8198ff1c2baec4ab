// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that touches the disk: the numbered frame images, the
//! per-frame timing log, the benchmark summary, and the mirrored second
//! half of the loop.
//!
//! The layout under the output directory is:
//!
//! ```text
//! frames/frame0000.png ... frames/frameNNNN.png
//! frame_times.csv
//! benchmark_stats.txt
//! ```

use failure::{Error, ResultExt};
use image::RgbImage;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes a run's output under one directory.
#[derive(Debug)]
pub struct FrameWriter {
    root: PathBuf,
    times: File,
}

impl FrameWriter {
    /// Prepare `root` for output, creating the frames directory and
    /// truncating the timing log.
    pub fn create<P: AsRef<Path>>(root: P) -> Result<FrameWriter, Error> {
        let root = root.as_ref().to_path_buf();
        let frames = root.join("frames");
        fs::create_dir_all(&frames)
            .with_context(|_| format!("could not create {}", frames.display()))?;
        let times_path = root.join("frame_times.csv");
        let times = File::create(&times_path)
            .with_context(|_| format!("could not create {}", times_path.display()))?;
        Ok(FrameWriter { root, times })
    }

    /// Where frame number `frame` is stored.
    pub fn frame_path(&self, frame: usize) -> PathBuf {
        self.root
            .join("frames")
            .join(format!("frame{:04}.png", frame))
    }

    /// Save a frame as a PNG.
    pub fn save_frame(&self, frame: usize, image: &RgbImage) -> Result<(), Error> {
        let path = self.frame_path(frame);
        image
            .save(&path)
            .with_context(|_| format!("could not write {}", path.display()))?;
        Ok(())
    }

    /// Append a frame's render time to the timing log.
    pub fn record_time(&mut self, frame: usize, seconds: f64) -> Result<(), Error> {
        writeln!(self.times, "{}, {:.6}", frame, seconds).context("could not write frame_times.csv")?;
        Ok(())
    }

    /// Write the run summary: total render time, then total time
    /// including saving.
    pub fn write_benchmark(&self, render_seconds: f64, total_seconds: f64) -> Result<(), Error> {
        let path = self.root.join("benchmark_stats.txt");
        fs::write(&path, format!("{:.6}\n{:.6}\n", render_seconds, total_seconds))
            .with_context(|_| format!("could not write {}", path.display()))?;
        Ok(())
    }

    /// Complete the loop by copying the first half's frames, in reverse,
    /// into frames `frames / 2 + 1 .. frames`.  Returns the number of
    /// frames copied.
    pub fn mirror_frames(&self, frames: usize) -> Result<usize, Error> {
        let mut copied = 0;
        for (src, dst) in mirror_pairs(frames) {
            let (from, to) = (self.frame_path(src), self.frame_path(dst));
            fs::copy(&from, &to).with_context(|_| {
                format!("could not copy {} to {}", from.display(), to.display())
            })?;
            copied += 1;
        }
        Ok(copied)
    }
}

/// The `(source, destination)` frame numbers that mirror the rendered
/// half of a `frames`-long loop onto the other half.
pub fn mirror_pairs(frames: usize) -> Vec<(usize, usize)> {
    (frames / 2 + 1..frames)
        .map(|dst| (frames - dst, dst))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_pairs_reflect_about_the_middle() {
        assert_eq!(mirror_pairs(8), vec![(3, 5), (2, 6), (1, 7)]);
        assert_eq!(mirror_pairs(7), vec![(3, 4), (2, 5), (1, 6)]);
        assert_eq!(mirror_pairs(2), vec![]);
        assert_eq!(mirror_pairs(1), vec![]);
    }

    #[test]
    fn mirror_pairs_only_read_rendered_frames() {
        for frames in 1..50 {
            for (src, dst) in mirror_pairs(frames) {
                assert!(src <= frames / 2);
                assert!(dst > frames / 2 && dst < frames);
            }
        }
    }

    #[test]
    fn frame_paths_are_zero_padded() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FrameWriter::create(dir.path()).unwrap();
        assert_eq!(
            writer.frame_path(7),
            dir.path().join("frames").join("frame0007.png")
        );
        assert_eq!(
            writer.frame_path(12345),
            dir.path().join("frames").join("frame12345.png")
        );
    }

    #[test]
    fn writes_frames_times_and_mirrors() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FrameWriter::create(dir.path()).unwrap();
        let image = RgbImage::from_raw(2, 2, vec![7; 12]).unwrap();
        for frame in 0..3 {
            writer.save_frame(frame, &image).unwrap();
            writer.record_time(frame, 0.5).unwrap();
        }
        assert_eq!(writer.mirror_frames(4).unwrap(), 1);
        assert!(writer.frame_path(3).exists());
        assert_eq!(
            fs::read(writer.frame_path(1)).unwrap(),
            fs::read(writer.frame_path(3)).unwrap()
        );
        writer.write_benchmark(1.5, 2.0).unwrap();

        let times = fs::read_to_string(dir.path().join("frame_times.csv")).unwrap();
        assert_eq!(times.lines().count(), 3);
        assert!(times.starts_with("0, 0.500000\n"));
        let stats = fs::read_to_string(dir.path().join("benchmark_stats.txt")).unwrap();
        assert_eq!(stats, "1.500000\n2.000000\n");
    }

    #[test]
    fn mirroring_missing_frames_fails() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FrameWriter::create(dir.path()).unwrap();
        assert!(writer.mirror_frames(6).is_err());
    }
}
