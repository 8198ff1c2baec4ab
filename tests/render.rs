extern crate newtonloop;
extern crate rand;

use newtonloop::newton::FrameClock;
use newtonloop::tiles::TileGrid;
use newtonloop::{build_noise_field, build_sample_set, render_frame, FrameDriver};
use rand::Rng;

#[test]
fn frame_zero_is_reproducible_across_runs_and_thread_counts() {
    let samples = build_sample_set(6);
    let noise = build_noise_field(64).unwrap();
    let (reference, _) = render_frame(0, 8, 8, 360, &samples, &noise, 1).unwrap();
    let reference = reference.into_raw();
    for &threads in &[1, 2, 3, 8] {
        for _ in 0..2 {
            let (image, _) = render_frame(0, 8, 8, 360, &samples, &noise, threads).unwrap();
            assert_eq!(image.into_raw(), reference, "{} threads", threads);
        }
    }
}

#[test]
fn odd_resolutions_are_rendered_identically_in_parallel() {
    let samples = build_sample_set(6);
    let noise = build_noise_field(16).unwrap();
    let single = FrameDriver::new(13, 7, 24, 1, &samples, &noise).unwrap();
    let many = FrameDriver::new(13, 7, 24, 8, &samples, &noise).unwrap();
    for frame in 0..3 {
        let a = single.render(frame).unwrap().image.into_raw();
        let b = many.render(frame).unwrap().image.into_raw();
        assert_eq!(a, b, "frame {}", frame);
    }
}

#[test]
fn the_loop_zooms_in_toward_its_middle() {
    let frames = 360;
    let start = FrameClock::new(0.0, frames);
    let middle = FrameClock::new((frames / 2) as f64, frames);
    assert!(start.scale > middle.scale);
}

#[test]
fn first_and_middle_frames_differ() {
    let samples = build_sample_set(6);
    let noise = build_noise_field(16).unwrap();
    let driver = FrameDriver::new(16, 16, 24, 2, &samples, &noise).unwrap();
    let first = driver.render(0).unwrap().image.into_raw();
    let middle = driver.render(12).unwrap().image.into_raw();
    assert_ne!(first, middle);
}

#[test]
fn random_resolutions_are_partitioned_exactly() {
    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let width = rng.gen_range(1, 200);
        let height = rng.gen_range(1, 200);
        let grid = TileGrid::new(width, height);
        let mut hits = vec![0 as u8; width * height];
        for tile in (0..grid.len()).filter_map(|i| grid.tile(i)) {
            for (x, y) in tile.pixels() {
                hits[y * width + x] += 1;
            }
        }
        assert!(hits.iter().all(|&n| n == 1), "{}x{}", width, height);
        assert_eq!(grid.tile(grid.len()), None);
    }
}
