// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
#[macro_use]
extern crate failure;
extern crate newtonloop;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use failure::Error;
use newtonloop::output::FrameWriter;
use newtonloop::{build_noise_field, build_sample_set, FrameDriver, Quality, RenderConfig};
use std::str::FromStr;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_power_of_two(s: &str) -> Result<(), String> {
    match usize::from_str(s) {
        Ok(n) if n.is_power_of_two() => Ok(()),
        _ => Err("Noise size must be a power of two".to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const FRAMES: &str = "frames";
const QUALITY: &str = "quality";
const NOISE_SIZE: &str = "noise-size";
const THREADS: &str = "threads";
const NO_SAVE: &str = "no-save";

fn args<'a>(default_threads: &'a str) -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("newtonloop")
        .version("0.1.0")
        .about("Supersampled Newton fractal loop renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value(".")
                .help("Directory to write frames and timing logs into"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1280x720")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of each frame"),
        )
        .arg(
            Arg::with_name(FRAMES)
                .long(FRAMES)
                .short("f")
                .takes_value(true)
                .default_value("360")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        100_000,
                        "Could not parse frame count",
                        "Frame count must be between 1 and 100000",
                    )
                })
                .help("Number of frames in the whole loop"),
        )
        .arg(
            Arg::with_name(QUALITY)
                .long(QUALITY)
                .short("q")
                .takes_value(true)
                .possible_values(&["test", "low", "medium", "final"])
                .default_value("medium")
                .help("Samples per pixel: 6, 36, 216 or 1296"),
        )
        .arg(
            Arg::with_name(NOISE_SIZE)
                .long(NOISE_SIZE)
                .short("n")
                .takes_value(true)
                .default_value("256")
                .validator(|s| validate_power_of_two(&s))
                .help("Edge length of the dither texture"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value(default_threads)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to render with"),
        )
        .arg(
            Arg::with_name(NO_SAVE)
                .long(NO_SAVE)
                .help("Render and time frames without writing them"),
        )
        .get_matches()
}

fn config_from(matches: &ArgMatches) -> Result<RenderConfig, Error> {
    let (width, height) = parse_pair::<usize>(matches.value_of(SIZE).unwrap_or_default(), 'x')
        .ok_or_else(|| format_err!("Could not parse output image size"))?;
    let quality = Quality::from_str(matches.value_of(QUALITY).unwrap_or_default())
        .map_err(|e| format_err!("{}", e))?;
    let config = RenderConfig {
        width,
        height,
        frames: usize::from_str(matches.value_of(FRAMES).unwrap_or_default())?,
        samples: quality.samples(),
        noise_size: usize::from_str(matches.value_of(NOISE_SIZE).unwrap_or_default())?,
        threads: usize::from_str(matches.value_of(THREADS).unwrap_or_default())?,
    };
    config.validate()?;
    Ok(config)
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let config = config_from(matches)?;
    let save_frames = !matches.is_present(NO_SAVE);
    info!(
        "Rendering {} frames at res {} x {} with {} samples per pixel",
        config.frames, config.width, config.height, config.samples
    );

    let samples = build_sample_set(config.samples);
    let noise = build_noise_field(config.noise_size)?;
    let driver = FrameDriver::from_config(&config, &samples, &noise)?;
    let mut writer = FrameWriter::create(matches.value_of(OUTPUT).unwrap_or("."))?;

    let bench_start = Instant::now();
    let mut total_render_time = 0.0;
    for frame in 0..config.loop_frames() {
        let rendered = driver.render(frame)?;
        info!("Frame {} took {:.2} seconds", frame, rendered.elapsed);
        total_render_time += rendered.elapsed;
        if save_frames {
            writer.save_frame(frame, &rendered.image)?;
        }
        writer.record_time(frame, rendered.elapsed)?;
    }

    let elapsed = bench_start.elapsed().as_secs_f64();
    info!(
        "Rendering animation took {:.2} seconds ({:.2} including saving)",
        total_render_time, elapsed
    );
    writer.write_benchmark(total_render_time, elapsed)?;

    if save_frames {
        let copied = writer.mirror_frames(config.frames)?;
        info!("Mirrored {} frames to complete the loop", copied);
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let default_threads = RenderConfig::default_threads().to_string();
    let matches = args(&default_threads);
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
