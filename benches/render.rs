#[macro_use]
extern crate criterion;
extern crate newtonloop;

use criterion::Criterion;
use newtonloop::noise::hilbert_ordering;
use newtonloop::{build_noise_field, build_sample_set, FrameDriver};

fn render_small_frame(c: &mut Criterion) {
    let samples = build_sample_set(36);
    let noise = build_noise_field(256).unwrap();
    c.bench_function("render 64x36 at 36spp", move |b| {
        let driver = FrameDriver::new(64, 36, 360, 1, &samples, &noise).unwrap();
        b.iter(|| driver.render(90).unwrap())
    });
}

fn build_noise(c: &mut Criterion) {
    c.bench_function("hilbert ordering 256", |b| b.iter(|| hilbert_ordering(256)));
}

criterion_group!(benches, render_small_frame, build_noise);
criterion_main!(benches);
