use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use cloudstream_core::{ColoredPoint3f, ColoredPointCloud3f};
use cloudstream_visualization::{FrameBuffer, SceneBuilder};
use rand::Rng;

const CLOUD_SIZES: [usize; 4] = [1_000, 10_000, 100_000, 1_000_000];

fn random_cloud(n: usize) -> ColoredPointCloud3f {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| {
            ColoredPoint3f::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                [rng.gen(), rng.gen(), rng.gen(), 255],
            )
        })
        .collect()
}

fn scene_build(c: &mut Criterion) {
    let builder = SceneBuilder::new(0.02);

    let mut g = c.benchmark_group("scene build");
    g.sample_size(10);

    for n in CLOUD_SIZES {
        let cloud = random_cloud(n);
        g.bench_with_input(BenchmarkId::from_parameter(n), &cloud, |b, cloud| {
            b.iter(|| std::hint::black_box(&builder).build(std::hint::black_box(cloud), 1.0));
        });
    }

    g.finish();
}

fn publish(c: &mut Criterion) {
    let frames = FrameBuffer::new();

    let mut g = c.benchmark_group("publish");
    g.sample_size(10);

    for n in CLOUD_SIZES {
        let cloud = random_cloud(n);
        g.bench_with_input(BenchmarkId::from_parameter(n), &cloud, |b, cloud| {
            b.iter(|| frames.publish(std::hint::black_box(cloud)));
        });
    }

    g.finish();
}

criterion_group!(benches, scene_build, publish);
criterion_main!(benches);
