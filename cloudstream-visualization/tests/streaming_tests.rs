//! Integration tests for the producer → frame buffer → render loop path
//!
//! These tests drive the public API only, with the headless engine standing
//! in for a real renderer.

use approx::assert_relative_eq;
use cloudstream_core::{ColoredPoint3f, ColoredPointCloud3f, Point3f};
use cloudstream_visualization::*;
use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// A cloud of `n` points whose x coordinate encodes `tag`
fn tagged_cloud(tag: f32, n: usize) -> ColoredPointCloud3f {
    (0..n)
        .map(|i| ColoredPoint3f::new(tag, i as f32, 0.0, [10, 20, 30, 255]))
        .collect()
}

fn rgb_cloud() -> ColoredPointCloud3f {
    vec![
        (0.0, 0.0, 0.0, 255, 0, 0, 255),
        (1.0, 1.0, 1.0, 0, 255, 0, 255),
        (2.0, 2.0, 2.0, 0, 0, 255, 255),
    ]
    .into_iter()
    .map(ColoredPoint3f::from)
    .collect()
}

#[test]
fn test_last_publish_wins() {
    let frames = FrameBuffer::new();
    for tag in 1..=5 {
        frames.publish(&tagged_cloud(tag as f32, tag)).unwrap();
    }

    let observed = frames.take_if_dirty().unwrap().unwrap();
    assert_eq!(observed.len(), 5);
    assert!(observed.iter().all(|p| p.position.x == 5.0));
    assert_eq!(frames.generation(), 5);
}

#[test]
fn test_consumed_frame_is_not_reconverted() {
    let frames = Arc::new(FrameBuffer::new());
    let mut adapter = RenderLoopAdapter::new(frames.clone(), SceneBuilder::new(0.02));
    let mut scene = HeadlessScene::default();

    frames.publish(&tagged_cloud(1.0, 10)).unwrap();
    assert!(adapter.draw_cycle(&mut scene).unwrap());
    for _ in 0..10 {
        assert!(!adapter.draw_cycle(&mut scene).unwrap());
    }
    assert_eq!(scene.set_points_calls(), 1);

    frames.publish(&tagged_cloud(2.0, 4)).unwrap();
    assert!(adapter.draw_cycle(&mut scene).unwrap());
    assert_eq!(scene.set_points_calls(), 2);
    assert_eq!(scene.positions()[0].x, 2.0);
}

#[test]
fn test_empty_cloud_scene() {
    let scene = build_scene(&ColoredPointCloud3f::new(), 0.02, 1.0).unwrap();
    assert!(scene.positions.is_empty());
    assert!(scene.colors.is_empty());
    assert!(scene.radii.is_empty());
    assert_eq!(scene.overlay.markers.len(), 4);
    assert_eq!(scene.overlay.labels.len(), 4);
}

#[test]
fn test_color_conversion_bounds() {
    let cloud: ColoredPointCloud3f = (0..=255u8)
        .map(|v| ColoredPoint3f::new(0.0, 0.0, 0.0, [v, 255 - v, v, 0]))
        .collect();
    let scene = build_scene(&cloud, 1.0, 1.0).unwrap();

    for (v, color) in scene.colors.iter().enumerate() {
        assert_relative_eq!(color[0], v as f32 / 255.0, epsilon = 1e-6);
        assert_relative_eq!(color[1], (255 - v) as f32 / 255.0, epsilon = 1e-6);
        assert!(color.iter().all(|c| (0.0..=1.0).contains(c)));
    }
}

#[test]
fn test_uniform_radius_for_any_cloud_size() {
    for (n, scale, zoom) in [(0usize, 0.02f32, 1.0f32), (1, 0.5, 3.0), (1000, 0.01, 0.25)] {
        let scene = build_scene(&tagged_cloud(0.0, n), scale, zoom).unwrap();
        assert_eq!(scene.radii.len(), n);
        for r in &scene.radii {
            assert_relative_eq!(*r, scale * zoom, epsilon = 1e-7);
        }
        assert_relative_eq!(scene.overlay.marker_radius, 10.0 * scale * zoom, epsilon = 1e-6);
    }
}

#[test]
fn test_concurrent_publishes_never_mix() {
    for _ in 0..50 {
        let frames = Arc::new(FrameBuffer::new());
        let barrier = Arc::new(Barrier::new(2));

        let writers: Vec<_> = [(1.0f32, 100usize), (2.0, 5)]
            .into_iter()
            .map(|(tag, n)| {
                let frames = frames.clone();
                let barrier = barrier.clone();
                let cloud = tagged_cloud(tag, n);
                thread::spawn(move || {
                    barrier.wait();
                    frames.publish(&cloud).unwrap();
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let mut adapter = RenderLoopAdapter::new(frames.clone(), SceneBuilder::new(0.02));
        let mut scene = HeadlessScene::default();
        assert!(adapter.draw_cycle(&mut scene).unwrap());

        // Overlay markers follow the cloud points
        let points = &scene.positions()[..scene.point_count() - 4];
        match points.len() {
            100 => assert!(points.iter().all(|p| p.x == 1.0)),
            5 => assert!(points.iter().all(|p| p.x == 2.0)),
            other => panic!("partial frame with {} points", other),
        }
    }
}

#[test]
fn test_reader_during_publishing_sees_whole_frames() {
    let frames = Arc::new(FrameBuffer::new());
    let writer_frames = frames.clone();
    let writer = thread::spawn(move || {
        for i in 0..500 {
            let n = if i % 2 == 0 { 100 } else { 5 };
            writer_frames.publish_owned(tagged_cloud(n as f32, n));
        }
    });

    let mut adapter = RenderLoopAdapter::new(frames.clone(), SceneBuilder::new(0.02))
        .with_policy(RedrawPolicy::EveryCycle);
    let mut scene = HeadlessScene::default();
    for _ in 0..500 {
        adapter.draw_cycle(&mut scene).unwrap();
        let points = &scene.positions()[..scene.point_count() - 4];
        assert!(matches!(points.len(), 0 | 5 | 100));
        assert!(points.iter().all(|p| p.x == points.len() as f32));
    }
    writer.join().unwrap();
}

#[test]
fn test_end_to_end_three_points() {
    let frames = Arc::new(FrameBuffer::new());
    frames.publish(&rgb_cloud()).unwrap();

    let mut adapter = RenderLoopAdapter::new(frames.clone(), SceneBuilder::new(0.02));
    let mut scene = HeadlessScene::default();
    assert_eq!(scene.camera_zoom(), 1.0);
    assert!(!adapter.on_draw_cycle(&mut scene));

    let expected_positions = [
        Point3f::new(0.0, 0.0, 0.0),
        Point3f::new(1.0, 1.0, 1.0),
        Point3f::new(2.0, 2.0, 2.0),
    ];
    let expected_colors = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    assert_eq!(&scene.positions()[..3], &expected_positions);
    assert_eq!(&scene.colors()[..3], &expected_colors);
    for r in &scene.radii()[..3] {
        assert_relative_eq!(*r, 0.02, epsilon = 1e-7);
    }

    // Axis markers
    assert_eq!(scene.point_count(), 7);
    assert_eq!(scene.positions()[3], Point3f::origin());
    assert!(scene.colors()[3..].iter().all(|c| *c == [1.0, 0.0, 0.0]));
    for r in &scene.radii()[3..] {
        assert_relative_eq!(*r, 0.2, epsilon = 1e-6);
    }

    let labels: Vec<&str> = scene.labels().iter().map(|(_, text)| text.as_str()).collect();
    assert_eq!(labels, vec!["x", "y", "z", "centre"]);
    assert_eq!(scene.labels()[0].0, Point3f::new(1.0, 0.0, 0.0));
}

#[test]
fn test_zoom_is_read_every_cycle() {
    let frames = Arc::new(FrameBuffer::new());
    let mut adapter = RenderLoopAdapter::new(frames.clone(), SceneBuilder::new(0.02));
    let mut scene = HeadlessScene::default();

    frames.publish(&rgb_cloud()).unwrap();
    adapter.draw_cycle(&mut scene).unwrap();
    assert_relative_eq!(scene.radii()[0], 0.02, epsilon = 1e-7);

    scene.camera.set_zoom(4.0);
    frames.publish(&rgb_cloud()).unwrap();
    adapter.draw_cycle(&mut scene).unwrap();
    assert_relative_eq!(scene.radii()[0], 0.08, epsilon = 1e-7);
}

#[test]
fn test_bootstrap_launch_streams_frames() {
    let frames = Arc::new(FrameBuffer::new());
    let mut engine = HeadlessEngine::new()
        .with_frame_interval(Duration::from_millis(1))
        .with_max_cycles(5_000);

    // Stop once the published frame has been converted
    let handle = engine.handle();
    let watched = frames.clone();
    engine.register_post_draw_hook(Box::new(move |_| {
        if watched.generation() >= 1 && !watched.is_dirty() {
            handle.quit();
        }
        false
    }));

    let (done_tx, done_rx) = mpsc::channel();
    Bootstrap::new(ViewerConfig::default())
        .launch(&mut engine, frames.clone(), move |producer| {
            producer.publish(&rgb_cloud()).unwrap();
            while !producer.is_shutdown() {
                thread::sleep(Duration::from_millis(1));
            }
            done_tx.send(()).unwrap();
        })
        .unwrap();

    assert!(engine.cycles() < 5_000, "frame never reached the render loop");
    assert!(engine.scene().set_points_calls() >= 2, "placeholder was not shown first");
    assert_eq!(engine.scene().point_count(), 7);
    assert_eq!(engine.scene().labels().len(), 4);

    // Shutdown hook releases the producer
    done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
}

#[test]
fn test_bootstrap_aborts_on_bad_placeholder() {
    let config = ViewerConfig {
        initial_mesh: Some("missing/placeholder.off".into()),
        ..Default::default()
    };
    let mut engine = HeadlessEngine::new().with_max_cycles(1);

    let result = Bootstrap::new(config).launch(&mut engine, Arc::new(FrameBuffer::new()), |_| {});
    assert!(result.is_err());
    assert_eq!(engine.cycles(), 0);
}
