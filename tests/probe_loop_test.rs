//! End-to-end probe loop tests over synthetic frame feeds

use image::{GrayImage, Luma};
use motion_probe::capture::{BufferedSource, DirectorySink, NullSink};
use motion_probe::{ProbeConfig, ProbeError, ProbeRunner};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn uniform(value: u8) -> GrayImage {
    GrayImage::from_pixel(48, 36, Luma([value]))
}

/// A frame with a 6x6 block of the given intensity on a dark background
fn frame_with_block(value: u8) -> GrayImage {
    let mut frame = uniform(20);
    for y in 12..18 {
        for x in 10..16 {
            frame.put_pixel(x, y, Luma([value]));
        }
    }
    frame
}

fn unpaced_config() -> ProbeConfig {
    ProbeConfig::default().with_interval(0)
}

#[test]
fn test_static_feed_produces_empty_masks() {
    init_logs();
    let source = BufferedSource::new((0..6).map(|_| uniform(80)));
    let runner = ProbeRunner::new(unpaced_config());

    let report = runner.run(source, &mut NullSink).unwrap();

    // Six frames fill one window of three, then three more iterations
    assert_eq!(report.frames_processed, 4);
    assert_eq!(report.last_coverage, 0.0);
    assert_eq!(report.peak_coverage, 0.0);
    assert_eq!(report.template_matches, 0);
}

#[test]
fn test_changing_block_registers_coverage() {
    init_logs();
    // The block brightens by 30 every frame, so the same pixels change in
    // both transitions of every window, well above the default threshold
    let source = BufferedSource::new((0u8..8).map(|i| frame_with_block(20 + 30 * i)));
    let runner = ProbeRunner::new(unpaced_config());

    let report = runner.run(source, &mut NullSink).unwrap();

    assert_eq!(report.frames_processed, 6);
    assert!(report.peak_coverage > 0.0);
    assert!(report.last_coverage > 0.0);
}

#[test]
fn test_feed_shorter_than_window_fails() {
    init_logs();
    let source = BufferedSource::new([uniform(0), uniform(0)]);
    let runner = ProbeRunner::new(unpaced_config());

    let err = runner.run(source, &mut NullSink).unwrap_err();
    assert!(matches!(err, ProbeError::SourceUnavailable(_)));
}

#[test]
fn test_inconsistent_frame_sizes_propagate() {
    init_logs();
    let source = BufferedSource::new([
        uniform(0),
        uniform(0),
        GrayImage::from_pixel(10, 10, Luma([0])),
    ]);
    let runner = ProbeRunner::new(unpaced_config());

    let err = runner.run(source, &mut NullSink).unwrap_err();
    assert!(matches!(err, ProbeError::DimensionMismatch { .. }));
}

#[test]
fn test_pre_stopped_runner_processes_nothing() {
    init_logs();
    let source = BufferedSource::new((0..10).map(|_| uniform(0)));
    let runner = ProbeRunner::new(unpaced_config());
    runner.stop_handle().stop();

    let report = runner.run(source, &mut NullSink).unwrap();
    assert_eq!(report.frames_processed, 0);
}

#[test]
fn test_directory_sink_dumps_frames_and_masks() {
    init_logs();
    let dir = std::env::temp_dir().join(format!("motion-probe-sink-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let source = BufferedSource::new((0..5).map(|_| uniform(50)));
    let runner = ProbeRunner::new(unpaced_config());
    let mut sink = DirectorySink::new(&dir).unwrap();

    let report = runner.run(source, &mut sink).unwrap();
    assert_eq!(report.frames_processed, 3);

    let mut names: Vec<String> = std::fs::read_dir(&dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    // One frame + one mask per iteration, interleaved sequence numbers
    assert_eq!(names.len(), 6);
    assert!(names.iter().any(|n| n.starts_with("frame_")));
    assert!(names.iter().any(|n| n.starts_with("mask_")));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_template_check_runs_alongside_motion() {
    init_logs();
    let dir = std::env::temp_dir().join(format!("motion-probe-tpl-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    // Distinctive template, saved to disk the way an operator would
    // provide a reference crop
    let template = GrayImage::from_fn(10, 8, |x, y| Luma([((x * 11 + y * 17) % 239) as u8]));
    let template_path = dir.join("reference.png");
    template.save(&template_path).unwrap();

    // Every frame embeds the template at a fixed position
    let make_frame = || {
        let mut frame = uniform(25);
        for (x, y, p) in template.enumerate_pixels() {
            frame.put_pixel(15 + x, 10 + y, *p);
        }
        frame
    };
    let source = BufferedSource::new((0..5).map(|_| make_frame()));

    let mut config = unpaced_config();
    config.template = Some(motion_probe::TemplateConfig {
        path: template_path,
        threshold: 0.7,
    });

    let runner = ProbeRunner::new(config);
    let report = runner.run(source, &mut NullSink).unwrap();

    assert_eq!(report.frames_processed, 3);
    assert_eq!(report.template_matches, 3);
    // Identical frames: no motion despite the embedded pattern
    assert_eq!(report.peak_coverage, 0.0);

    std::fs::remove_dir_all(&dir).unwrap();
}
