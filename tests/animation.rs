use std::fs::File;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use image::{Rgba, RgbaImage};
use quadrotate::cli::{self, CliArgs, EXIT_NO_IMAGE, EXIT_NOT_SQUARE};
use quadrotate::io::{Interpolation, load_square_image};
use quadrotate::{
    AnimationConfig, AnimationDriver, CountingSink, FrameSink, SquareCanvas, VecSink,
    frames_per_rotation,
};

fn checker(side: u32) -> RgbaImage {
    RgbaImage::from_fn(side, side, |x, y| {
        let v = ((x * 7 + y * 13) % 251) as u8;
        Rgba([v, 255 - v, (x ^ y) as u8, 255])
    })
}

fn save(dir: &Path, name: &str, img: &RgbaImage) -> std::path::PathBuf {
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

#[test]
fn each_hold_shows_the_next_quarter_turn() {
    let img = checker(32);
    let mut canvas = SquareCanvas::new(img.clone()).unwrap();
    let config = AnimationConfig {
        fps: 1,
        hold_seconds: 1,
        max_in_flight: 3,
        ..AnimationConfig::default()
    };
    let driver = AnimationDriver::new(config).unwrap();
    let mut sink = VecSink::new();
    let summary = driver.run(&mut canvas, &mut sink).unwrap();

    let per_turn = frames_per_rotation(32) as usize;
    assert_eq!(summary.frames as usize, 5 + 4 * per_turn);

    let mut expected = img.clone();
    for turn in 0..=4 {
        let hold_index = turn * (per_turn + 1);
        assert_eq!(sink.frames[hold_index], expected, "hold after turn {turn}");
        expected = image::imageops::rotate90(&expected);
    }
    assert_eq!(canvas.image(), &img);
}

#[test]
fn frames_change_every_motion_step() {
    let mut canvas = SquareCanvas::new(checker(16)).unwrap();
    let config = AnimationConfig {
        hold_seconds: 0,
        rotations: 1,
        ..AnimationConfig::default()
    };
    let driver = AnimationDriver::new(config).unwrap();
    let mut sink = VecSink::new();
    driver.run(&mut canvas, &mut sink).unwrap();

    assert_eq!(sink.frames.len(), 12);
    for pair in sink.frames.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn loaded_and_scaled_source_animates() {
    let dir = tempfile::tempdir().unwrap();
    let path = save(dir.path(), "in.png", &RgbaImage::from_pixel(40, 40, Rgba([9, 9, 9, 255])));
    let mut canvas = load_square_image(&path, 1024, Interpolation::Bilinear).unwrap();
    assert_eq!(canvas.side(), 32);

    let driver = AnimationDriver::new(AnimationConfig::default()).unwrap();
    let mut sink = CountingSink::new();
    let summary = driver.run(&mut canvas, &mut sink).unwrap();
    assert_eq!(summary.frames, driver.planned_frames(32).unwrap());
    assert_eq!(sink.frames_written(), 150 + 4 * 20);
}

#[test]
fn cli_writes_png_frames() {
    let dir = tempfile::tempdir().unwrap();
    let input = save(dir.path(), "in.png", &checker(8));
    let out = dir.path().join("frames");
    let args = CliArgs::parse_from([
        "quadrotate",
        input.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
        "--fps",
        "2",
    ]);
    assert_eq!(cli::run(args), ExitCode::SUCCESS);

    // hold(2) × 5 + 4 × 6 motion frames
    let count = std::fs::read_dir(&out).unwrap().count();
    assert_eq!(count, 34);
    let last = image::open(out.join("frame_000034.png")).unwrap().to_rgba8();
    assert_eq!(last, checker(8));
}

#[test]
fn cli_writes_gif() {
    let dir = tempfile::tempdir().unwrap();
    let input = save(dir.path(), "in.png", &checker(4));
    let out = dir.path().join("spin.gif");
    let args = CliArgs::parse_from([
        "quadrotate",
        input.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
        "--hold",
        "0",
    ]);
    assert_eq!(cli::run(args), ExitCode::SUCCESS);

    let mut decoder = gif::DecodeOptions::new();
    decoder.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = decoder.read_info(File::open(&out).unwrap()).unwrap();
    let mut frames = 0;
    while decoder.read_next_frame().unwrap().is_some() {
        frames += 1;
    }
    assert_eq!(frames, 8);
}

#[test]
fn cli_reports_missing_and_non_square_images() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("nope.png");
    let args = CliArgs::parse_from(["quadrotate", missing.to_str().unwrap(), "--dry-run"]);
    assert_eq!(cli::run(args), ExitCode::from(EXIT_NO_IMAGE));

    let wide = save(dir.path(), "wide.png", &RgbaImage::new(16, 8));
    let args = CliArgs::parse_from(["quadrotate", wide.to_str().unwrap(), "--dry-run"]);
    assert_eq!(cli::run(args), ExitCode::from(EXIT_NOT_SQUARE));
}

#[test]
fn cli_rejects_unknown_output_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = save(dir.path(), "in.png", &checker(4));
    let out = dir.path().join("results.avi");
    let args = CliArgs::parse_from(["quadrotate", input.to_str().unwrap(), "-o", out.to_str().unwrap()]);
    assert_eq!(cli::run(args), ExitCode::FAILURE);
    assert!(!out.exists());
}

#[test]
fn cli_fails_cleanly_on_oversized_hold() {
    let dir = tempfile::tempdir().unwrap();
    let input = save(dir.path(), "in.png", &checker(4));
    let args = CliArgs::parse_from([
        "quadrotate",
        input.to_str().unwrap(),
        "--dry-run",
        "--fps",
        "1000",
        "--hold",
        "5000000",
    ]);
    assert_eq!(cli::run(args), ExitCode::FAILURE);

    let args = CliArgs::parse_from([
        "quadrotate",
        input.to_str().unwrap(),
        "--dry-run",
        "--rotations",
        "4294967295",
    ]);
    assert_eq!(cli::run(args), ExitCode::FAILURE);
}
