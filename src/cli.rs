// ============================================================================
// quadrotate CLI — turn one square image into a quadrant-rotation animation
// ============================================================================
//
// Usage examples:
//   quadrotate photo.jpg                         (writes results.gif)
//   quadrotate photo.jpg -o spin.png             (APNG, lossless)
//   quadrotate photo.jpg -o frames/ --fps 60     (PNG sequence for ffmpeg)
//   quadrotate photo.jpg --dry-run -v            (count frames, write nothing)

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use crate::canvas::MAX_SIDE;
use crate::error::RotateError;
use crate::io::{Interpolation, OutputFormat, load_square_image, open_sink};
use crate::ops::animation::{
    AnimationConfig, AnimationDriver, DEFAULT_FPS, DEFAULT_HOLD_SECONDS, DEFAULT_ROTATIONS,
};
use crate::ops::stepper::MAX_IN_FLIGHT;
use crate::sink::{CountingSink, FrameSink};
use crate::{log_err, log_info};

/// Exit code when the image is missing or cannot be decoded.
pub const EXIT_NO_IMAGE: u8 = 2;
/// Exit code when the image is not square.
pub const EXIT_NOT_SQUARE: u8 = 3;

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// Rotate a square image by a full revolution, one quadrant swap at a time.
#[derive(Parser, Debug)]
#[command(
    name = "quadrotate",
    about = "Animate a square image rotating by recursive quadrant swaps",
    long_about = "Rotates a square image 90° clockwise four times by swapping the\n\
                  quadrants of ever smaller segments, and writes every intermediate\n\
                  state as an animation frame. Non power-of-two images are scaled\n\
                  down first; the largest supported side is 1024 pixels.\n\n\
                  Example:\n  \
                  quadrotate photo.jpg -o results.gif\n  \
                  quadrotate photo.jpg -o frames/ --fps 60"
)]
pub struct CliArgs {
    /// Square source image (PNG, JPEG, WEBP, BMP, TGA, ICO, TIFF, GIF).
    #[arg(value_name = "IMAGE")]
    pub input: PathBuf,

    /// Output path. `.gif` → animated GIF, `.png`/`.apng` → APNG,
    /// a directory or a path without extension → numbered PNG frames.
    #[arg(short, long, default_value = "results.gif", value_name = "FILE")]
    pub output: PathBuf,

    /// Force the output format instead of inferring it from --output.
    #[arg(short, long, value_enum, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Playback rate of the animation.
    #[arg(long, default_value_t = DEFAULT_FPS, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub fps: u32,

    /// Pause before the first and after each quarter turn, in seconds.
    #[arg(long, default_value_t = DEFAULT_HOLD_SECONDS, value_name = "SECONDS")]
    pub hold: u32,

    /// Number of quarter turns.
    #[arg(long, default_value_t = DEFAULT_ROTATIONS)]
    pub rotations: u32,

    /// Largest canvas side (power of two); larger sources are scaled down.
    #[arg(long, default_value_t = MAX_SIDE, value_parser = parse_power_of_two)]
    pub max_side: u32,

    /// Maximum number of quadrant swaps running at the same time.
    #[arg(short, long, default_value_t = MAX_IN_FLIGHT)]
    pub jobs: usize,

    /// Filter used when the source has to be resized.
    #[arg(long, value_enum, default_value_t = Interpolation::Bilinear)]
    pub interpolation: Interpolation,

    /// Run the whole animation but write no output (prints the frame count).
    #[arg(long)]
    pub dry_run: bool,

    /// Session log location (defaults to the platform data directory).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Mirror the session log to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Animation tunables selected on the command line.
    pub fn animation_config(&self) -> AnimationConfig {
        AnimationConfig {
            fps: self.fps,
            hold_seconds: self.hold,
            max_side: self.max_side,
            max_in_flight: self.jobs.max(1),
            rotations: self.rotations,
        }
    }
}

fn parse_power_of_two(s: &str) -> Result<u32, String> {
    let v: u32 = s.parse().map_err(|e| format!("{}", e))?;
    if v == 0 || !v.is_power_of_two() {
        return Err(format!("{} is not a power of two", v));
    }
    Ok(v)
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run one animation and return an OS exit code.
/// `0` = done, `2` = no usable image, `3` = image not square, `1` = anything else.
pub fn run(args: CliArgs) -> ExitCode {
    let start = Instant::now();
    match run_animation(&args) {
        Ok(frames) => {
            if args.dry_run {
                println!("Done! {} frames (dry run, nothing written)", frames);
            } else {
                println!(
                    "Done! Check the {} file in your folder ({} frames, {:.1}s)",
                    args.output.display(),
                    frames,
                    start.elapsed().as_secs_f64()
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_err!("{}", e);
            if e.is_input_error() {
                eprintln!("error: {}", e);
            } else {
                eprintln!("error: animation failed: {}", e);
            }
            exit_code_for(&e)
        }
    }
}

/// Map a failure to the process exit code.
pub fn exit_code_for(err: &RotateError) -> ExitCode {
    match err {
        RotateError::InvalidInput(_) => ExitCode::from(EXIT_NO_IMAGE),
        RotateError::UnsupportedGeometry { .. } => ExitCode::from(EXIT_NOT_SQUARE),
        _ => ExitCode::FAILURE,
    }
}

// ============================================================================
// Pipeline: load → animate → encode
// ============================================================================

fn run_animation(args: &CliArgs) -> Result<u32, RotateError> {
    let config = args.animation_config();

    // -- Step 1: Load ----------------------------------------------------
    let mut canvas = load_square_image(&args.input, config.max_side, args.interpolation)?;
    let side = canvas.side();
    println!("Loaded image, height: {}, width: {}", side, side);
    log_info!("loaded '{}' as {}x{}", args.input.display(), side, side);

    // -- Step 2: Open the sink -------------------------------------------
    let driver = AnimationDriver::new(config)?;
    let planned = driver.planned_frames(side)?;
    let mut sink: Box<dyn FrameSink> = if args.dry_run {
        Box::new(CountingSink::new())
    } else {
        let format = match args.format {
            Some(f) => f,
            None => OutputFormat::from_path(&args.output)?,
        };
        log_info!("writing {:?} to '{}'", format, args.output.display());
        open_sink(&args.output, format, side, driver.config().fps, planned)?
    };

    // -- Step 3: Animate -------------------------------------------------
    let summary = driver.run(&mut canvas, &mut sink)?;
    Ok(summary.frames)
}
