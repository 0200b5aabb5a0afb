use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{RgbaImage, imageops};

use crate::canvas::SquareCanvas;
use crate::error::{RotateError, SinkError};
use crate::log_info;
use crate::sink::FrameSink;

// ============================================================================
// IMAGE SOURCE
// ============================================================================

/// Interpolation used when a source has to be scaled to a power of two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Interpolation {
    Nearest,
    #[default]
    Bilinear,
    Bicubic,
    Lanczos3,
}

impl Interpolation {
    pub fn to_filter(self) -> imageops::FilterType {
        match self {
            Interpolation::Nearest  => imageops::FilterType::Nearest,
            Interpolation::Bilinear => imageops::FilterType::Triangle,
            Interpolation::Bicubic  => imageops::FilterType::CatmullRom,
            Interpolation::Lanczos3 => imageops::FilterType::Lanczos3,
        }
    }
}

/// Side a square source of `side` pixels is scaled to.
///
/// Power-of-two sides are kept unless they exceed `max_side`. Any other side
/// becomes the smallest power of two that is at least `side / 2` (integer
/// division), capped at `max_side`.
pub fn normalized_side(side: u32, max_side: u32) -> u32 {
    if side.is_power_of_two() {
        return side.min(max_side);
    }
    let mut power = 1;
    while power < side / 2 && power < max_side {
        power *= 2;
    }
    power
}

/// Decode `path`, require a square image and scale it to a power-of-two side
/// no larger than `max_side`.
pub fn load_square_image(
    path: &Path,
    max_side: u32,
    interpolation: Interpolation,
) -> Result<SquareCanvas, RotateError> {
    if !max_side.is_power_of_two() {
        return Err(RotateError::NotPowerOfTwo(max_side));
    }
    if !path.is_file() {
        return Err(RotateError::InvalidInput(format!(
            "'{}' does not exist",
            path.display()
        )));
    }

    let img: RgbaImage = image::open(path)
        .map_err(|e| RotateError::InvalidInput(format!("'{}': {}", path.display(), e)))?
        .to_rgba8();

    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(RotateError::InvalidInput(format!(
            "'{}' has no pixels",
            path.display()
        )));
    }
    if w != h {
        return Err(RotateError::UnsupportedGeometry { width: w, height: h });
    }

    let side = normalized_side(w, max_side);
    let img = if side != w {
        log_info!("resizing {}x{} source to {}x{}", w, h, side, side);
        imageops::resize(&img, side, side, interpolation.to_filter())
    } else {
        img
    };

    SquareCanvas::with_max_side(img, max_side)
}

// ============================================================================
// OUTPUT FORMATS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Animated GIF (256-colour palette per frame).
    Gif,
    /// Animated PNG, lossless.
    Apng,
    /// One PNG file per frame in a directory.
    Frames,
}

impl OutputFormat {
    /// Infer the format from the output path: `.gif`, `.png` / `.apng`, or a
    /// directory (existing, or a path without extension).
    pub fn from_path(path: &Path) -> Result<Self, SinkError> {
        if path.is_dir() {
            return Ok(OutputFormat::Frames);
        }
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("gif")          => Ok(OutputFormat::Gif),
            Some("png" | "apng") => Ok(OutputFormat::Apng),
            None                 => Ok(OutputFormat::Frames),
            Some(other) => Err(SinkError::Unsupported(format!(
                "cannot infer an animation format from '.{}' (use .gif, .png or a directory)",
                other
            ))),
        }
    }
}

/// Open the file-backed sink for `format`.
///
/// `planned_frames` is the exact number of frames that will be written; APNG
/// needs it in its header.
pub fn open_sink(
    path: &Path,
    format: OutputFormat,
    side: u32,
    fps: u32,
    planned_frames: u32,
) -> Result<Box<dyn FrameSink>, SinkError> {
    Ok(match format {
        OutputFormat::Gif    => Box::new(GifSink::create(path, side, fps)?),
        OutputFormat::Apng   => Box::new(ApngSink::create(path, side, fps, planned_frames)?),
        OutputFormat::Frames => Box::new(PngSequenceSink::create(path, side)?),
    })
}

fn check_frame(frame: &RgbaImage, side: u32) -> Result<(), SinkError> {
    let (w, h) = frame.dimensions();
    if w != side || h != side {
        return Err(SinkError::FrameSize {
            got_w: w,
            got_h: h,
            want_w: side,
            want_h: side,
        });
    }
    Ok(())
}

fn create_file(path: &Path) -> Result<BufWriter<File>, SinkError> {
    let file = File::create(path).map_err(|source| SinkError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

// ============================================================================
// ANIMATED GIF
// ============================================================================

/// Streams frames into an infinitely looping GIF, each frame with its own
/// quantized palette.
pub struct GifSink {
    encoder: Option<gif::Encoder<BufWriter<File>>>,
    side: u32,
    delay_cs: u16,
    written: u32,
}

impl GifSink {
    pub fn create(path: &Path, side: u32, fps: u32) -> Result<Self, SinkError> {
        if side > u16::MAX as u32 {
            return Err(SinkError::Unsupported(
                "Image dimensions exceed GIF maximum (65535×65535)".to_string(),
            ));
        }
        let delay_cs = ((100.0 / fps.max(1) as f32).round() as u16).max(1); // centiseconds

        // No global palette: every frame carries a local one.
        let mut encoder = gif::Encoder::new(create_file(path)?, side as u16, side as u16, &[])?;
        encoder.set_repeat(gif::Repeat::Infinite)?;

        Ok(Self {
            encoder: Some(encoder),
            side,
            delay_cs,
            written: 0,
        })
    }
}

impl FrameSink for GifSink {
    fn write_frame(&mut self, frame: &RgbaImage) -> Result<(), SinkError> {
        check_frame(frame, self.side)?;
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| SinkError::Unsupported("GIF sink already finished".to_string()))?;

        let (palette, indexed) = quantize_rgba(frame, 256);
        let gif_frame = gif::Frame {
            width: self.side as u16,
            height: self.side as u16,
            delay: self.delay_cs,
            palette: Some(palette),
            buffer: std::borrow::Cow::Owned(indexed),
            ..Default::default()
        };
        encoder.write_frame(&gif_frame)?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        if let Some(encoder) = self.encoder.take() {
            // into_inner writes the GIF trailer
            let mut writer = encoder.into_inner()?;
            writer.flush()?;
        }
        Ok(())
    }

    fn frames_written(&self) -> u32 {
        self.written
    }
}

/// Quantize an RGBA image to indexed color (palette + indices).
/// Returns (flat_palette_rgb: Vec<u8>, indices: Vec<u8>).
/// The palette is in [R,G,B, R,G,B, ...] format as required by the gif crate.
fn quantize_rgba(image: &RgbaImage, max_colors: usize) -> (Vec<u8>, Vec<u8>) {
    let nq = color_quant::NeuQuant::new(10, max_colors, image.as_raw());

    let mut palette = Vec::with_capacity(max_colors * 3);
    for i in 0..max_colors {
        match nq.lookup(i) {
            Some(color) => palette.extend_from_slice(&color[..3]),
            None => palette.extend_from_slice(&[0, 0, 0]),
        }
    }

    let indices = image
        .as_raw()
        .chunks_exact(4)
        .map(|p| nq.index_of(p) as u8)
        .collect();

    (palette, indices)
}

// ============================================================================
// ANIMATED PNG
// ============================================================================

/// Writes an APNG. The frame count is fixed when the file is created.
pub struct ApngSink {
    writer: Option<png::Writer<BufWriter<File>>>,
    side: u32,
    delay_ms: u16,
    expected: u32,
    written: u32,
}

impl ApngSink {
    pub fn create(path: &Path, side: u32, fps: u32, frames: u32) -> Result<Self, SinkError> {
        if frames == 0 {
            return Err(SinkError::Unsupported("No frames to encode".to_string()));
        }
        let delay_ms = (1000.0 / fps.max(1) as f32).round().clamp(1.0, 65535.0) as u16;

        let mut encoder = png::Encoder::new(create_file(path)?, side, side);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_animated(frames, 0)?; // 0 = infinite loop
        let writer = encoder.write_header()?;

        Ok(Self {
            writer: Some(writer),
            side,
            delay_ms,
            expected: frames,
            written: 0,
        })
    }
}

impl FrameSink for ApngSink {
    fn write_frame(&mut self, frame: &RgbaImage) -> Result<(), SinkError> {
        check_frame(frame, self.side)?;
        if self.written == self.expected {
            return Err(SinkError::FrameCount {
                expected: self.expected,
                received: self.written + 1,
            });
        }
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| SinkError::Unsupported("APNG sink already finished".to_string()))?;

        writer.set_frame_delay(self.delay_ms, 1000)?;
        writer.set_dispose_op(png::DisposeOp::Background)?;
        writer.write_image_data(frame.as_raw())?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        if self.written != self.expected {
            return Err(SinkError::FrameCount {
                expected: self.expected,
                received: self.written,
            });
        }
        if let Some(writer) = self.writer.take() {
            writer.finish()?;
        }
        Ok(())
    }

    fn frames_written(&self) -> u32 {
        self.written
    }
}

// ============================================================================
// PNG FRAME SEQUENCE
// ============================================================================

/// Writes `frame_000001.png`, `frame_000002.png`, … into a directory.
pub struct PngSequenceSink {
    dir: PathBuf,
    side: u32,
    written: u32,
}

impl PngSequenceSink {
    pub fn create(dir: &Path, side: u32) -> Result<Self, SinkError> {
        fs::create_dir_all(dir).map_err(|source| SinkError::Create {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
            side,
            written: 0,
        })
    }

    pub fn frame_path(&self, index: u32) -> PathBuf {
        self.dir.join(format!("frame_{:06}.png", index))
    }
}

impl FrameSink for PngSequenceSink {
    fn write_frame(&mut self, frame: &RgbaImage) -> Result<(), SinkError> {
        check_frame(frame, self.side)?;
        let path = self.frame_path(self.written + 1);
        frame.save_with_format(&path, image::ImageFormat::Png)?;
        self.written += 1;
        Ok(())
    }

    fn frames_written(&self) -> u32 {
        self.written
    }
}
