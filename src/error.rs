// ============================================================================
// ERRORS — input validation, rotation core, and frame sink failures
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

/// Failures while writing frames to an output sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to create output '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("frame is {got_w}x{got_h} but the sink was opened for {want_w}x{want_h}")]
    FrameSize {
        got_w: u32,
        got_h: u32,
        want_w: u32,
        want_h: u32,
    },

    #[error("sink expected {expected} frames but received {received}")]
    FrameCount { expected: u32, received: u32 },

    #[error("GIF encode error: {0}")]
    Gif(#[from] gif::EncodingError),

    #[error("PNG encode error: {0}")]
    Png(#[from] png::EncodingError),

    #[error("image write error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Unsupported(String),
}

/// Everything that can stop an animation run.
#[derive(Debug, Error)]
pub enum RotateError {
    /// Missing, unreadable, or undecodable image.
    #[error("image not found or could not be decoded: {0}")]
    InvalidInput(String),

    #[error("the width of the image should equal the height (got {width}x{height})")]
    UnsupportedGeometry { width: u32, height: u32 },

    #[error("canvas side {0} is not a power of two")]
    NotPowerOfTwo(u32),

    #[error("canvas side {side} exceeds the maximum of {max}")]
    TooLarge { side: u32, max: u32 },

    #[error("segment width {width} does not tile a canvas of side {side}")]
    SegmentMisaligned { side: u32, width: u32 },

    #[error("shift {shift} exceeds half of segment width {width}")]
    ShiftOutOfRange { width: u32, shift: u32 },

    #[error("the requested animation has more frames than can be counted")]
    FrameCountOverflow,

    #[error("could not start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl RotateError {
    /// Input errors are reported before any rotation work starts.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RotateError::InvalidInput(_)
                | RotateError::UnsupportedGeometry { .. }
                | RotateError::NotPowerOfTwo(_)
                | RotateError::TooLarge { .. }
        )
    }
}
