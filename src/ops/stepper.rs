// ============================================================================
// FRAME STEPPER — one recursion level: interpolate the swap over sub-steps
// ============================================================================

use image::RgbaImage;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::canvas::SquareCanvas;
use crate::error::RotateError;
use crate::ops::quadrants::swap_quadrants;
use crate::ops::segments::split_segments_mut;
use crate::sink::FrameSink;

/// Default cap on concurrently running quadrant swaps.
pub const MAX_IN_FLIGHT: usize = 32;

/// Shift (in pixels) of sub-step `i` out of `sub_steps` for segments of
/// `width`. Grows linearly and reaches `width / 2` on the last sub-step.
pub fn shift_for(width: u32, sub_steps: u32, i: u32) -> u32 {
    if sub_steps == 0 {
        return 0;
    }
    ((width / 2) * (i + 1)) / sub_steps
}

/// Runs the sub-steps of a level on a bounded worker pool.
pub struct FrameStepper {
    pool: ThreadPool,
    max_in_flight: usize,
}

impl FrameStepper {
    /// Pool with at most `max_in_flight` swaps running at once (min 1).
    pub fn new(max_in_flight: usize) -> Result<Self, RotateError> {
        let max_in_flight = max_in_flight.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(max_in_flight)
            .thread_name(|i| format!("quadrotate-swap-{}", i))
            .build()?;
        Ok(Self { pool, max_in_flight })
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Animate one level: `sub_steps` frames, each showing every segment's
    /// zones displaced a little further from where the level started.
    ///
    /// Returns the number of frames written. Levels with `width <= 1` or no
    /// sub-steps write nothing and leave the canvas untouched.
    pub fn run_level<S: FrameSink + ?Sized>(
        &self,
        canvas: &mut SquareCanvas,
        width: u32,
        sub_steps: u32,
        sink: &mut S,
    ) -> Result<u32, RotateError> {
        if width <= 1 || sub_steps == 0 {
            return Ok(0);
        }

        let level_start = canvas.snapshot();
        for i in 0..sub_steps {
            let shift = shift_for(width, sub_steps, i);
            canvas.copy_from(&level_start);
            self.apply_shift(&level_start, canvas, width, shift)?;
            // Every swap of this sub-step has joined; the frame is complete.
            sink.write_frame(canvas.image())?;
        }
        Ok(sub_steps)
    }

    /// Jump straight to the end of a level (full `width / 2` shift) without
    /// writing a frame.
    pub fn settle_level(&self, canvas: &mut SquareCanvas, width: u32) -> Result<(), RotateError> {
        if width <= 1 {
            return Ok(());
        }
        let level_start = canvas.snapshot();
        self.apply_shift(&level_start, canvas, width, width / 2)
    }

    /// Fan one swap per segment out over the pool and wait for all of them.
    /// The first failing swap stops the remaining ones.
    fn apply_shift(
        &self,
        snapshot: &RgbaImage,
        canvas: &mut SquareCanvas,
        width: u32,
        shift: u32,
    ) -> Result<(), RotateError> {
        let side = canvas.side();
        let segments = split_segments_mut(canvas.pixels_mut(), side, width)?;
        self.pool.install(|| {
            segments
                .into_par_iter()
                .try_for_each(|mut segment| swap_quadrants(snapshot, &mut segment, shift))
        })
    }
}
