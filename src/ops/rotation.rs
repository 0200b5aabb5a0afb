// ============================================================================
// ROTATION SCHEDULER — one 90° clockwise turn, level by level
// ============================================================================
//
// Level 0 swaps the four quadrants of the whole canvas, level 1 the quadrants
// of each of those quadrants, and so on until segments are two pixels wide.
// Each level gets two fewer sub-steps than the one before, so the animation
// starts slow and speeds up as the detail gets finer.

use crate::canvas::SquareCanvas;
use crate::error::RotateError;
use crate::ops::stepper::FrameStepper;
use crate::sink::FrameSink;
use crate::{log_info, log_warn};

/// Segment width and sub-step count of one level.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LevelPlan {
    pub width: u32,
    pub sub_steps: u32,
}

impl LevelPlan {
    /// The schedule ran out of sub-steps before the segments reached one
    /// pixel. Such a level is settled without frames.
    pub fn is_degenerate(&self) -> bool {
        self.width > 1 && self.sub_steps == 0
    }
}

/// Sub-steps of the first level for a canvas of `side`: `2 * log2(side / 2)`.
pub fn initial_sub_steps(side: u32) -> u32 {
    if side <= 2 {
        return 0;
    }
    2 * (side / 2).ilog2()
}

/// Every level from `width` down to two-pixel segments. The sub-step count
/// drops by two per level and saturates at zero.
pub fn plan_levels(width: u32, sub_steps: u32) -> Vec<LevelPlan> {
    let mut levels = Vec::new();
    let mut width = width;
    let mut sub_steps = sub_steps;
    while width > 1 {
        levels.push(LevelPlan { width, sub_steps });
        width /= 2;
        sub_steps = sub_steps.saturating_sub(2);
    }
    levels
}

/// Frames written by one full rotation of a `side`×`side` canvas.
pub fn frames_per_rotation(side: u32) -> u32 {
    plan_levels(side, initial_sub_steps(side))
        .iter()
        .map(|level| level.sub_steps)
        .sum()
}

/// Drives the levels of a rotation through a [`FrameStepper`].
pub struct RotationScheduler {
    stepper: FrameStepper,
}

impl RotationScheduler {
    pub fn new(stepper: FrameStepper) -> Self {
        Self { stepper }
    }

    /// Rotate `canvas` 90° clockwise starting at segment `width` with
    /// `sub_steps` frames on the first level. Returns the frames written.
    ///
    /// Levels are strictly sequential: each one reads what the previous one
    /// left in the canvas.
    pub fn rotate<S: FrameSink + ?Sized>(
        &self,
        canvas: &mut SquareCanvas,
        sub_steps: u32,
        width: u32,
        sink: &mut S,
    ) -> Result<u32, RotateError> {
        let mut written = 0;
        for level in plan_levels(width, sub_steps) {
            if level.is_degenerate() {
                log_warn!(
                    "no sub-steps left at segment width {}; settling level without frames",
                    level.width
                );
                self.stepper.settle_level(canvas, level.width)?;
                continue;
            }
            log_info!(
                "level: segment width {}, {} sub-steps",
                level.width,
                level.sub_steps
            );
            written += self
                .stepper
                .run_level(canvas, level.width, level.sub_steps, sink)?;
        }
        Ok(written)
    }

    /// One full turn from the canvas side with the default schedule.
    pub fn rotate_full<S: FrameSink + ?Sized>(
        &self,
        canvas: &mut SquareCanvas,
        sink: &mut S,
    ) -> Result<u32, RotateError> {
        let side = canvas.side();
        self.rotate(canvas, initial_sub_steps(side), side, sink)
    }
}
