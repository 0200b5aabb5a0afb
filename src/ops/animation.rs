// ============================================================================
// ANIMATION DRIVER — four quarter turns with holds in between
// ============================================================================

use crate::canvas::{MAX_SIDE, SquareCanvas};
use crate::error::RotateError;
use crate::ops::rotation::{RotationScheduler, frames_per_rotation, initial_sub_steps};
use crate::ops::stepper::{FrameStepper, MAX_IN_FLIGHT};
use crate::sink::FrameSink;
use crate::{log_err, log_info};

/// Playback rate of the output animation.
pub const DEFAULT_FPS: u32 = 30;

/// Pause before the first and after every quarter turn, in seconds.
pub const DEFAULT_HOLD_SECONDS: u32 = 1;

/// Quarter turns per run (one full revolution).
pub const DEFAULT_ROTATIONS: u32 = 4;

/// Tunables of one animation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationConfig {
    pub fps: u32,
    pub hold_seconds: u32,
    /// Largest accepted canvas side; larger sources are scaled down.
    pub max_side: u32,
    /// Cap on concurrently running quadrant swaps.
    pub max_in_flight: usize,
    pub rotations: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            hold_seconds: DEFAULT_HOLD_SECONDS,
            max_side: MAX_SIDE,
            max_in_flight: MAX_IN_FLIGHT,
            rotations: DEFAULT_ROTATIONS,
        }
    }
}

impl AnimationConfig {
    /// Duplicated frames written for each hold.
    pub fn hold_frames(&self) -> Result<u32, RotateError> {
        self.fps
            .checked_mul(self.hold_seconds)
            .ok_or(RotateError::FrameCountOverflow)
    }
}

/// Totals reported after a successful run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u32,
    pub rotations: u32,
    pub side: u32,
}

pub struct AnimationDriver {
    config: AnimationConfig,
    scheduler: RotationScheduler,
}

impl AnimationDriver {
    pub fn new(config: AnimationConfig) -> Result<Self, RotateError> {
        config.hold_frames()?;
        let stepper = FrameStepper::new(config.max_in_flight)?;
        Ok(Self {
            config,
            scheduler: RotationScheduler::new(stepper),
        })
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Exact number of frames [`AnimationDriver::run`] writes for a canvas
    /// of `side`. Sinks that must know the length up front use this.
    ///
    /// Fails with [`RotateError::FrameCountOverflow`] when the total does not
    /// fit in a `u32`.
    pub fn planned_frames(&self, side: u32) -> Result<u32, RotateError> {
        let cfg = &self.config;
        let holds = cfg
            .rotations
            .checked_add(1)
            .and_then(|n| n.checked_mul(cfg.hold_frames().ok()?));
        let motion = cfg.rotations.checked_mul(frames_per_rotation(side));
        holds
            .zip(motion)
            .and_then(|(h, m)| h.checked_add(m))
            .ok_or(RotateError::FrameCountOverflow)
    }

    /// Hold, then `rotations` times: rotate 90° clockwise and hold.
    ///
    /// Frames go to `sink` in production order. `sink.finish()` is only
    /// called when every frame was written.
    pub fn run<S: FrameSink + ?Sized>(
        &self,
        canvas: &mut SquareCanvas,
        sink: &mut S,
    ) -> Result<RunSummary, RotateError> {
        let side = canvas.side();
        let sub_steps = initial_sub_steps(side);
        // Every running total below is bounded by this one.
        let planned = self.planned_frames(side)?;
        log_info!(
            "animating {}x{} canvas: {} sub-steps on the first level, {} frames planned",
            side,
            side,
            sub_steps,
            planned
        );

        let result = self.run_inner(canvas, side, sub_steps, sink);
        if let Err(e) = &result {
            log_err!("animation aborted: {}", e);
        }
        let frames = result?;

        sink.finish()?;
        log_info!("animation finished: {} frames", frames);
        Ok(RunSummary {
            frames,
            rotations: self.config.rotations,
            side,
        })
    }

    fn run_inner<S: FrameSink + ?Sized>(
        &self,
        canvas: &mut SquareCanvas,
        side: u32,
        sub_steps: u32,
        sink: &mut S,
    ) -> Result<u32, RotateError> {
        let mut frames = self.hold(canvas, sink)?;
        for turn in 0..self.config.rotations {
            log_info!("rotation {}/{}", turn + 1, self.config.rotations);
            frames += self.scheduler.rotate(canvas, sub_steps, side, sink)?;
            frames += self.hold(canvas, sink)?;
        }
        Ok(frames)
    }

    fn hold<S: FrameSink + ?Sized>(
        &self,
        canvas: &SquareCanvas,
        sink: &mut S,
    ) -> Result<u32, RotateError> {
        let count = self.config.hold_frames()?;
        for _ in 0..count {
            sink.write_frame(canvas.image())?;
        }
        Ok(count)
    }
}
