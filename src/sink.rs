//! Frame sinks — where finished animation frames go.
//!
//! The rotation core only ever calls [`FrameSink::write_frame`] in strict
//! production order, once per completed sub-step or hold frame, and
//! [`FrameSink::finish`] once at the end of a successful run. File-backed
//! sinks live in [`crate::io`].

use image::RgbaImage;

use crate::error::SinkError;

pub trait FrameSink {
    /// Accept the next frame. Called only after every worker of the sub-step
    /// has joined, so `frame` is never torn.
    fn write_frame(&mut self, frame: &RgbaImage) -> Result<(), SinkError>;

    /// Flush and close the output.
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Frames accepted so far.
    fn frames_written(&self) -> u32;
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn write_frame(&mut self, frame: &RgbaImage) -> Result<(), SinkError> {
        (**self).write_frame(frame)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        (**self).finish()
    }

    fn frames_written(&self) -> u32 {
        (**self).frames_written()
    }
}

/// Keeps every frame in memory.
#[derive(Default, Debug)]
pub struct VecSink {
    pub frames: Vec<RgbaImage>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSink for VecSink {
    fn write_frame(&mut self, frame: &RgbaImage) -> Result<(), SinkError> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn frames_written(&self) -> u32 {
        self.frames.len() as u32
    }
}

/// Discards frames, only counting them (dry runs).
#[derive(Default, Debug)]
pub struct CountingSink {
    count: u32,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSink for CountingSink {
    fn write_frame(&mut self, _frame: &RgbaImage) -> Result<(), SinkError> {
        self.count += 1;
        Ok(())
    }

    fn frames_written(&self) -> u32 {
        self.count
    }
}
