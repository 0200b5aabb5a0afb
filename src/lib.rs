//! Animated 90° rotation of square images by recursive quadrant swaps.
//!
//! A `side`×`side` canvas (power of two) is rotated clockwise by swapping the
//! four quadrants of the whole image, then of every quadrant, and so on down
//! to two-pixel segments. Each swap is spread over a number of sub-steps and
//! every sub-step becomes one animation frame.
//!
//! ```text
//!   AnimationDriver      hold, 4 × (quarter turn, hold)
//!     RotationScheduler    one level per segment width: side, side/2, … 2
//!       FrameStepper         sub-steps of a level, fanned out on a rayon pool
//!         segments             disjoint mutable views, one per segment
//!         quadrants            zone displacement inside one segment
//! ```
//!
//! # Example
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use quadrotate::{AnimationConfig, AnimationDriver, SquareCanvas, VecSink};
//!
//! let img = RgbaImage::from_fn(8, 8, |x, y| Rgba([x as u8 * 30, y as u8 * 30, 0, 255]));
//! let original = img.clone();
//! let mut canvas = SquareCanvas::new(img).unwrap();
//!
//! let config = AnimationConfig { hold_seconds: 0, ..AnimationConfig::default() };
//! let driver = AnimationDriver::new(config).unwrap();
//! let mut sink = VecSink::new();
//! let summary = driver.run(&mut canvas, &mut sink).unwrap();
//!
//! assert_eq!(summary.frames, 24);
//! assert_eq!(canvas.image(), &original); // a full revolution
//! ```

pub mod logger;

pub mod canvas;
pub mod cli;
pub mod error;
pub mod io;
pub mod ops;
pub mod sink;

pub use crate::canvas::{MAX_SIDE, SquareCanvas};
pub use crate::error::{RotateError, SinkError};
pub use crate::ops::animation::{AnimationConfig, AnimationDriver, RunSummary};
pub use crate::ops::rotation::{RotationScheduler, frames_per_rotation, initial_sub_steps};
pub use crate::ops::stepper::FrameStepper;
pub use crate::sink::{CountingSink, FrameSink, VecSink};
