// ============================================================================
// CANVAS — the square, power-of-two RGBA buffer every rotation mutates
// ============================================================================

use image::{Rgba, RgbaImage};

use crate::error::RotateError;

/// Largest supported canvas side in pixels.
pub const MAX_SIDE: u32 = 1024;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// A square RGBA image whose side is a power of two.
///
/// Created once per run from the decoded source and mutated in place level by
/// level. Frames handed to sinks are borrowed views of [`SquareCanvas::image`].
#[derive(Clone, Debug, PartialEq)]
pub struct SquareCanvas {
    side: u32,
    pixels: RgbaImage,
}

impl SquareCanvas {
    /// Wrap an image, checking square / power-of-two / `MAX_SIDE`.
    pub fn new(pixels: RgbaImage) -> Result<Self, RotateError> {
        Self::with_max_side(pixels, MAX_SIDE)
    }

    /// Like [`SquareCanvas::new`] with a custom side limit.
    pub fn with_max_side(pixels: RgbaImage, max_side: u32) -> Result<Self, RotateError> {
        let (w, h) = pixels.dimensions();
        if w == 0 || h == 0 {
            return Err(RotateError::InvalidInput("image is empty".to_string()));
        }
        if w != h {
            return Err(RotateError::UnsupportedGeometry { width: w, height: h });
        }
        if !w.is_power_of_two() {
            return Err(RotateError::NotPowerOfTwo(w));
        }
        if w > max_side {
            return Err(RotateError::TooLarge { side: w, max: max_side });
        }
        Ok(Self { side: w, pixels })
    }

    /// Blank canvas filled with one colour.
    pub fn filled(side: u32, color: Rgba<u8>) -> Result<Self, RotateError> {
        Self::new(RgbaImage::from_pixel(side, side, color))
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Owned deep copy, used as the read-only source for a level.
    pub fn snapshot(&self) -> RgbaImage {
        self.pixels.clone()
    }

    /// Raw row-major RGBA bytes.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Overwrite every pixel from a same-sized image.
    pub(crate) fn copy_from(&mut self, src: &RgbaImage) {
        debug_assert_eq!(src.dimensions(), self.pixels.dimensions());
        self.pixels.copy_from_slice(src.as_raw());
    }
}

/// Exact 90° clockwise rotation, used to check the animated result.
pub fn rotate_90cw_reference(src: &RgbaImage) -> RgbaImage {
    image::imageops::rotate90(src)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_square() {
        let err = SquareCanvas::new(RgbaImage::new(8, 4)).unwrap_err();
        assert!(matches!(err, RotateError::UnsupportedGeometry { width: 8, height: 4 }));
    }

    #[test]
    fn rejects_non_power_of_two() {
        let err = SquareCanvas::new(RgbaImage::new(6, 6)).unwrap_err();
        assert!(matches!(err, RotateError::NotPowerOfTwo(6)));
    }

    #[test]
    fn rejects_oversized_and_empty() {
        let err = SquareCanvas::with_max_side(RgbaImage::new(16, 16), 8).unwrap_err();
        assert!(matches!(err, RotateError::TooLarge { side: 16, max: 8 }));
        let err = SquareCanvas::new(RgbaImage::new(0, 0)).unwrap_err();
        assert!(matches!(err, RotateError::InvalidInput(_)));
    }

    #[test]
    fn accepts_single_pixel() {
        let canvas = SquareCanvas::filled(1, Rgba([1, 2, 3, 255])).unwrap();
        assert_eq!(canvas.side(), 1);
        assert_eq!(canvas.image().as_raw(), &vec![1, 2, 3, 255]);
    }

    #[test]
    fn snapshot_is_independent() {
        let mut canvas = SquareCanvas::filled(2, Rgba([0, 0, 0, 255])).unwrap();
        let snap = canvas.snapshot();
        canvas.pixels_mut()[0] = 200;
        assert_eq!(snap.get_pixel(0, 0)[0], 0);
        assert_eq!(canvas.image().get_pixel(0, 0)[0], 200);
    }
}
