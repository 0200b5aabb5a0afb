// ============================================================================
// SEGMENT GRID — tile a square canvas into disjoint square segments
// ============================================================================
//
// Segments of one level never overlap, so each one can be handed to its own
// worker. The mutable views are carved out of the pixel buffer with
// `chunks_mut`, which makes the disjointness a compile-time fact instead of
// something a lock has to enforce.

use crate::canvas::BYTES_PER_PIXEL;
use crate::error::RotateError;

/// Mutable view of one segment: `width` row slices of `width` pixels each.
pub struct SegmentMut<'a> {
    x: u32,
    y: u32,
    width: u32,
    rows: Vec<&'a mut [u8]>,
}

impl<'a> SegmentMut<'a> {
    /// Top-left corner in canvas coordinates.
    pub fn origin(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// RGBA bytes of segment-local row `dy`.
    pub fn row_mut(&mut self, dy: u32) -> &mut [u8] {
        &mut *self.rows[dy as usize]
    }
}

fn check_tiling(side: u32, width: u32) -> Result<(), RotateError> {
    if width == 0 || width > side || !width.is_power_of_two() || side % width != 0 {
        return Err(RotateError::SegmentMisaligned { side, width });
    }
    Ok(())
}

/// Every segment origin at `width`, row-major (left to right, top to bottom).
pub fn segment_origins(side: u32, width: u32) -> Result<Vec<(u32, u32)>, RotateError> {
    check_tiling(side, width)?;
    let origins = (0..side)
        .step_by(width as usize)
        .flat_map(|y| (0..side).step_by(width as usize).map(move |x| (x, y)))
        .collect();
    Ok(origins)
}

/// Split a `side`×`side` RGBA buffer into one [`SegmentMut`] per origin, in
/// the same order as [`segment_origins`].
pub fn split_segments_mut(
    bytes: &mut [u8],
    side: u32,
    width: u32,
) -> Result<Vec<SegmentMut<'_>>, RotateError> {
    check_tiling(side, width)?;
    let row_bytes = side as usize * BYTES_PER_PIXEL;
    if bytes.len() != row_bytes * side as usize {
        return Err(RotateError::SegmentMisaligned { side, width });
    }

    let w = width as usize;
    let per_row = (side / width) as usize;
    let seg_bytes = w * BYTES_PER_PIXEL;
    let mut segments = Vec::with_capacity(per_row * per_row);

    for (band_idx, band) in bytes.chunks_mut(row_bytes * w).enumerate() {
        let y = band_idx as u32 * width;
        let mut band_segments: Vec<SegmentMut<'_>> = (0..per_row)
            .map(|col| SegmentMut {
                x: col as u32 * width,
                y,
                width,
                rows: Vec::with_capacity(w),
            })
            .collect();

        for row in band.chunks_mut(row_bytes) {
            for (col, piece) in row.chunks_mut(seg_bytes).enumerate() {
                band_segments[col].rows.push(piece);
            }
        }
        segments.extend(band_segments);
    }

    Ok(segments)
}
