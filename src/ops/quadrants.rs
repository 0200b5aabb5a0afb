// ============================================================================
// QUADRANT SWAP — one clockwise displacement step inside a single segment
// ============================================================================
//
// A segment is split into four zones:
//
//      0 | 1          after a full shift (width/2):     2 | 0
//     ---|---                                          ---|---
//      2 | 3                                            3 | 1
//
// Zone 0 slides right, 1 slides down, 3 slides left and 2 slides up, each by
// `shift` pixels. Intermediate shifts leave part of the segment uncovered
// (those pixels keep their level-start value) and let neighbouring zones
// overlap; zones are written in order 0, 1, 2, 3 so the later zone wins.

use image::RgbaImage;

use crate::canvas::BYTES_PER_PIXEL;
use crate::error::RotateError;
use crate::ops::segments::SegmentMut;

/// One of the four zones of a segment, numbered row-major.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// The zone this one moves into: 0→1→3→2→0.
    pub fn clockwise_successor(self) -> Quadrant {
        match self {
            Quadrant::TopLeft => Quadrant::TopRight,
            Quadrant::TopRight => Quadrant::BottomRight,
            Quadrant::BottomRight => Quadrant::BottomLeft,
            Quadrant::BottomLeft => Quadrant::TopLeft,
        }
    }

    /// Segment-local top-left corner of this zone.
    pub fn offset(self, half: u32) -> (u32, u32) {
        match self {
            Quadrant::TopLeft => (0, 0),
            Quadrant::TopRight => (half, 0),
            Quadrant::BottomLeft => (0, half),
            Quadrant::BottomRight => (half, half),
        }
    }

    fn displaced(self, half: u32, shift: u32) -> (u32, u32) {
        let (x, y) = self.offset(half);
        match self {
            Quadrant::TopLeft => (x + shift, y),
            Quadrant::TopRight => (x, y + shift),
            Quadrant::BottomLeft => (x, y - shift),
            Quadrant::BottomRight => (x - shift, y),
        }
    }
}

/// Square region in segment-local coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl Rect {
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.size
            && other.x < self.x + self.size
            && self.y < other.y + other.size
            && other.y < self.y + self.size
    }

    /// Whether the rect lies inside a `width`×`width` segment.
    pub fn within(&self, width: u32) -> bool {
        self.x + self.size <= width && self.y + self.size <= width
    }
}

/// Where one zone is read from and where it lands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QuadrantMove {
    pub quadrant: Quadrant,
    pub src: Rect,
    pub dst: Rect,
}

/// The four zone moves for a segment of `width` displaced by `shift`.
pub fn quadrant_moves(width: u32, shift: u32) -> Result<[QuadrantMove; 4], RotateError> {
    let half = width / 2;
    if shift > half {
        return Err(RotateError::ShiftOutOfRange { width, shift });
    }
    Ok(Quadrant::ALL.map(|quadrant| {
        let (sx, sy) = quadrant.offset(half);
        let (dx, dy) = quadrant.displaced(half, shift);
        QuadrantMove {
            quadrant,
            src: Rect { x: sx, y: sy, size: half },
            dst: Rect { x: dx, y: dy, size: half },
        }
    }))
}

/// Copy the four zones of `segment` from `snapshot` into the segment view,
/// each displaced by `shift`. Only the destination rows are written; the
/// target is never read.
pub fn swap_quadrants(
    snapshot: &RgbaImage,
    segment: &mut SegmentMut<'_>,
    shift: u32,
) -> Result<(), RotateError> {
    let width = segment.width();
    let (ox, oy) = segment.origin();
    let side = snapshot.width();
    if ox + width > side || oy + width > snapshot.height() {
        return Err(RotateError::SegmentMisaligned { side, width });
    }

    let moves = quadrant_moves(width, shift)?;
    let src = snapshot.as_raw();
    let row_bytes = side as usize * BYTES_PER_PIXEL;
    let span = (width / 2) as usize * BYTES_PER_PIXEL;

    for mv in &moves {
        for r in 0..mv.src.size {
            let src_start = (oy + mv.src.y + r) as usize * row_bytes
                + (ox + mv.src.x) as usize * BYTES_PER_PIXEL;
            let dst_start = mv.dst.x as usize * BYTES_PER_PIXEL;
            segment.row_mut(mv.dst.y + r)[dst_start..dst_start + span]
                .copy_from_slice(&src[src_start..src_start + span]);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::segments::split_segments_mut;
    use image::Rgba;

    /// 4×4 image where every quadrant has a single distinct colour.
    fn quadrant_image() -> RgbaImage {
        RgbaImage::from_fn(4, 4, |x, y| {
            let q = (y / 2) * 2 + (x / 2);
            Rgba([q as u8 * 10, 0, 0, 255])
        })
    }

    #[test]
    fn successor_cycle_is_clockwise() {
        let mut q = Quadrant::TopLeft;
        let mut seen = vec![q];
        for _ in 0..3 {
            q = q.clockwise_successor();
            seen.push(q);
        }
        assert_eq!(
            seen,
            vec![
                Quadrant::TopLeft,
                Quadrant::TopRight,
                Quadrant::BottomRight,
                Quadrant::BottomLeft
            ]
        );
        assert_eq!(q.clockwise_successor(), Quadrant::TopLeft);
    }

    #[test]
    fn full_shift_lands_on_successor() {
        let moves = quadrant_moves(8, 4).unwrap();
        for mv in &moves {
            let (x, y) = mv.quadrant.clockwise_successor().offset(4);
            assert_eq!((mv.dst.x, mv.dst.y), (x, y));
        }
    }

    #[test]
    fn destinations_stay_inside_segment_for_every_shift() {
        for width in [2u32, 4, 8, 16, 32] {
            for shift in 0..=width / 2 {
                for mv in quadrant_moves(width, shift).unwrap() {
                    assert!(mv.dst.within(width), "w={width} s={shift} {mv:?}");
                    assert!(mv.src.within(width));
                }
            }
        }
    }

    #[test]
    fn destinations_are_disjoint_at_rest_and_full_shift() {
        for width in [2u32, 4, 8, 16] {
            for shift in [0, width / 2] {
                let moves = quadrant_moves(width, shift).unwrap();
                for a in 0..4 {
                    for b in (a + 1)..4 {
                        assert!(!moves[a].dst.overlaps(&moves[b].dst), "w={width} s={shift}");
                    }
                }
            }
        }
    }

    #[test]
    fn shift_beyond_half_is_rejected() {
        let err = quadrant_moves(4, 3).unwrap_err();
        assert!(matches!(err, RotateError::ShiftOutOfRange { width: 4, shift: 3 }));
    }

    #[test]
    fn full_shift_rotates_zones_clockwise() {
        let snapshot = quadrant_image();
        let mut target = snapshot.clone();
        {
            let mut segs = split_segments_mut(&mut target, 4, 4).unwrap();
            swap_quadrants(&snapshot, &mut segs[0], 2).unwrap();
        }
        let zone = |x: u32, y: u32| target.get_pixel(x, y)[0] / 10;
        // 0 | 1      2 | 0
        // 2 | 3  ->  3 | 1
        assert_eq!(zone(0, 0), 2);
        assert_eq!(zone(2, 0), 0);
        assert_eq!(zone(0, 2), 3);
        assert_eq!(zone(2, 2), 1);
    }

    #[test]
    fn half_shift_smears_and_later_zone_wins() {
        let snapshot = quadrant_image();
        let mut target = snapshot.clone();
        {
            let mut segs = split_segments_mut(&mut target, 4, 4).unwrap();
            swap_quadrants(&snapshot, &mut segs[0], 1).unwrap();
        }
        let zone = |x: u32, y: u32| target.get_pixel(x, y)[0] / 10;
        // Uncovered corner keeps its level-start value.
        assert_eq!(zone(0, 0), 0);
        // Zone 0 moved right by one.
        assert_eq!(zone(1, 0), 0);
        assert_eq!(zone(2, 0), 0);
        // Zone 1 moved down by one and overwrites zone 0 at (2, 1).
        assert_eq!(zone(2, 1), 1);
        assert_eq!(zone(3, 0), 1);
        // Zone 3 moved left and is written last.
        assert_eq!(zone(1, 2), 3);
        assert_eq!(zone(2, 2), 3);
    }

    #[test]
    fn only_touches_its_own_segment() {
        let snapshot = RgbaImage::from_fn(8, 8, |x, y| Rgba([x as u8, y as u8, 7, 255]));
        let mut target = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0]));
        {
            let mut segs = split_segments_mut(&mut target, 8, 4).unwrap();
            swap_quadrants(&snapshot, &mut segs[3], 2).unwrap();
        }
        for y in 0..8 {
            for x in 0..8 {
                let inside = x >= 4 && y >= 4;
                let written = target.get_pixel(x, y)[3] == 255;
                assert_eq!(inside, written, "pixel ({x},{y})");
            }
        }
        // Zone 2 of that segment (origin (4,6)) now sits at (4,4).
        assert_eq!(target.get_pixel(4, 4), &Rgba([4, 6, 7, 255]));
    }
}
