//! Synthetic inputs for benchmarks and tests.
//!
//! Every generator returns a `(subject, clip)` pair.

use crate::{Contour, Polygon};

/// An `n` by `n` grid of quadrilaterals with corner `origin`, each `size`
/// wide, spaced `pitch` apart in both directions.
///
/// If `slant` is non-zero the right-hand side of each square is shifted up
/// by `slant`, so that none of the edges are horizontal.
fn grid(origin: (f64, f64), size: f64, pitch: f64, slant: f64, n: usize) -> Polygon {
    let (x0, y0) = origin;
    let mut ret = Polygon::new();
    for i in 0..n {
        let x = x0 + i as f64 * pitch;
        for j in 0..n {
            let y = y0 + j as f64 * pitch;
            ret.push(Contour::new([
                (x, y),
                (x + size, y + slant),
                (x + size, y + size + slant),
                (x, y + size),
            ]));
        }
    }
    ret
}

/// Two overlapping grids of squares.
///
/// The subject is an `n` by `n` grid of disjoint squares and the clip is an
/// `n - 1` by `n - 1` grid, offset so that each clip square overlaps the
/// corners of four subject squares.
pub fn checkerboard(n: usize) -> (Polygon, Polygon) {
    (
        grid((0.0, 0.0), 30.0, 40.0, 0.0, n),
        grid((20.0, 20.0), 30.0, 40.0, 0.0, n.saturating_sub(1)),
    )
}

/// Like [`checkerboard`], but with no horizontal edges.
pub fn slanted_checkerboard(n: usize) -> (Polygon, Polygon) {
    (
        grid((0.0, 0.0), 30.0, 40.0, 1.0, n),
        grid((20.0, 20.0), 30.0, 40.0, 1.0, n.saturating_sub(1)),
    )
}

/// Long skinny parallelograms: the subject's lean right and the clip's lean
/// left, so that every subject contour crosses every clip contour.
///
/// This makes for about `n²` crossings in a single scanbeam.
pub fn slanties(n: usize) -> (Polygon, Polygon) {
    let h = 20.0 * n as f64;
    let mut right = Polygon::new();
    let mut left = Polygon::new();
    for i in 0..n {
        let x = 20.0 * i as f64;
        right.push(Contour::new([
            (x, 0.0),
            (x + 10.0, 0.0),
            (x + h + 10.0, h),
            (x + h, h),
        ]));
        left.push(Contour::new([
            (x + h, 0.0),
            (x + h + 10.0, 0.0),
            (x + 10.0, h),
            (x, h),
        ]));
    }
    (right, left)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        let (s, c) = checkerboard(3);
        assert_eq!(s.contours.len(), 9);
        assert_eq!(c.contours.len(), 4);
        let (s, c) = slanties(5);
        assert_eq!((s.contours.len(), c.contours.len()), (5, 5));
        let (s, _) = slanted_checkerboard(1);
        assert_eq!(s.contours.len(), 1);
    }
}
