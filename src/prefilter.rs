//! Bounding-box pre-filtering of contours.
//!
//! For intersection and difference, a contour whose bounding box doesn't
//! touch any contour of the other operand can't affect the result (for
//! intersection) or can't cut anything out of it (a clip contour, for
//! difference). Leaving those contours out of the edge table saves the
//! sweep from tracking their edges.

use kurbo::Rect;

use crate::{geom::Polygon, BinaryOp};

/// Do the two boxes overlap? Boxes that only touch along an edge or at a
/// corner count as overlapping.
fn overlaps(a: &Rect, b: &Rect) -> bool {
    !(a.max_x() < b.min_x() || a.min_x() > b.max_x())
        && !(a.max_y() < b.min_y() || a.min_y() > b.max_y())
}

/// Which contours of the subject and the clip take part in the sweep.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Enabled {
    pub subject: Vec<bool>,
    pub clip: Vec<bool>,
}

impl Enabled {
    fn all(subject: &Polygon, clip: &Polygon) -> Self {
        Enabled {
            subject: vec![true; subject.contours.len()],
            clip: vec![true; clip.contours.len()],
        }
    }

    fn disabled_count(&self) -> usize {
        self.subject
            .iter()
            .chain(&self.clip)
            .filter(|on| !**on)
            .count()
    }
}

/// Works out which contours can be skipped.
///
/// Nothing is skipped for union or xor, or if either operand is empty. Empty
/// contours have no bounding box, so they never overlap anything.
pub(crate) fn enabled_contours(op: BinaryOp, subject: &Polygon, clip: &Polygon) -> Enabled {
    let mut ret = Enabled::all(subject, clip);
    let filtered = match op {
        BinaryOp::Intersection | BinaryOp::Difference => true,
        BinaryOp::Union | BinaryOp::Xor => false,
    };
    if !filtered || subject.is_empty() || clip.is_empty() {
        return ret;
    }

    let s_boxes: Vec<Option<Rect>> = subject.contours().map(|c| c.bounding_box()).collect();
    let c_boxes: Vec<Option<Rect>> = clip.contours().map(|c| c.bounding_box()).collect();

    // overlap[c][s]
    let overlap: Vec<Vec<bool>> = c_boxes
        .iter()
        .map(|c| {
            s_boxes
                .iter()
                .map(|s| match (c, s) {
                    (Some(c), Some(s)) => overlaps(s, c),
                    _ => false,
                })
                .collect()
        })
        .collect();

    for (c, row) in overlap.iter().enumerate() {
        ret.clip[c] = row.iter().any(|o| *o);
    }

    if op == BinaryOp::Intersection {
        for s in 0..s_boxes.len() {
            ret.subject[s] = overlap.iter().any(|row| row[s]);
        }
    }

    let disabled = ret.disabled_count();
    if disabled > 0 {
        tracing::debug!(disabled, ?op, "bounding-box filter skipped contours");
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<(f64, f64)> {
        vec![
            (x0, y0),
            (x0 + size, y0),
            (x0 + size, y0 + size),
            (x0, y0 + size),
        ]
    }

    #[test]
    fn touching_counts() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        assert!(overlaps(&a, &Rect::new(1.0, 0.0, 2.0, 1.0)));
        assert!(overlaps(&a, &Rect::new(1.0, 1.0, 2.0, 2.0)));
        assert!(!overlaps(&a, &Rect::new(1.5, 0.0, 2.0, 1.0)));
        assert!(!overlaps(&a, &Rect::new(0.0, -3.0, 1.0, -0.5)));
    }

    #[test]
    fn intersection_filters_both_sides() {
        let subject = Polygon::from(vec![square(0.0, 0.0, 1.0), square(10.0, 10.0, 1.0)]);
        let clip = Polygon::from(vec![square(0.5, 0.5, 1.0), square(-10.0, 0.0, 1.0)]);
        let enabled = enabled_contours(BinaryOp::Intersection, &subject, &clip);
        assert_eq!(enabled.subject, vec![true, false]);
        assert_eq!(enabled.clip, vec![true, false]);
    }

    #[test]
    fn difference_keeps_subject() {
        let subject = Polygon::from(vec![square(0.0, 0.0, 1.0), square(10.0, 10.0, 1.0)]);
        let clip = Polygon::from(vec![square(0.5, 0.5, 1.0), square(-10.0, 0.0, 1.0)]);
        let enabled = enabled_contours(BinaryOp::Difference, &subject, &clip);
        assert_eq!(enabled.subject, vec![true, true]);
        assert_eq!(enabled.clip, vec![true, false]);
    }

    #[test]
    fn union_and_xor_keep_everything() {
        let subject = Polygon::from(vec![square(0.0, 0.0, 1.0)]);
        let clip = Polygon::from(vec![square(5.0, 5.0, 1.0)]);
        for op in [BinaryOp::Union, BinaryOp::Xor] {
            let enabled = enabled_contours(op, &subject, &clip);
            assert_eq!(enabled.subject, vec![true]);
            assert_eq!(enabled.clip, vec![true]);
        }
    }

    #[test]
    fn empty_operand() {
        let subject = Polygon::from(vec![square(0.0, 0.0, 1.0)]);
        let enabled = enabled_contours(BinaryOp::Difference, &subject, &Polygon::new());
        assert_eq!(enabled.subject, vec![true]);
        assert!(enabled.clip.is_empty());
    }
}
