//! Output fragments: partially built contours and triangle strips.
//!
//! While the sweep runs, each active edge that lies on the boundary of the
//! result carries a handle to the fragment that is being traced along it.
//! Contour fragments grow at both ends and get glued together when two of
//! them meet; strip fragments keep separate left and right vertex chains that
//! are interleaved at the end.

use std::collections::VecDeque;

use crate::geom::{Contour, Mesh, Point, Polygon, Strip};

typed_vec!(pub(crate) FragVec, FragIdx, "f");

/// A partial contour.
///
/// When two fragments are merged, the vertices of one are moved into the
/// other and every fragment that used to point at the absorbed one gets
/// redirected. So `proxy` is always either the fragment itself or a fragment
/// whose `proxy` is itself.
#[derive(Clone, Debug)]
struct ContourFragment {
    active: bool,
    hole: bool,
    proxy: FragIdx,
    points: VecDeque<Point>,
}

/// All the contour fragments created during one clip.
#[derive(Debug, Default)]
pub(crate) struct Fragments {
    frags: FragVec<ContourFragment>,
}

impl Fragments {
    /// Starts a new fragment at a local minimum of the result.
    pub fn add_local_min(&mut self, x: f64, y: f64) -> FragIdx {
        let idx = FragIdx(self.frags.len());
        self.frags.push(ContourFragment {
            active: true,
            hole: false,
            proxy: idx,
            points: VecDeque::from([Point::new(x, y)]),
        })
    }

    fn proxy(&self, f: FragIdx) -> FragIdx {
        self.frags[f].proxy
    }

    pub fn add_left(&mut self, f: FragIdx, x: f64, y: f64) {
        let p = self.proxy(f);
        self.frags[p].points.push_front(Point::new(x, y));
    }

    pub fn add_right(&mut self, f: FragIdx, x: f64, y: f64) {
        let p = self.proxy(f);
        self.frags[p].points.push_back(Point::new(x, y));
    }

    /// Joins `p` onto the left end of `q`. The joined fragment closes off a
    /// hole if `p` and `q` were already the same.
    pub fn merge_left(&mut self, p: FragIdx, q: FragIdx) {
        let (pp, qp) = (self.proxy(p), self.proxy(q));
        self.frags[qp].hole = true;
        if pp != qp {
            let mut points = std::mem::take(&mut self.frags[pp].points);
            points.append(&mut self.frags[qp].points);
            self.frags[qp].points = points;
            self.redirect(pp, qp);
        }
    }

    /// Joins `p` onto the right end of `q`. The joined fragment closes off an
    /// outer contour if `p` and `q` were already the same.
    pub fn merge_right(&mut self, p: FragIdx, q: FragIdx) {
        let (pp, qp) = (self.proxy(p), self.proxy(q));
        self.frags[qp].hole = false;
        if pp != qp {
            let mut points = std::mem::take(&mut self.frags[pp].points);
            self.frags[qp].points.append(&mut points);
            self.redirect(pp, qp);
        }
    }

    fn redirect(&mut self, from: FragIdx, to: FragIdx) {
        for idx in self.frags.indices() {
            let frag = &mut self.frags[idx];
            if frag.proxy == from {
                frag.active = false;
                frag.proxy = to;
            }
        }
    }

    /// Collects the finished contours: the outer contours first, then the
    /// holes, each group newest first.
    ///
    /// Fragments with fewer than three vertices are dropped.
    pub fn into_polygon(self) -> Polygon {
        let mut outer = Vec::new();
        let mut holes = Vec::new();
        for (idx, frag) in self.frags.iter().rev() {
            if !frag.active {
                continue;
            }
            let proxy = &self.frags[frag.proxy];
            if proxy.points.len() <= 2 {
                tracing::trace!(?idx, len = proxy.points.len(), "dropping degenerate contour");
                continue;
            }
            let contour = Contour {
                points: proxy.points.iter().copied().collect(),
                is_hole: proxy.hole,
            };
            if contour.is_hole {
                holes.push(contour);
            } else {
                outer.push(contour);
            }
        }
        outer.into_iter().chain(holes).collect()
    }
}

#[derive(Clone, Debug, Default)]
struct StripFragment {
    left: Vec<Point>,
    right: Vec<Point>,
}

impl StripFragment {
    fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }
}

/// All the triangle-strip fragments created during one clip.
#[derive(Debug, Default)]
pub(crate) struct Strips {
    strips: FragVec<StripFragment>,
}

/// Which chain of a strip a vertex goes on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Chain {
    Left,
    Right,
}

impl Strips {
    /// Starts a new strip whose first vertex is on its left chain.
    pub fn new_strip(&mut self, x: f64, y: f64) -> FragIdx {
        self.strips.push(StripFragment {
            left: vec![Point::new(x, y)],
            right: Vec::new(),
        })
    }

    pub fn push(&mut self, s: FragIdx, chain: Chain, x: f64, y: f64) {
        let strip = &mut self.strips[s];
        match chain {
            Chain::Left => strip.left.push(Point::new(x, y)),
            Chain::Right => strip.right.push(Point::new(x, y)),
        }
    }

    /// Collects the finished strips in creation order, interleaving each one's
    /// left and right chains. Strips with fewer than three vertices are
    /// dropped.
    pub fn into_mesh(self) -> Mesh {
        let mut strips = Vec::new();
        for (idx, strip) in self.strips.iter() {
            if strip.len() <= 2 {
                tracing::trace!(?idx, len = strip.len(), "dropping degenerate strip");
                continue;
            }
            let mut points = Vec::with_capacity(strip.len());
            let mut left = strip.left.iter();
            let mut right = strip.right.iter();
            loop {
                let l = left.next();
                let r = right.next();
                if l.is_none() && r.is_none() {
                    break;
                }
                points.extend(l.into_iter().chain(r).copied());
            }
            strips.push(Strip { points });
        }
        Mesh { strips }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(c: &Contour) -> Vec<(f64, f64)> {
        c.points.iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn single_fragment_closes_as_outer() {
        let mut frags = Fragments::default();
        let f = frags.add_local_min(0.5, 0.0);
        frags.add_right(f, 1.0, 0.0);
        frags.add_left(f, 0.5, 1.0);
        frags.add_left(f, 1.0, 1.0);
        frags.merge_right(f, f);

        let poly = frags.into_polygon();
        assert_eq!(poly.contours.len(), 1);
        assert!(!poly.contours[0].is_hole);
        assert_eq!(
            pts(&poly.contours[0]),
            vec![(1.0, 1.0), (0.5, 1.0), (0.5, 0.0), (1.0, 0.0)]
        );
        assert!(poly.contours[0].signed_area() > 0.0);
    }

    #[test]
    fn merging_redirects() {
        let mut frags = Fragments::default();
        let a = frags.add_local_min(0.0, 0.0);
        let b = frags.add_local_min(2.0, 0.0);
        frags.add_right(a, 1.0, 1.0);
        frags.add_left(b, 1.0, 1.0);
        // `a` now lives inside `b`, and appending through `a` goes to the
        // merged list.
        frags.merge_left(a, b);
        frags.add_left(a, -1.0, 2.0);

        let poly = frags.into_polygon();
        assert_eq!(poly.contours.len(), 1);
        assert!(poly.contours[0].is_hole);
        assert_eq!(
            pts(&poly.contours[0]),
            vec![(-1.0, 2.0), (0.0, 0.0), (1.0, 1.0), (1.0, 1.0), (2.0, 0.0)]
        );
    }

    #[test]
    fn degenerate_fragments_are_dropped() {
        let mut frags = Fragments::default();
        let f = frags.add_local_min(0.0, 0.0);
        frags.add_right(f, 1.0, 0.0);
        assert!(frags.into_polygon().is_empty());
    }

    #[test]
    fn holes_come_last() {
        let mut frags = Fragments::default();
        let hole = frags.add_local_min(1.0, 1.0);
        frags.add_left(hole, 0.5, 1.5);
        frags.add_right(hole, 1.5, 1.5);
        frags.merge_left(hole, hole);
        let outer = frags.add_local_min(0.0, 0.0);
        frags.add_left(outer, -1.0, 1.0);
        frags.add_right(outer, 1.0, 0.5);

        let poly = frags.into_polygon();
        let holes: Vec<bool> = poly.contours.iter().map(|c| c.is_hole).collect();
        assert_eq!(holes, vec![false, true]);
    }

    #[test]
    fn strips_interleave() {
        let mut strips = Strips::default();
        let s = strips.new_strip(0.0, 0.0);
        strips.push(s, Chain::Right, 1.0, 0.0);
        strips.push(s, Chain::Left, 0.0, 1.0);
        strips.push(s, Chain::Right, 1.0, 1.0);
        strips.push(s, Chain::Left, 0.0, 2.0);
        let short = strips.new_strip(5.0, 5.0);
        strips.push(short, Chain::Right, 6.0, 5.0);

        let mesh = strips.into_mesh();
        assert_eq!(mesh.strips.len(), 1);
        let points: Vec<(f64, f64)> = mesh.strips[0].points.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(
            points,
            vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.0, 2.0)]
        );
    }
}
