//! Bound construction: the edge arena, the local minimum table and the
//! scanbeam table.
//!
//! Every contour is decomposed into *bounds*: maximal chains of edges along
//! which `y` strictly increases. A bound starts at a local minimum of the
//! contour and ends at a local maximum. Bounds are stored as runs of
//! consecutive edges in a single arena, linked through `succ`/`pred`, and
//! each local minimum table entry lists the first edges of the bounds that
//! start at that height.

use crate::{
    geom::{Contour, Point, Polygon},
    num::CheapOrderedFloat,
    output::FragIdx,
    BinaryOp,
};

typed_vec!(pub(crate) EdgeVec, EdgeIdx, "e");

/// Which of the two operands an edge came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Role {
    Clip,
    Subject,
}

impl Role {
    pub fn other(self) -> Role {
        match self {
            Role::Clip => Role::Subject,
            Role::Subject => Role::Clip,
        }
    }
}

/// A pair of values, one per operand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ByRole<T> {
    pub clip: T,
    pub subject: T,
}

impl<T> ByRole<T> {
    pub fn new(clip: T, subject: T) -> Self {
        ByRole { clip, subject }
    }
}

impl ByRole<bool> {
    pub fn any(&self) -> bool {
        self.clip || self.subject
    }
}

impl<T> std::ops::Index<Role> for ByRole<T> {
    type Output = T;

    fn index(&self, role: Role) -> &T {
        match role {
            Role::Clip => &self.clip,
            Role::Subject => &self.subject,
        }
    }
}

impl<T> std::ops::IndexMut<Role> for ByRole<T> {
    fn index_mut(&mut self, role: Role) -> &mut T {
        match role {
            Role::Clip => &mut self.clip,
            Role::Subject => &mut self.subject,
        }
    }
}

/// Where an edge sits relative to the coincident edges around it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum BundleState {
    #[default]
    Unbundled,
    /// The rightmost edge of a group of coincident edges. It carries the
    /// group's combined contribution.
    Head,
    /// Any other edge of a coincident group. Tails come before their head in
    /// the active edge table.
    Tail,
}

/// The part of an edge's state that describes one side of the current
/// scanbeam boundary: either the beam above it or the beam below it.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SideState {
    /// Does this edge (or the bundle it heads) contribute a clip/subject
    /// boundary on this side?
    pub bundle: ByRole<bool>,
    pub state: BundleState,
    /// The output fragment being traced along this edge.
    pub out: Option<FragIdx>,
}

/// One edge of a bound, plus all of its sweep state.
#[derive(Clone, Debug)]
pub(crate) struct Edge {
    pub bot: Point,
    pub top: Point,
    /// The x-coordinate at the bottom of the current scanbeam.
    pub xb: f64,
    /// The x-coordinate at the top of the current scanbeam.
    pub xt: f64,
    /// Change in x per unit increase in y.
    pub dx: f64,
    pub role: Role,
    /// Is the inside of each operand to the right of this edge? Set from the
    /// running parity when the edge is classified, and flipped as the edge
    /// crosses edges of that operand.
    pub bside: ByRole<bool>,
    pub above: SideState,
    pub below: SideState,
    /// Neighbours in the active edge table.
    pub prev: Option<EdgeIdx>,
    pub next: Option<EdgeIdx>,
    /// Neighbours within the bound.
    pub pred: Option<EdgeIdx>,
    pub succ: Option<EdgeIdx>,
}

impl Edge {
    fn new(bot: Point, top: Point, role: Role, bside: ByRole<bool>) -> Self {
        Edge {
            bot,
            top,
            xb: bot.x,
            xt: bot.x,
            dx: (top.x - bot.x) / (top.y - bot.y),
            role,
            bside,
            above: SideState::default(),
            below: SideState::default(),
            prev: None,
            next: None,
            pred: None,
            succ: None,
        }
    }

    /// The x-coordinate of this edge's supporting line at height `y`.
    pub fn x_at(&self, y: f64) -> f64 {
        self.bot.x + self.dx * (y - self.bot.y)
    }
}

/// All bounds whose lowest point is at a given height.
#[derive(Clone, Debug)]
pub(crate) struct LocalMinimum {
    pub y: f64,
    /// First edges of the bounds, ordered by bottom x and then by slope.
    pub bounds: Vec<EdgeIdx>,
}

/// The tables that drive a sweep.
#[derive(Debug, Default)]
pub(crate) struct EdgeTable {
    pub edges: EdgeVec<Edge>,
    /// Sorted by increasing `y`.
    pub minima: Vec<LocalMinimum>,
    scanbeam: Vec<CheapOrderedFloat>,
}

impl EdgeTable {
    /// Builds bounds for all the contours of `poly` that are switched on in
    /// `enabled` (a missing entry counts as switched on).
    pub fn add_polygon(&mut self, poly: &Polygon, enabled: &[bool], role: Role, op: BinaryOp) {
        // Difference is computed as the intersection of the subject with the
        // complement of the clip, so the clip's inside starts on the right.
        let bside = ByRole::new(op == BinaryOp::Difference, false);
        for (idx, contour) in poly.contours.iter().enumerate() {
            if enabled.get(idx).copied().unwrap_or(true) {
                self.add_contour(contour, role, bside);
            }
        }
    }

    fn add_contour(&mut self, contour: &Contour, role: Role, bside: ByRole<bool>) {
        let verts = optimal_vertices(contour);
        let n = verts.len();
        if n == 0 {
            return;
        }
        for v in &verts {
            self.scanbeam.push(v.y.into());
        }

        let next = |i: usize| (i + 1) % n;
        let prev = |i: usize| (i + n - 1) % n;

        // Bounds that follow the contour's own direction.
        for min in 0..n {
            let y = verts[min].y;
            if verts[prev(min)].y >= y && verts[next(min)].y > y {
                let mut chain = vec![min];
                let mut max = next(min);
                while verts[next(max)].y > verts[max].y {
                    chain.push(max);
                    max = next(max);
                }
                self.add_bound(&verts, &chain, next, role, bside);
            }
        }

        // Bounds that run against the contour's direction.
        for min in 0..n {
            let y = verts[min].y;
            if verts[prev(min)].y > y && verts[next(min)].y >= y {
                let mut chain = vec![min];
                let mut max = prev(min);
                while verts[prev(max)].y > verts[max].y {
                    chain.push(max);
                    max = prev(max);
                }
                self.add_bound(&verts, &chain, prev, role, bside);
            }
        }
    }

    /// Adds one bound. `chain` lists the vertex index at the bottom of each
    /// edge, and `step` moves to the vertex at its top.
    fn add_bound(
        &mut self,
        verts: &[Point],
        chain: &[usize],
        step: impl Fn(usize) -> usize,
        role: Role,
        bside: ByRole<bool>,
    ) {
        let mut first = None;
        let mut last: Option<EdgeIdx> = None;
        for &v in chain {
            let idx = self
                .edges
                .push(Edge::new(verts[v], verts[step(v)], role, bside));
            if let Some(last) = last {
                self.edges[last].succ = Some(idx);
                self.edges[idx].pred = Some(last);
            }
            first.get_or_insert(idx);
            last = Some(idx);
        }
        if let Some(first) = first {
            self.insert_bound(first);
        }
    }

    fn insert_bound(&mut self, first: EdgeIdx) {
        let y = self.edges[first].bot.y;
        let pos = self
            .minima
            .partition_point(|lm| CheapOrderedFloat::from(lm.y) < CheapOrderedFloat::from(y));
        if self.minima.get(pos).map_or(true, |lm| lm.y != y) {
            self.minima.insert(
                pos,
                LocalMinimum {
                    y,
                    bounds: Vec::new(),
                },
            );
        }
        let edges = &self.edges;
        let e = &edges[first];
        let bounds = &mut self.minima[pos].bounds;
        let at = bounds
            .iter()
            .position(|&b| {
                let other = &edges[b];
                e.bot.x < other.bot.x || (e.bot.x == other.bot.x && e.dx < other.dx)
            })
            .unwrap_or(bounds.len());
        bounds.insert(at, first);
    }

    /// The distinct vertex heights, in increasing order.
    pub fn scanbeams(&self) -> Vec<f64> {
        let mut ys = self.scanbeam.clone();
        ys.sort();
        ys.dedup();
        ys.into_iter().map(CheapOrderedFloat::into_inner).collect()
    }
}

/// The vertices of `contour` that aren't in the interior of a horizontal
/// run. Removing them doesn't change the shape, and it means that no bound
/// has a horizontal edge in its middle.
fn optimal_vertices(contour: &Contour) -> Vec<Point> {
    let pts = &contour.points;
    let n = pts.len();
    (0..n)
        .filter(|&i| {
            let y = pts[i].y;
            pts[(i + n - 1) % n].y != y || pts[(i + 1) % n].y != y
        })
        .map(|i| pts[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(poly: &Polygon, role: Role, op: BinaryOp) -> EdgeTable {
        let mut t = EdgeTable::default();
        t.add_polygon(poly, &[], role, op);
        t
    }

    fn bound(t: &EdgeTable, first: EdgeIdx) -> Vec<(Point, Point)> {
        let mut ret = Vec::new();
        let mut e = Some(first);
        while let Some(idx) = e {
            ret.push((t.edges[idx].bot, t.edges[idx].top));
            e = t.edges[idx].succ;
        }
        ret
    }

    #[test]
    fn square() {
        let poly = Polygon::from(vec![vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]]);
        let t = table(&poly, Role::Subject, BinaryOp::Union);
        assert_eq!(t.scanbeams(), vec![0.0, 1.0]);
        assert_eq!(t.minima.len(), 1);
        assert_eq!(t.minima[0].y, 0.0);

        let bounds: Vec<_> = t.minima[0].bounds.iter().map(|&b| bound(&t, b)).collect();
        assert_eq!(
            bounds,
            vec![
                vec![(Point::new(0.0, 0.0), Point::new(0.0, 1.0))],
                vec![(Point::new(1.0, 0.0), Point::new(1.0, 1.0))],
            ]
        );
    }

    #[test]
    fn horizontal_runs_are_collapsed() {
        // The bottom edge has an extra vertex in its middle, and the right
        // side has a kink.
        let poly = Polygon::from(vec![vec![
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 1.0),
            (2.0, 2.0),
            (0.0, 2.0),
        ]]);
        let t = table(&poly, Role::Clip, BinaryOp::Union);
        assert_eq!(t.scanbeams(), vec![0.0, 1.0, 2.0]);
        assert_eq!(t.minima.len(), 1);

        let bounds: Vec<_> = t.minima[0].bounds.iter().map(|&b| bound(&t, b)).collect();
        assert_eq!(bounds.len(), 2);
        assert_eq!(
            bounds[0],
            vec![(Point::new(0.0, 0.0), Point::new(0.0, 2.0))]
        );
        assert_eq!(
            bounds[1],
            vec![
                (Point::new(2.0, 0.0), Point::new(3.0, 1.0)),
                (Point::new(3.0, 1.0), Point::new(2.0, 2.0)),
            ]
        );
        assert_eq!(t.edges.len(), 3);
    }

    #[test]
    fn multiple_minima() {
        // A "W" shape with two local minima at different heights.
        let poly = Polygon::from(vec![vec![
            (0.0, 4.0),
            (1.0, 0.0),
            (2.0, 3.0),
            (3.0, 1.0),
            (4.0, 4.0),
        ]]);
        let t = table(&poly, Role::Subject, BinaryOp::Intersection);
        let ys: Vec<f64> = t.minima.iter().map(|lm| lm.y).collect();
        assert_eq!(ys, vec![0.0, 1.0]);
        assert!(t.minima.iter().all(|lm| lm.bounds.len() == 2));
        assert_eq!(t.scanbeams(), vec![0.0, 1.0, 3.0, 4.0]);
    }

    #[test]
    fn bounds_sorted_by_slope() {
        // Two triangles sharing their bottom vertex.
        let poly = Polygon::from(vec![
            vec![(0.0, 0.0), (2.0, 1.0), (1.0, 1.0)],
            vec![(0.0, 0.0), (-1.0, 1.0), (-2.0, 1.0)],
        ]);
        let t = table(&poly, Role::Subject, BinaryOp::Union);
        assert_eq!(t.minima.len(), 1);
        let slopes: Vec<f64> = t.minima[0]
            .bounds
            .iter()
            .map(|&b| t.edges[b].dx)
            .collect();
        assert_eq!(slopes, vec![-2.0, -1.0, 1.0, 2.0]);
    }

    #[test]
    fn difference_flips_clip_side() {
        let poly = Polygon::from(vec![vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]]);
        let t = table(&poly, Role::Clip, BinaryOp::Difference);
        assert!(t.edges.iter().all(|(_, e)| e.bside.clip && !e.bside.subject));
        let t = table(&poly, Role::Clip, BinaryOp::Xor);
        assert!(t.edges.iter().all(|(_, e)| !e.bside.clip));
    }

    #[test]
    fn disabled_and_flat_contours() {
        let poly = Polygon::from(vec![
            vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
            vec![(0.0, 5.0), (1.0, 5.0), (2.0, 5.0)],
        ]);
        let mut t = EdgeTable::default();
        t.add_polygon(&poly, &[false, true], Role::Subject, BinaryOp::Union);
        assert!(t.minima.is_empty());
        assert!(t.edges.is_empty());
        assert!(t.scanbeams().is_empty());
    }
}
