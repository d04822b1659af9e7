//! Finding the crossings between active edges inside a scanbeam.
//!
//! Edges are taken in their order at the bottom of the beam and inserted
//! into a table sorted by their x at the top of the beam. Every edge that an
//! insertion has to jump over crosses the new edge somewhere inside the beam.

use crate::{
    edges::{BundleState, Edge, EdgeIdx, EdgeVec},
    num::{nearly_eq, CheapOrderedFloat},
};

use super::aet::ActiveEdges;

/// A crossing between two active edges. `e0` is left of `e1` at the bottom
/// of the beam.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Intersection {
    pub e0: EdgeIdx,
    pub e1: EdgeIdx,
    pub x: f64,
    /// Height above the bottom of the beam.
    pub dy: f64,
}

/// An entry of the sorted edge table.
#[derive(Clone, Copy, Debug)]
struct Sorted {
    edge: EdgeIdx,
    xb: f64,
    xt: f64,
    dx: f64,
}

/// Finds all crossings between edges that take part in the beam `dy` high,
/// sorted by increasing height. Crossings at the same height keep the order
/// in which they were found.
///
/// Only bundle heads and unbundled edges that lie on an operand's boundary
/// take part; tails move with their heads.
pub(crate) fn find(
    aet: &ActiveEdges,
    edges: &EdgeVec<Edge>,
    dy: f64,
    eps: f64,
) -> Vec<Intersection> {
    let mut sorted: Vec<Sorted> = Vec::new();
    let mut found: Vec<Intersection> = Vec::new();

    for idx in aet.iter(edges) {
        let e = &edges[idx];
        if e.above.state != BundleState::Head && !e.above.bundle.any() {
            continue;
        }
        let new = Sorted {
            edge: idx,
            xb: e.xb,
            xt: e.xt,
            dx: e.dx,
        };

        // `sorted` is ordered by increasing `xt`. Walk in from the right,
        // recording a crossing with every entry that ends up right of the
        // new edge.
        let mut pos = sorted.len();
        while pos > 0 {
            let st = &sorted[pos - 1];
            let den = (st.xt - st.xb) - (new.xt - new.xb);
            if new.xt >= st.xt || new.dx == st.dx || nearly_eq(den, 0.0, eps) {
                break;
            }
            let r = (new.xb - st.xb) / den;
            let crossing = Intersection {
                e0: st.edge,
                e1: new.edge,
                x: st.xb + r * (st.xt - st.xb),
                dy: r * dy,
            };
            tracing::trace!(e0 = ?crossing.e0, e1 = ?crossing.e1, x = crossing.x, dy = crossing.dy, "crossing");
            let key = CheapOrderedFloat::from(crossing.dy);
            let at = found.partition_point(|it| CheapOrderedFloat::from(it.dy) <= key);
            found.insert(at, crossing);
            pos -= 1;
        }
        sorted.insert(pos, new);
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        edges::{EdgeTable, Role},
        geom::Polygon,
        BinaryOp,
    };

    /// Puts every bound starting at the lowest minimum into the table, with
    /// the beam running from y = 0 to y = `yt`.
    fn active(poly: &Polygon, yt: f64) -> (ActiveEdges, EdgeVec<Edge>) {
        let mut table = EdgeTable::default();
        table.add_polygon(poly, &[], Role::Subject, BinaryOp::Union);
        let mut edges = table.edges;
        let mut aet = ActiveEdges::default();
        for &b in &table.minima[0].bounds {
            aet.insert(&mut edges, b);
        }
        let idxs: Vec<EdgeIdx> = aet.iter(&edges).collect();
        for idx in idxs {
            let e = &mut edges[idx];
            e.above.bundle.subject = true;
            e.xt = e.x_at(yt);
        }
        (aet, edges)
    }

    #[test]
    fn bow_tie() {
        // A self-intersecting quadrilateral whose two sides cross at (1, 1).
        let poly = Polygon::from(vec![vec![(0.0, 0.0), (2.0, 0.0), (0.0, 2.0), (2.0, 2.0)]]);
        let (aet, edges) = active(&poly, 2.0);
        let found = find(&aet, &edges, 2.0, f64::EPSILON);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].x, 1.0);
        assert_eq!(found[0].dy, 1.0);
        assert_eq!(edges[found[0].e0].bot, crate::Point::new(0.0, 0.0));
        assert_eq!(edges[found[0].e1].bot, crate::Point::new(2.0, 0.0));
    }

    #[test]
    fn parallel_edges_never_cross() {
        let poly = Polygon::from(vec![vec![(0.0, 0.0), (1.0, 0.0), (2.0, 2.0), (1.0, 2.0)]]);
        let (aet, edges) = active(&poly, 2.0);
        assert!(find(&aet, &edges, 2.0, f64::EPSILON).is_empty());
    }

    #[test]
    fn sorted_by_height() {
        // Two bow ties side by side, one crossing lower than the other.
        let poly = Polygon::from(vec![
            vec![(0.0, 0.0), (2.0, 0.0), (0.0, 4.0), (2.0, 4.0)],
            vec![(10.0, 0.0), (12.0, 0.0), (10.0, 2.0), (12.0, 2.0)],
        ]);
        // Only the lower beam, from 0 to 2: the first bow tie crosses at
        // height 2 and is outside it.
        let (aet, edges) = active(&poly, 2.0);
        let found = find(&aet, &edges, 2.0, f64::EPSILON);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].x, 11.0);

        let dys: Vec<f64> = {
            let (aet, mut edges) = active(&poly, 2.0);
            // Squash the top of the first bow tie so that it crosses at
            // height 1.5, above the second one.
            let first: Vec<EdgeIdx> = aet.iter(&edges).take(2).collect();
            edges[first[0]].xt = 4.0 / 3.0;
            edges[first[1]].xt = 2.0 / 3.0;
            find(&aet, &edges, 2.0, f64::EPSILON)
                .iter()
                .map(|it| it.dy)
                .collect()
        };
        assert_eq!(dys.len(), 2);
        assert_eq!(dys[0], 1.0);
        approx::assert_abs_diff_eq!(dys[1], 1.5, epsilon = 1e-12);
    }
}
