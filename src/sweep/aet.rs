//! The active edge table: the edges that cross the current scanbeam, in
//! left-to-right order.
//!
//! The table is a doubly-linked list threaded through the `prev` and `next`
//! fields of the edges themselves, with only the head stored here.

use crate::edges::{BundleState, EdgeIdx, EdgeVec, Edge};

#[derive(Clone, Debug, Default)]
pub(crate) struct ActiveEdges {
    head: Option<EdgeIdx>,
}

impl ActiveEdges {
    pub fn head(&self) -> Option<EdgeIdx> {
        self.head
    }

    /// Walks the table from left to right.
    pub fn iter<'a>(&self, edges: &'a EdgeVec<Edge>) -> impl Iterator<Item = EdgeIdx> + 'a {
        std::iter::successors(self.head, move |&e| edges[e].next)
    }

    pub fn len(&self, edges: &EdgeVec<Edge>) -> usize {
        self.iter(edges).count()
    }

    /// Inserts a newly started edge, ordered by its bottom x and then by its
    /// slope. Among equal keys, the new edge goes last.
    pub fn insert(&mut self, edges: &mut EdgeVec<Edge>, idx: EdgeIdx) {
        let (xb, dx) = (edges[idx].xb, edges[idx].dx);
        let mut prev = None;
        let mut cur = self.head;
        while let Some(c) = cur {
            let other = &edges[c];
            if xb < other.xb || (xb == other.xb && dx < other.dx) {
                break;
            }
            prev = Some(c);
            cur = other.next;
        }

        edges[idx].prev = prev;
        edges[idx].next = cur;
        match prev {
            Some(p) => edges[p].next = Some(idx),
            None => self.head = Some(idx),
        }
        if let Some(c) = cur {
            edges[c].prev = Some(idx);
        }
    }

    /// Unlinks an edge. The edge keeps its own `next`, so a walk that is
    /// currently at this edge can carry on.
    pub fn remove(&mut self, edges: &mut EdgeVec<Edge>, idx: EdgeIdx) {
        let (prev, next) = (edges[idx].prev, edges[idx].next);
        match prev {
            Some(p) => edges[p].next = next,
            None => self.head = next,
        }
        if let Some(n) = next {
            edges[n].prev = prev;
        }
    }

    /// Puts `new` in the slot currently held by `old`.
    pub fn replace(&mut self, edges: &mut EdgeVec<Edge>, old: EdgeIdx, new: EdgeIdx) {
        let (prev, next) = (edges[old].prev, edges[old].next);
        match prev {
            Some(p) => edges[p].next = Some(new),
            None => self.head = Some(new),
        }
        if let Some(n) = next {
            edges[n].prev = Some(new);
        }
        edges[new].prev = prev;
        edges[new].next = next;
    }

    /// Is `e1` the first edge after `e0`, not counting the tails of `e1`'s
    /// bundle?
    pub fn adjacent(&self, edges: &EdgeVec<Edge>, e0: EdgeIdx, e1: EdgeIdx) -> bool {
        let mut cur = edges[e0].next;
        while let Some(c) = cur {
            if c == e1 {
                return true;
            }
            if edges[c].above.state != BundleState::Tail {
                return false;
            }
            cur = edges[c].next;
        }
        false
    }

    /// Moves `e0`, along with the tails of its bundle (which sit immediately
    /// before it), to just after `e1`. The two must be [adjacent].
    ///
    /// [adjacent]: ActiveEdges::adjacent
    pub fn swap_bundles(&mut self, edges: &mut EdgeVec<Edge>, e0: EdgeIdx, e1: EdgeIdx) {
        debug_assert!(self.adjacent(edges, e0, e1), "swapping {e0:?} and {e1:?}");
        // The last edge before e0's bundle.
        let mut before = edges[e0].prev;
        if edges[e0].above.state == BundleState::Head {
            while let Some(p) = before {
                if edges[p].above.state != BundleState::Tail {
                    break;
                }
                before = edges[p].prev;
            }
        }

        let group_start = match before {
            Some(p) => edges[p].next,
            None => self.head,
        };
        let after_e0 = edges[e0].next;
        let after_e1 = edges[e1].next;

        match before {
            Some(p) => edges[p].next = after_e0,
            None => self.head = after_e0,
        }
        if let Some(a) = after_e0 {
            edges[a].prev = before;
        }

        edges[e1].next = group_start;
        if let Some(g) = group_start {
            edges[g].prev = Some(e1);
        }

        edges[e0].next = after_e1;
        if let Some(a) = after_e1 {
            edges[a].prev = Some(e0);
        }
    }

    /// Checks that the links are consistent and the edges are sorted by
    /// their x-coordinates at the bottom of the beam.
    #[cfg(any(test, feature = "slow-asserts"))]
    pub fn check_invariants(&self, edges: &EdgeVec<Edge>) {
        let mut prev: Option<EdgeIdx> = None;
        // A walk longer than the number of edges means the links loop.
        for (i, e) in self.iter(edges).enumerate() {
            assert!(i < edges.len(), "the active edges form a cycle");
            assert_eq!(edges[e].prev, prev, "broken back-link at {e:?}");
            if let Some(p) = prev {
                assert!(
                    edges[p].xb <= edges[e].xb + 1e-9 * (1.0 + edges[e].xb.abs()),
                    "{p:?} (x = {}) is left of {e:?} (x = {})",
                    edges[p].xb,
                    edges[e].xb
                );
            }
            prev = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        edges::{EdgeTable, Role},
        geom::Polygon,
        BinaryOp,
    };

    /// Four vertical edges from two side-by-side rectangles.
    fn setup() -> (EdgeVec<Edge>, Vec<EdgeIdx>) {
        let poly = Polygon::from(vec![
            vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
            vec![(2.0, 0.0), (3.0, 0.0), (3.0, 1.0), (2.0, 1.0)],
        ]);
        let mut table = EdgeTable::default();
        table.add_polygon(&poly, &[], Role::Subject, BinaryOp::Union);
        let bounds = table.minima[0].bounds.clone();
        (table.edges, bounds)
    }

    fn xs(aet: &ActiveEdges, edges: &EdgeVec<Edge>) -> Vec<f64> {
        aet.iter(edges).map(|e| edges[e].xb).collect()
    }

    #[test]
    fn insert_sorted() {
        let (mut edges, bounds) = setup();
        let mut aet = ActiveEdges::default();
        for &b in bounds.iter().rev() {
            aet.insert(&mut edges, b);
        }
        assert_eq!(xs(&aet, &edges), vec![0.0, 1.0, 2.0, 3.0]);
        aet.check_invariants(&edges);
        assert_eq!(aet.len(&edges), 4);
    }

    #[test]
    fn remove_and_replace() {
        let (mut edges, bounds) = setup();
        let mut aet = ActiveEdges::default();
        for &b in &bounds {
            aet.insert(&mut edges, b);
        }
        aet.remove(&mut edges, bounds[0]);
        assert_eq!(xs(&aet, &edges), vec![1.0, 2.0, 3.0]);
        aet.remove(&mut edges, bounds[2]);
        assert_eq!(xs(&aet, &edges), vec![1.0, 3.0]);
        aet.replace(&mut edges, bounds[1], bounds[0]);
        assert_eq!(xs(&aet, &edges), vec![0.0, 3.0]);
        aet.check_invariants(&edges);
    }

    #[test]
    fn swap_adjacent() {
        let (mut edges, bounds) = setup();
        let mut aet = ActiveEdges::default();
        for &b in &bounds {
            aet.insert(&mut edges, b);
        }
        aet.swap_bundles(&mut edges, bounds[1], bounds[2]);
        let order: Vec<EdgeIdx> = aet.iter(&edges).collect();
        assert_eq!(order, vec![bounds[0], bounds[2], bounds[1], bounds[3]]);

        aet.swap_bundles(&mut edges, bounds[0], bounds[2]);
        let order: Vec<EdgeIdx> = aet.iter(&edges).collect();
        assert_eq!(order, vec![bounds[2], bounds[0], bounds[1], bounds[3]]);
    }

    #[test]
    fn adjacency_skips_tails() {
        let (mut edges, bounds) = setup();
        let mut aet = ActiveEdges::default();
        for &b in &bounds {
            aet.insert(&mut edges, b);
        }
        assert!(aet.adjacent(&edges, bounds[0], bounds[1]));
        assert!(!aet.adjacent(&edges, bounds[0], bounds[2]));
        assert!(!aet.adjacent(&edges, bounds[1], bounds[0]));
        assert!(!aet.adjacent(&edges, bounds[3], bounds[0]));

        edges[bounds[1]].above.state = BundleState::Tail;
        edges[bounds[2]].above.state = BundleState::Head;
        assert!(aet.adjacent(&edges, bounds[0], bounds[2]));
    }

    #[test]
    fn swap_moves_tails_along() {
        let (mut edges, bounds) = setup();
        let mut aet = ActiveEdges::default();
        for &b in &bounds {
            aet.insert(&mut edges, b);
        }
        // Pretend the first two edges are a bundle headed by the second.
        edges[bounds[0]].above.state = BundleState::Tail;
        edges[bounds[1]].above.state = BundleState::Head;
        aet.swap_bundles(&mut edges, bounds[1], bounds[2]);
        let order: Vec<EdgeIdx> = aet.iter(&edges).collect();
        assert_eq!(order, vec![bounds[2], bounds[0], bounds[1], bounds[3]]);
        assert_eq!(edges[bounds[2]].prev, None);
        assert_eq!(edges[bounds[3]].prev, Some(bounds[1]));
    }
}
