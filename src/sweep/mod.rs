//! The scanbeam sweep.
//!
//! The plane is cut into horizontal beams at every vertex height. Within a
//! beam no edge starts or ends, so the active edges can only change order by
//! crossing one another. The sweep walks the beams from the bottom up,
//! classifying every point where the boundary of the result might turn, and
//! hands each classified vertex to an [`Actions`] implementation that builds
//! the output.

pub(crate) mod aet;
pub(crate) mod classify;
mod contours;
pub(crate) mod intersections;
mod strips;

pub(crate) use contours::ContourActions;
pub(crate) use strips::StripActions;

use crate::{
    edges::{BundleState, ByRole, Edge, EdgeIdx, EdgeTable, EdgeVec, LocalMinimum, Role},
    num::nearly_eq,
    BinaryOp, Error,
};

use aet::ActiveEdges;
use classify::{BoundaryEdge, Crossing, HorizState, VertexType};
use intersections::Intersection;

/// What to do with the output fragments at each classified vertex.
///
/// There are two implementations: one that traces contours and one that
/// emits triangle strips.
pub(crate) trait Actions {
    type Output;

    /// Called at the start of each beam boundary, before any vertex on it.
    fn begin_beam(&mut self);

    /// A contributing vertex where `edge` meets the beam boundary at height
    /// `yb`.
    fn boundary(
        &mut self,
        edges: &mut EdgeVec<Edge>,
        edge: EdgeIdx,
        vertex: VertexType,
        yb: f64,
    ) -> Result<(), Error>;

    /// A contributing crossing of two edges at height `iy`.
    fn crossing(
        &mut self,
        edges: &mut EdgeVec<Edge>,
        it: &Intersection,
        vertex: VertexType,
        iy: f64,
    ) -> Result<(), Error>;

    fn finish(self) -> Self::Output;
}

pub(crate) struct Sweep {
    op: BinaryOp,
    eps: f64,
    edges: EdgeVec<Edge>,
    minima: Vec<LocalMinimum>,
    scanbeams: Vec<f64>,
    aet: ActiveEdges,
}

impl Sweep {
    pub fn new(op: BinaryOp, table: EdgeTable, eps: f64) -> Self {
        let scanbeams = table.scanbeams();
        Sweep {
            op,
            eps,
            edges: table.edges,
            minima: table.minima,
            scanbeams,
            aet: ActiveEdges::default(),
        }
    }

    pub fn run<A: Actions>(mut self, mut actions: A) -> Result<A::Output, Error> {
        tracing::debug!(
            beams = self.scanbeams.len(),
            minima = self.minima.len(),
            edges = self.edges.len(),
            "sweeping"
        );

        // The running insideness of each operand, left to right along a beam
        // boundary. Every beam boundary crosses each operand's boundary an
        // even number of times, so this is back to its initial state at the
        // end of each one.
        let mut parity = ByRole::new(self.op == BinaryOp::Difference, false);
        let mut next_min = 0;

        for i in 0..self.scanbeams.len() {
            let yb = self.scanbeams[i];
            let yt = self.scanbeams.get(i + 1).copied();

            if let Some(lm) = self.minima.get(next_min) {
                if lm.y == yb {
                    for &bound in &lm.bounds {
                        self.aet.insert(&mut self.edges, bound);
                    }
                    next_min += 1;
                }
            }
            tracing::trace!(yb, ?yt, active = self.aet.len(&self.edges), "beam");

            self.bundle(yb)?;
            self.classify(yb, &mut parity, &mut actions)?;
            self.retire(yb, yt);

            if let Some(yt) = yt {
                self.cross(yb, yt, &mut actions)?;
                self.advance(yt);
                #[cfg(feature = "slow-asserts")]
                self.aet.check_invariants(&self.edges);
            }
        }

        Ok(actions.finish())
    }

    /// Groups coincident edges on the beam above `yb` into bundles. The
    /// rightmost edge of a bundle becomes its head and collects the combined
    /// contribution of the whole group; the others become tails with no
    /// contribution of their own.
    fn bundle(&mut self, yb: f64) -> Result<(), Error> {
        fn reset(edge: &mut Edge, yb: f64) -> bool {
            let continues = edge.top.y != yb;
            edge.above.bundle = ByRole::default();
            edge.above.bundle[edge.role] = continues;
            edge.above.state = BundleState::Unbundled;
            continues
        }

        let head = self.aet.head().ok_or(Error::EmptyActiveEdges { y: yb })?;
        let edges = &mut self.edges;
        reset(&mut edges[head], yb);

        let mut e0 = head;
        let mut cur = edges[head].next;
        while let Some(ne) = cur {
            if reset(&mut edges[ne], yb) {
                let prev = &edges[e0];
                if nearly_eq(prev.xb, edges[ne].xb, self.eps)
                    && nearly_eq(prev.dx, edges[ne].dx, self.eps)
                    && prev.top.y != yb
                {
                    let b0 = prev.above.bundle;
                    let role = edges[ne].role;
                    let above = &mut edges[ne].above;
                    above.bundle[role] ^= b0[role];
                    above.bundle[role.other()] = b0[role.other()];
                    above.state = BundleState::Head;
                    edges[e0].above.bundle = ByRole::default();
                    edges[e0].above.state = BundleState::Tail;
                }
                e0 = ne;
            }
            cur = edges[ne].next;
        }
        Ok(())
    }

    /// Classifies every edge on the boundary at `yb`, left to right, and
    /// hands the contributing ones to `actions`.
    fn classify<A: Actions>(
        &mut self,
        yb: f64,
        parity: &mut ByRole<bool>,
        actions: &mut A,
    ) -> Result<(), Error> {
        let mut horiz = ByRole::<HorizState>::default();
        actions.begin_beam();

        let mut cur = self.aet.head();
        while let Some(idx) = cur {
            cur = self.edges[idx].next;
            let e = &self.edges[idx];
            let be = BoundaryEdge {
                above: e.above.bundle,
                below: e.below.bundle,
            };
            let exists = be.exists();
            if !exists.any() {
                continue;
            }

            self.edges[idx].bside = *parity;
            let contributes = be.contributes(self.op, *parity, horiz);
            let vertex = VertexType::from(be.quadrants(self.op, *parity, horiz));

            parity.clip ^= be.above.clip;
            parity.subject ^= be.above.subject;
            for role in [Role::Clip, Role::Subject] {
                if exists[role] {
                    horiz[role] = horiz[role].next(be.above[role], be.below[role], parity[role]);
                }
            }

            if contributes {
                actions.boundary(&mut self.edges, idx, vertex, yb)?;
            }
        }
        Ok(())
    }

    /// Drops the edges that end at `yb` and works out where the others will
    /// be at the top of the beam.
    fn retire(&mut self, yb: f64, yt: Option<f64>) {
        let edges = &mut self.edges;
        let mut cur = self.aet.head();
        while let Some(idx) = cur {
            cur = edges[idx].next;
            if edges[idx].top.y == yb {
                let prev = edges[idx].prev;
                self.aet.remove(edges, idx);

                // If this was the head of a bundle that is carrying on,
                // promote the adjacent tail.
                if edges[idx].below.state == BundleState::Head {
                    if let Some(p) = prev {
                        if edges[p].below.state == BundleState::Tail {
                            edges[p].below.out = edges[idx].below.out;
                            edges[p].below.state = BundleState::Unbundled;
                            if let Some(pp) = edges[p].prev {
                                if edges[pp].below.state == BundleState::Tail {
                                    edges[p].below.state = BundleState::Head;
                                }
                            }
                        }
                    }
                }
            } else if let Some(yt) = yt {
                let e = &mut edges[idx];
                e.xt = if e.top.y == yt { e.top.x } else { e.x_at(yt) };
            }
        }
    }

    /// Processes the crossings inside the beam from `yb` to `yt`, lowest
    /// first, swapping the crossing edges in the active edge table as it
    /// goes.
    ///
    /// When several edges cross at almost the same point, the heights can
    /// come out in an order where the next crossing is between edges that
    /// aren't neighbours yet. A later crossing between neighbours is pulled
    /// forward instead.
    fn cross<A: Actions>(&mut self, yb: f64, yt: f64, actions: &mut A) -> Result<(), Error> {
        let mut found = intersections::find(&self.aet, &self.edges, yt - yb, self.eps);
        for i in 0..found.len() {
            if !self.aet.adjacent(&self.edges, found[i].e0, found[i].e1) {
                let j = (i + 1..found.len())
                    .find(|&j| self.aet.adjacent(&self.edges, found[j].e0, found[j].e1))
                    .ok_or(Error::TangledCrossings { y: yb })?;
                tracing::trace!(i, j, yb, "reordering crossings");
                found.swap(i, j);
            }
            let it = &found[i];
            let (e0, e1) = (it.e0, it.e1);
            let crossing = Crossing {
                e0_above: self.edges[e0].above.bundle,
                e0_bside: self.edges[e0].bside,
                e1_above: self.edges[e1].above.bundle,
                e1_bside: self.edges[e1].bside,
            };
            if crossing.contributes() {
                let vertex = VertexType::from(crossing.quadrants(self.op));
                actions.crossing(&mut self.edges, it, vertex, it.dy + yb)?;
            }

            // Each edge has now passed to the other side of the other one.
            let (a0, a1) = (crossing.e0_above, crossing.e1_above);
            self.edges[e1].bside.clip ^= a0.clip;
            self.edges[e0].bside.clip ^= a1.clip;
            self.edges[e1].bside.subject ^= a0.subject;
            self.edges[e0].bside.subject ^= a1.subject;

            self.aet.swap_bundles(&mut self.edges, e0, e1);
        }
        Ok(())
    }

    /// Moves everything up to the next beam boundary at `yt`: edges that end
    /// there hand over to the next edge of their bound, and the rest carry
    /// their above-state over to below.
    fn advance(&mut self, yt: f64) {
        let edges = &mut self.edges;
        let mut cur = self.aet.head();
        while let Some(idx) = cur {
            cur = edges[idx].next;
            match edges[idx].succ {
                Some(succ) if edges[idx].top.y == yt => {
                    edges[succ].below = edges[idx].above;
                    self.aet.replace(edges, idx, succ);
                }
                _ => {
                    let e = &mut edges[idx];
                    e.below = e.above;
                    e.xb = e.xt;
                }
            }
            edges[idx].above.out = None;
        }
    }
}
