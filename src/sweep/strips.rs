use crate::{
    edges::{Edge, EdgeIdx, EdgeVec},
    geom::Mesh,
    output::{Chain, FragIdx, Strips},
    Error,
};

use super::{classify::VertexType, intersections::Intersection, Actions};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Above,
    Below,
}

/// Emits the result as triangle strips.
///
/// Each strip is bounded by a left and a right chain of edges; the chains
/// switch edges at intermediate vertices, and a strip is split whenever the
/// region it covers splits.
#[derive(Debug)]
pub(crate) struct StripActions {
    strips: Strips,
    /// The edge to the left of the current position on the beam boundary
    /// whose strip is still open.
    cf: Option<EdgeIdx>,
    /// The type of the last left-hand vertex (an internal left intermediate,
    /// an internal maximum, or a left edge).
    cft: VertexType,
}

impl Default for StripActions {
    fn default() -> Self {
        StripActions {
            strips: Strips::default(),
            cf: None,
            cft: VertexType::Led,
        }
    }
}

impl StripActions {
    fn current(&self, x: f64, y: f64) -> Result<EdgeIdx, Error> {
        self.cf.ok_or(Error::MissingFragment { x, y })
    }

    /// Starts a new strip at `(x, y)`, owned by `edge` on the beam above.
    fn new_strip(&mut self, edges: &mut EdgeVec<Edge>, edge: EdgeIdx, x: f64, y: f64) {
        let s = self.strips.new_strip(x, y);
        edges[edge].above.out = Some(s);
    }

    /// Adds `(x, y)` to one chain of the strip that `edge` carries on one side
    /// of the beam boundary.
    fn vertex(
        &mut self,
        edges: &EdgeVec<Edge>,
        edge: EdgeIdx,
        side: Side,
        chain: Chain,
        x: f64,
        y: f64,
    ) -> Result<(), Error> {
        let out = match side {
            Side::Above => edges[edge].above.out,
            Side::Below => edges[edge].below.out,
        };
        let s: FragIdx = out.ok_or(Error::MissingFragment { x, y })?;
        self.strips.push(s, chain, x, y);
        Ok(())
    }

    /// If the current region was bounded on the left by a plain left edge, a
    /// new strip starts on that edge.
    fn split_at_left_edge(&mut self, edges: &mut EdgeVec<Edge>, cf: EdgeIdx, yb: f64) -> Result<(), Error> {
        if self.cft == VertexType::Led {
            let cx = edges[cf].xb;
            if edges[cf].bot.y != yb {
                self.vertex(edges, cf, Side::Below, Chain::Left, cx, yb)?;
            }
            self.new_strip(edges, cf, cx, yb);
        }
        Ok(())
    }
}

/// The nearest edge to the left of `from` in the active edge table that
/// carries an open strip, and its x at height `y`.
fn prev_open(edges: &EdgeVec<Edge>, from: EdgeIdx, y: f64) -> Result<(EdgeIdx, f64), Error> {
    let mut d = from;
    loop {
        d = edges[d].prev.ok_or(Error::MissingNeighbour { y })?;
        if edges[d].above.out.is_some() {
            return Ok((d, edges[d].x_at(y)));
        }
    }
}

/// Like [`prev_open`], but to the right.
fn next_open(edges: &EdgeVec<Edge>, from: EdgeIdx, y: f64) -> Result<(EdgeIdx, f64), Error> {
    let mut d = from;
    loop {
        d = edges[d].next.ok_or(Error::MissingNeighbour { y })?;
        if edges[d].above.out.is_some() {
            return Ok((d, edges[d].x_at(y)));
        }
    }
}

impl Actions for StripActions {
    type Output = Mesh;

    fn begin_beam(&mut self) {}

    fn boundary(
        &mut self,
        edges: &mut EdgeVec<Edge>,
        idx: EdgeIdx,
        vertex: VertexType,
        yb: f64,
    ) -> Result<(), Error> {
        use Chain::{Left, Right};
        use Side::{Above, Below};

        let xb = edges[idx].xb;
        match vertex {
            VertexType::Emn => {
                self.new_strip(edges, idx, xb, yb);
                self.cf = Some(idx);
            }
            VertexType::Eri => {
                let cf = self.current(xb, yb)?;
                edges[idx].above.out = edges[cf].above.out;
                if xb != edges[cf].xb {
                    self.vertex(edges, idx, Above, Right, xb, yb)?;
                }
                self.cf = None;
            }
            VertexType::Eli => {
                self.vertex(edges, idx, Below, Left, xb, yb)?;
                edges[idx].above.out = None;
                self.cf = Some(idx);
            }
            VertexType::Emx => {
                let cf = self.current(xb, yb)?;
                if xb != edges[cf].xb {
                    self.vertex(edges, idx, Below, Right, xb, yb)?;
                }
                edges[idx].above.out = None;
                self.cf = None;
            }
            VertexType::Imn => {
                let cf = self.current(xb, yb)?;
                self.split_at_left_edge(edges, cf, yb)?;
                edges[idx].above.out = edges[cf].above.out;
                self.vertex(edges, idx, Above, Right, xb, yb)?;
            }
            VertexType::Ili => {
                self.new_strip(edges, idx, xb, yb);
                self.cf = Some(idx);
                self.cft = VertexType::Ili;
            }
            VertexType::Iri => {
                let cf = self.current(xb, yb)?;
                self.split_at_left_edge(edges, cf, yb)?;
                self.vertex(edges, idx, Below, Right, xb, yb)?;
                edges[idx].above.out = None;
            }
            VertexType::Imx => {
                self.vertex(edges, idx, Below, Left, xb, yb)?;
                edges[idx].above.out = None;
                self.cft = VertexType::Imx;
            }
            VertexType::Imm => {
                let cf = self.current(xb, yb)?;
                self.vertex(edges, idx, Below, Left, xb, yb)?;
                edges[idx].above.out = edges[cf].above.out;
                if xb != edges[cf].xb {
                    self.vertex(edges, cf, Above, Right, xb, yb)?;
                }
                self.cf = Some(idx);
            }
            VertexType::Emm => {
                self.vertex(edges, idx, Below, Right, xb, yb)?;
                edges[idx].above.out = None;
                self.new_strip(edges, idx, xb, yb);
                self.cf = Some(idx);
            }
            VertexType::Led => {
                if edges[idx].bot.y == yb {
                    self.vertex(edges, idx, Below, Left, xb, yb)?;
                }
                edges[idx].above.out = edges[idx].below.out;
                self.cf = Some(idx);
                self.cft = VertexType::Led;
            }
            VertexType::Red => {
                let cf = self.current(xb, yb)?;
                edges[idx].above.out = edges[cf].above.out;
                if self.cft == VertexType::Led {
                    if edges[cf].bot.y == yb {
                        self.vertex(edges, idx, Below, Right, xb, yb)?;
                    } else if edges[idx].bot.y == yb {
                        let cx = edges[cf].xb;
                        self.vertex(edges, cf, Below, Left, cx, yb)?;
                        self.vertex(edges, idx, Below, Right, xb, yb)?;
                    }
                } else {
                    self.vertex(edges, idx, Below, Right, xb, yb)?;
                    self.vertex(edges, idx, Above, Right, xb, yb)?;
                }
                self.cf = None;
            }
            VertexType::Nul | VertexType::Ted | VertexType::Bed | VertexType::Ful => {}
        }
        Ok(())
    }

    fn crossing(
        &mut self,
        edges: &mut EdgeVec<Edge>,
        it: &Intersection,
        vertex: VertexType,
        iy: f64,
    ) -> Result<(), Error> {
        use Chain::{Left, Right};
        use Side::Above;

        let (e0, e1, ix) = (it.e0, it.e1, it.x);
        let p = edges[e0].above.out.is_some();
        let q = edges[e1].above.out.is_some();
        match vertex {
            VertexType::Emn => {
                self.new_strip(edges, e1, ix, iy);
                edges[e0].above.out = edges[e1].above.out;
            }
            VertexType::Eri if p => {
                let (prev, px) = prev_open(edges, e0, iy)?;
                self.vertex(edges, prev, Above, Left, px, iy)?;
                self.vertex(edges, e0, Above, Right, ix, iy)?;
                edges[e1].above.out = edges[e0].above.out;
                edges[e0].above.out = None;
            }
            VertexType::Eli if q => {
                let (next, nx) = next_open(edges, e1, iy)?;
                self.vertex(edges, e1, Above, Left, ix, iy)?;
                self.vertex(edges, next, Above, Right, nx, iy)?;
                edges[e0].above.out = edges[e1].above.out;
                edges[e1].above.out = None;
            }
            VertexType::Emx if p && q => {
                self.vertex(edges, e0, Above, Left, ix, iy)?;
                edges[e0].above.out = None;
                edges[e1].above.out = None;
            }
            VertexType::Imn => {
                let (prev, px) = prev_open(edges, e0, iy)?;
                self.vertex(edges, prev, Above, Left, px, iy)?;
                let (next, nx) = next_open(edges, e1, iy)?;
                self.vertex(edges, next, Above, Right, nx, iy)?;
                self.new_strip(edges, prev, px, iy);
                edges[e1].above.out = edges[prev].above.out;
                self.vertex(edges, e1, Above, Right, ix, iy)?;
                self.new_strip(edges, e0, ix, iy);
                edges[next].above.out = edges[e0].above.out;
                self.vertex(edges, next, Above, Right, nx, iy)?;
            }
            VertexType::Ili if p => {
                self.vertex(edges, e0, Above, Left, ix, iy)?;
                let (next, nx) = next_open(edges, e1, iy)?;
                self.vertex(edges, next, Above, Right, nx, iy)?;
                edges[e1].above.out = edges[e0].above.out;
                edges[e0].above.out = None;
            }
            VertexType::Iri if q => {
                self.vertex(edges, e1, Above, Right, ix, iy)?;
                let (prev, px) = prev_open(edges, e0, iy)?;
                self.vertex(edges, prev, Above, Left, px, iy)?;
                edges[e0].above.out = edges[e1].above.out;
                edges[e1].above.out = None;
            }
            VertexType::Imx if p && q => {
                self.vertex(edges, e0, Above, Right, ix, iy)?;
                self.vertex(edges, e1, Above, Left, ix, iy)?;
                edges[e0].above.out = None;
                edges[e1].above.out = None;
                let (prev, px) = prev_open(edges, e0, iy)?;
                self.vertex(edges, prev, Above, Left, px, iy)?;
                self.new_strip(edges, prev, px, iy);
                let (next, nx) = next_open(edges, e1, iy)?;
                self.vertex(edges, next, Above, Right, nx, iy)?;
                edges[next].above.out = edges[prev].above.out;
                self.vertex(edges, next, Above, Right, nx, iy)?;
            }
            VertexType::Imm if p && q => {
                self.vertex(edges, e0, Above, Right, ix, iy)?;
                self.vertex(edges, e1, Above, Left, ix, iy)?;
                let (prev, px) = prev_open(edges, e0, iy)?;
                self.vertex(edges, prev, Above, Left, px, iy)?;
                self.new_strip(edges, prev, px, iy);
                let (next, nx) = next_open(edges, e1, iy)?;
                self.vertex(edges, next, Above, Right, nx, iy)?;
                edges[e1].above.out = edges[prev].above.out;
                self.vertex(edges, e1, Above, Right, ix, iy)?;
                self.new_strip(edges, e0, ix, iy);
                edges[next].above.out = edges[e0].above.out;
                self.vertex(edges, next, Above, Right, nx, iy)?;
            }
            VertexType::Emm if p && q => {
                self.vertex(edges, e0, Above, Left, ix, iy)?;
                self.new_strip(edges, e1, ix, iy);
                edges[e0].above.out = edges[e1].above.out;
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Mesh {
        self.strips.into_mesh()
    }
}
