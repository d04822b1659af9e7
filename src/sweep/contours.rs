use crate::{
    edges::{Edge, EdgeIdx, EdgeVec},
    geom::Polygon,
    output::{FragIdx, Fragments},
    Error,
};

use super::{classify::VertexType, intersections::Intersection, Actions};

/// Traces the result as closed contours.
#[derive(Debug)]
pub(crate) struct ContourActions {
    frags: Fragments,
    /// The x of the last vertex emitted on the current beam boundary.
    px: f64,
    /// The fragment that's open to the left of the current position on the
    /// beam boundary.
    cf: Option<FragIdx>,
}

impl Default for ContourActions {
    fn default() -> Self {
        ContourActions {
            frags: Fragments::default(),
            px: f64::MIN,
            cf: None,
        }
    }
}

impl ContourActions {
    fn current(&self, x: f64, y: f64) -> Result<FragIdx, Error> {
        self.cf.ok_or(Error::MissingFragment { x, y })
    }
}

fn below(edges: &EdgeVec<Edge>, idx: EdgeIdx, x: f64, y: f64) -> Result<FragIdx, Error> {
    edges[idx].below.out.ok_or(Error::MissingFragment { x, y })
}

impl Actions for ContourActions {
    type Output = Polygon;

    fn begin_beam(&mut self) {
        self.px = f64::MIN;
    }

    fn boundary(
        &mut self,
        edges: &mut EdgeVec<Edge>,
        idx: EdgeIdx,
        vertex: VertexType,
        yb: f64,
    ) -> Result<(), Error> {
        let xb = edges[idx].xb;
        match vertex {
            VertexType::Emn | VertexType::Imn => {
                let f = self.frags.add_local_min(xb, yb);
                edges[idx].above.out = Some(f);
                self.px = xb;
                self.cf = Some(f);
            }
            VertexType::Eri => {
                if xb != self.px {
                    let cf = self.current(xb, yb)?;
                    self.frags.add_right(cf, xb, yb);
                    self.px = xb;
                }
                edges[idx].above.out = self.cf.take();
            }
            VertexType::Eli => {
                let f = below(edges, idx, xb, yb)?;
                self.frags.add_left(f, xb, yb);
                self.px = xb;
                self.cf = Some(f);
            }
            VertexType::Emx => {
                let cf = self.current(xb, yb)?;
                if xb != self.px {
                    self.frags.add_left(cf, xb, yb);
                    self.px = xb;
                }
                self.frags.merge_right(cf, below(edges, idx, xb, yb)?);
                self.cf = None;
            }
            VertexType::Ili => {
                if xb != self.px {
                    let cf = self.current(xb, yb)?;
                    self.frags.add_left(cf, xb, yb);
                    self.px = xb;
                }
                edges[idx].above.out = self.cf.take();
            }
            VertexType::Iri => {
                let f = below(edges, idx, xb, yb)?;
                self.frags.add_right(f, xb, yb);
                self.px = xb;
                self.cf = Some(f);
                edges[idx].below.out = None;
            }
            VertexType::Imx => {
                let cf = self.current(xb, yb)?;
                if xb != self.px {
                    self.frags.add_right(cf, xb, yb);
                    self.px = xb;
                }
                self.frags.merge_left(cf, below(edges, idx, xb, yb)?);
                self.cf = None;
                edges[idx].below.out = None;
            }
            VertexType::Imm | VertexType::Emm => {
                let cf = self.current(xb, yb)?;
                let b = below(edges, idx, xb, yb)?;
                if vertex == VertexType::Imm {
                    if xb != self.px {
                        self.frags.add_right(cf, xb, yb);
                        self.px = xb;
                    }
                    self.frags.merge_left(cf, b);
                } else {
                    if xb != self.px {
                        self.frags.add_left(cf, xb, yb);
                        self.px = xb;
                    }
                    self.frags.merge_right(cf, b);
                }
                edges[idx].below.out = None;
                let f = self.frags.add_local_min(xb, yb);
                edges[idx].above.out = Some(f);
                self.cf = Some(f);
            }
            VertexType::Led | VertexType::Red => {
                if edges[idx].bot.y == yb {
                    let f = below(edges, idx, xb, yb)?;
                    if vertex == VertexType::Led {
                        self.frags.add_left(f, xb, yb);
                    } else {
                        self.frags.add_right(f, xb, yb);
                    }
                }
                edges[idx].above.out = edges[idx].below.out;
                self.px = xb;
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
        let (e0, e1, ix) = (it.e0, it.e1, it.x);
        let p = edges[e0].above.out;
        let q = edges[e1].above.out;
        match (vertex, p, q) {
            (VertexType::Emn | VertexType::Imn, _, _) => {
                let f = self.frags.add_local_min(ix, iy);
                edges[e0].above.out = Some(f);
                edges[e1].above.out = Some(f);
            }
            (VertexType::Eri, Some(p), _) => {
                self.frags.add_right(p, ix, iy);
                edges[e1].above.out = Some(p);
                edges[e0].above.out = None;
            }
            (VertexType::Eli, _, Some(q)) => {
                self.frags.add_left(q, ix, iy);
                edges[e0].above.out = Some(q);
                edges[e1].above.out = None;
            }
            (VertexType::Emx, Some(p), Some(q)) => {
                self.frags.add_left(p, ix, iy);
                self.frags.merge_right(p, q);
                edges[e0].above.out = None;
                edges[e1].above.out = None;
            }
            (VertexType::Ili, Some(p), _) => {
                self.frags.add_left(p, ix, iy);
                edges[e1].above.out = Some(p);
                edges[e0].above.out = None;
            }
            (VertexType::Iri, _, Some(q)) => {
                self.frags.add_right(q, ix, iy);
                edges[e0].above.out = Some(q);
                edges[e1].above.out = None;
            }
            (VertexType::Imx, Some(p), Some(q)) => {
                self.frags.add_right(p, ix, iy);
                self.frags.merge_left(p, q);
                edges[e0].above.out = None;
                edges[e1].above.out = None;
            }
            (VertexType::Imm, Some(p), Some(q)) => {
                self.frags.add_right(p, ix, iy);
                self.frags.merge_left(p, q);
                let f = self.frags.add_local_min(ix, iy);
                edges[e0].above.out = Some(f);
                edges[e1].above.out = Some(f);
            }
            (VertexType::Emm, Some(p), Some(q)) => {
                self.frags.add_left(p, ix, iy);
                self.frags.merge_right(p, q);
                let f = self.frags.add_local_min(ix, iy);
                edges[e0].above.out = Some(f);
                edges[e1].above.out = Some(f);
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Polygon {
        self.frags.into_polygon()
    }
}
