//! Vertex classification.
//!
//! At every point where the result boundary might turn (an edge crossing a
//! scanbeam boundary, or two edges crossing each other inside a beam) the
//! four quadrants around the point are each either inside or outside the
//! result. Those four bits pick one of sixteen vertex types, and the vertex
//! type decides what happens to the output fragments.

use crate::{edges::ByRole, BinaryOp};

/// How the insideness of the two operands combines into insideness of the
/// result.
pub(crate) fn combine(op: BinaryOp, clip: bool, subject: bool) -> bool {
    match op {
        BinaryOp::Intersection | BinaryOp::Difference => clip && subject,
        BinaryOp::Xor => clip ^ subject,
        BinaryOp::Union => clip || subject,
    }
}

/// Which of the four quadrants around a point are inside the result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Quadrants {
    pub top_right: bool,
    pub top_left: bool,
    pub bottom_right: bool,
    pub bottom_left: bool,
}

/// The sixteen vertex types, named by which quadrants are inside the result:
/// external/internal maxima and minima, left/right intermediates, and the
/// degenerate cases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum VertexType {
    /// Empty non-intersection.
    Nul,
    /// External maximum.
    Emx,
    /// External left intermediate.
    Eli,
    /// Top edge.
    Ted,
    /// External right intermediate.
    Eri,
    /// Right edge.
    Red,
    /// Internal maximum and minimum.
    Imm,
    /// Internal minimum.
    Imn,
    /// External minimum.
    Emn,
    /// External maximum and minimum.
    Emm,
    /// Left edge.
    Led,
    /// Internal left intermediate.
    Ili,
    /// Bottom edge.
    Bed,
    /// Internal right intermediate.
    Iri,
    /// Internal maximum.
    Imx,
    /// Full non-intersection.
    Ful,
}

impl From<Quadrants> for VertexType {
    fn from(q: Quadrants) -> Self {
        let code = q.top_right as u8
            | (q.top_left as u8) << 1
            | (q.bottom_right as u8) << 2
            | (q.bottom_left as u8) << 3;
        match code {
            0 => VertexType::Nul,
            1 => VertexType::Emx,
            2 => VertexType::Eli,
            3 => VertexType::Ted,
            4 => VertexType::Eri,
            5 => VertexType::Red,
            6 => VertexType::Imm,
            7 => VertexType::Imn,
            8 => VertexType::Emn,
            9 => VertexType::Emm,
            10 => VertexType::Led,
            11 => VertexType::Ili,
            12 => VertexType::Bed,
            13 => VertexType::Iri,
            14 => VertexType::Imx,
            _ => VertexType::Ful,
        }
    }
}

/// Whether a horizontal run of an operand's boundary is currently open as we
/// scan left to right along a beam boundary, and which side of it is inside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum HorizState {
    #[default]
    Closed,
    /// The run has the operand's inside below it.
    Bottom,
    /// The run has the operand's inside above it.
    Top,
}

impl HorizState {
    pub fn is_open(self) -> bool {
        self != HorizState::Closed
    }

    /// The state after passing an edge of the operand. `above` and `below`
    /// say whether the edge extends into the beam above and the beam below;
    /// `parity` is the operand's insideness just to the right of the edge.
    pub fn next(self, above: bool, below: bool, parity: bool) -> Self {
        use HorizState::*;
        match (self, above, below) {
            (Closed, true, false) => {
                if parity {
                    Top
                } else {
                    Bottom
                }
            }
            (Closed, false, true) => {
                if parity {
                    Bottom
                } else {
                    Top
                }
            }
            (Closed, true, true) => Closed,
            (Bottom | Top, true, false) | (Bottom | Top, false, true) => Closed,
            (Bottom, true, true) => Top,
            (Top, true, true) => Bottom,
            (state, false, false) => state,
        }
    }
}

/// What's known about an edge as it's classified at a beam boundary.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BoundaryEdge {
    /// Does the edge (or its bundle) continue into the beam above?
    pub above: ByRole<bool>,
    /// Does the edge (or its bundle) come from the beam below?
    pub below: ByRole<bool>,
}

impl BoundaryEdge {
    pub fn exists(&self) -> ByRole<bool> {
        ByRole::new(
            self.above.clip || self.below.clip,
            self.above.subject || self.below.subject,
        )
    }

    /// Does a vertex here touch the result's boundary at all?
    ///
    /// `parity` and `horiz` are the states just to the left of the edge.
    pub fn contributes(
        &self,
        op: BinaryOp,
        parity: ByRole<bool>,
        horiz: ByRole<HorizState>,
    ) -> bool {
        let exists = self.exists();
        let (pc, ps) = (parity.clip, parity.subject);
        let (hc, hs) = (horiz.clip.is_open(), horiz.subject.is_open());
        let coincident = exists.clip && exists.subject && pc == ps;
        match op {
            BinaryOp::Intersection | BinaryOp::Difference => {
                (exists.clip && (ps || hs)) || (exists.subject && (pc || hc)) || coincident
            }
            BinaryOp::Xor => exists.clip || exists.subject,
            BinaryOp::Union => {
                (exists.clip && (!ps || hs)) || (exists.subject && (!pc || hc)) || coincident
            }
        }
    }

    /// Which quadrants around the point where this edge meets the boundary
    /// are inside the result.
    pub fn quadrants(
        &self,
        op: BinaryOp,
        parity: ByRole<bool>,
        horiz: ByRole<HorizState>,
    ) -> Quadrants {
        let (pc, ps) = (parity.clip, parity.subject);
        let (hc, hs) = (horiz.clip.is_open(), horiz.subject.is_open());
        let (ac, as_) = (self.above.clip, self.above.subject);
        let (bc, bs) = (self.below.clip, self.below.subject);
        Quadrants {
            bottom_right: combine(op, pc, ps),
            bottom_left: combine(op, pc ^ ac, ps ^ as_),
            top_right: combine(op, pc ^ hc, ps ^ hs),
            top_left: combine(op, pc ^ hc ^ bc, ps ^ hs ^ bs),
        }
    }
}

/// The state of two edges at the point where they cross inside a beam. `e0`
/// is the one that was on the left below the crossing.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Crossing {
    pub e0_above: ByRole<bool>,
    pub e0_bside: ByRole<bool>,
    pub e1_above: ByRole<bool>,
    pub e1_bside: ByRole<bool>,
}

impl Crossing {
    /// Only crossings between two edges that both lie on the boundary of
    /// their operand can produce output.
    pub fn contributes(&self) -> bool {
        self.e0_above.any() && self.e1_above.any()
    }

    pub fn quadrants(&self, op: BinaryOp) -> Quadrants {
        let inside = |e0_a: bool, e0_s: bool, e1_a: bool, e1_s: bool| {
            (e0_a && !e0_s) || (e1_a && e1_s) || (!e0_a && !e1_a && e0_s && e1_s)
        };
        let in_c = inside(
            self.e0_above.clip,
            self.e0_bside.clip,
            self.e1_above.clip,
            self.e1_bside.clip,
        );
        let in_s = inside(
            self.e0_above.subject,
            self.e0_bside.subject,
            self.e1_above.subject,
            self.e1_bside.subject,
        );
        let (a0c, a0s) = (self.e0_above.clip, self.e0_above.subject);
        let (a1c, a1s) = (self.e1_above.clip, self.e1_above.subject);
        Quadrants {
            top_right: combine(op, in_c, in_s),
            top_left: combine(op, in_c ^ a1c, in_s ^ a1s),
            bottom_right: combine(op, in_c ^ a0c, in_s ^ a0s),
            bottom_left: combine(op, in_c ^ a1c ^ a0c, in_s ^ a1s ^ a0s),
        }
    }
}
