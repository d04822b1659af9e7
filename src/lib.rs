#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
mod edges;
mod geom;
mod num;
mod output;
mod prefilter;
mod sweep;

#[cfg(feature = "generators")]
pub mod generators;

pub use geom::{Contour, Mesh, Point, Polygon, Strip};
pub use num::DEFAULT_EPSILON;

use edges::{EdgeTable, Role};
use sweep::{Actions, ContourActions, StripActions, Sweep};

/// Binary operations between sets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryOp {
    /// A point is in the union of two sets if it is in either one.
    Union,
    /// A point is in the intersection of two sets if it is in both.
    Intersection,
    /// A point is in the exclusive-or of two sets if it is in one or the other, but not both.
    Xor,
    /// A point is in the difference of two sets if it is in the first but not the second.
    Difference,
}

impl std::str::FromStr for BinaryOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "union" => Ok(BinaryOp::Union),
            "intersection" => Ok(BinaryOp::Intersection),
            "xor" => Ok(BinaryOp::Xor),
            "difference" => Ok(BinaryOp::Difference),
            _ => Err(Error::UnknownOp(s.to_owned())),
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BinaryOp::Union => "union",
            BinaryOp::Intersection => "intersection",
            BinaryOp::Xor => "xor",
            BinaryOp::Difference => "difference",
        };
        f.write_str(name)
    }
}

/// Things that can go wrong while clipping.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// At least one of the inputs was infinite.
    #[error("one of the inputs was infinite")]
    Infinity,
    /// At least one of the inputs was not a number.
    #[error("one of the inputs had a NaN")]
    NaN,
    /// The name didn't match any operation.
    #[error("unknown operation {0:?}")]
    UnknownOp(String),
    /// The tolerance in [`ClipOptions`] was negative or not finite.
    #[error("bad tolerance {0}")]
    BadEpsilon(f64),
    /// There were no active edges at a scanbeam boundary.
    #[error("no active edges at y = {y}")]
    EmptyActiveEdges {
        /// The height of the boundary.
        y: f64,
    },
    /// A vertex of the result had no open output to go into.
    #[error("no open output at ({x}, {y})")]
    MissingFragment {
        /// The vertex's x coordinate.
        x: f64,
        /// The vertex's y coordinate.
        y: f64,
    },
    /// The crossings inside a scanbeam couldn't be put in an order where
    /// every crossing is between neighbouring edges.
    #[error("couldn't order the crossings above y = {y}")]
    TangledCrossings {
        /// The bottom of the scanbeam.
        y: f64,
    },
    /// There was no active edge carrying an open strip beside a crossing.
    #[error("no neighbouring strip at y = {y}")]
    MissingNeighbour {
        /// The height of the crossing.
        y: f64,
    },
}

/// Knobs for a single clip.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClipOptions {
    /// Absolute tolerance for deciding that two coordinates or slopes are
    /// equal. Must be finite and non-negative.
    pub epsilon: f64,
    /// Leave out contours whose bounding boxes show they can't affect the
    /// result. This never changes the result.
    pub prefilter: bool,
}

impl Default for ClipOptions {
    fn default() -> Self {
        ClipOptions {
            epsilon: DEFAULT_EPSILON,
            prefilter: true,
        }
    }
}

fn check_finite(subject: &Polygon, clip: &Polygon) -> Result<(), Error> {
    let coords = || {
        subject
            .contours()
            .chain(clip.contours())
            .flat_map(|c| c.points.iter())
            .flat_map(|p| [p.x, p.y])
    };
    if coords().any(f64::is_nan) {
        return Err(Error::NaN);
    }
    if coords().any(f64::is_infinite) {
        return Err(Error::Infinity);
    }
    Ok(())
}

/// Is the result empty without having to look at any edges?
fn trivially_empty(op: BinaryOp, subject: &Polygon, clip: &Polygon) -> bool {
    match op {
        BinaryOp::Intersection => subject.is_empty() || clip.is_empty(),
        BinaryOp::Difference => subject.is_empty(),
        BinaryOp::Union | BinaryOp::Xor => subject.is_empty() && clip.is_empty(),
    }
}

/// Validates the inputs and builds the sweep, or returns `None` if the result
/// is certainly empty.
fn prepare(
    op: BinaryOp,
    subject: &Polygon,
    clip: &Polygon,
    options: &ClipOptions,
) -> Result<Option<Sweep>, Error> {
    if !(options.epsilon.is_finite() && options.epsilon >= 0.0) {
        return Err(Error::BadEpsilon(options.epsilon));
    }
    check_finite(subject, clip)?;
    if trivially_empty(op, subject, clip) {
        return Ok(None);
    }

    let enabled = if options.prefilter {
        prefilter::enabled_contours(op, subject, clip)
    } else {
        prefilter::Enabled::default()
    };

    let mut table = EdgeTable::default();
    table.add_polygon(subject, &enabled.subject, Role::Subject, op);
    table.add_polygon(clip, &enabled.clip, Role::Clip, op);
    if table.minima.is_empty() {
        return Ok(None);
    }
    Ok(Some(Sweep::new(op, table, options.epsilon)))
}

fn clip_with<A: Actions + Default>(
    op: BinaryOp,
    subject: &Polygon,
    clip: &Polygon,
    options: &ClipOptions,
) -> Result<A::Output, Error>
where
    A::Output: Default,
{
    tracing::debug!(
        %op,
        subject = subject.contours.len(),
        clip = clip.contours.len(),
        "clipping"
    );
    match prepare(op, subject, clip, options)? {
        Some(sweep) => sweep.run(A::default()),
        None => Ok(A::Output::default()),
    }
}

/// Computes a boolean operation between two polygons, with the default
/// options.
///
/// Both polygons are interpreted under the even-odd rule, so the `is_hole`
/// flags on their contours are ignored. In the result, holes are flagged and
/// come after all the outer contours. Outer contours run counter-clockwise
/// and holes clockwise (with the y axis pointing up).
pub fn clip_to_polygon(op: BinaryOp, subject: &Polygon, clip: &Polygon) -> Result<Polygon, Error> {
    clip_to_polygon_with(op, subject, clip, &ClipOptions::default())
}

/// Like [`clip_to_polygon`], but with explicit options.
pub fn clip_to_polygon_with(
    op: BinaryOp,
    subject: &Polygon,
    clip: &Polygon,
    options: &ClipOptions,
) -> Result<Polygon, Error> {
    let ret = clip_with::<ContourActions>(op, subject, clip, options)?;
    tracing::debug!(
        contours = ret.contours.len(),
        holes = ret.hole_count(),
        "clipped"
    );
    Ok(ret)
}

/// Computes a boolean operation between two polygons and returns the result
/// as triangle strips, with the default options.
pub fn clip_to_mesh(op: BinaryOp, subject: &Polygon, clip: &Polygon) -> Result<Mesh, Error> {
    clip_to_mesh_with(op, subject, clip, &ClipOptions::default())
}

/// Like [`clip_to_mesh`], but with explicit options.
pub fn clip_to_mesh_with(
    op: BinaryOp,
    subject: &Polygon,
    clip: &Polygon,
    options: &ClipOptions,
) -> Result<Mesh, Error> {
    let ret = clip_with::<StripActions>(op, subject, clip, options)?;
    tracing::debug!(
        strips = ret.strips.len(),
        triangles = ret.triangle_count(),
        "clipped"
    );
    Ok(ret)
}

/// Splits a polygon into triangle strips.
///
/// Contours with fewer than three vertices are ignored.
pub fn polygon_to_mesh(poly: &Polygon) -> Result<Mesh, Error> {
    let mut poly = poly.clone();
    poly.remove_open_contours();
    clip_to_mesh(BinaryOp::Union, &poly, &Polygon::new())
}

/// Rebuilds a polygon into the same shape as a clipping result: no
/// self-overlaps, holes flagged and oriented clockwise, outer contours
/// counter-clockwise.
pub fn normalize(poly: &Polygon) -> Result<Polygon, Error> {
    clip_to_polygon(BinaryOp::Difference, poly, &Polygon::new())
}

impl Polygon {
    /// The union of this polygon and `other`.
    pub fn union(&self, other: &Polygon) -> Result<Polygon, Error> {
        clip_to_polygon(BinaryOp::Union, self, other)
    }

    /// The intersection of this polygon and `other`.
    pub fn intersection(&self, other: &Polygon) -> Result<Polygon, Error> {
        clip_to_polygon(BinaryOp::Intersection, self, other)
    }

    /// The exclusive-or of this polygon and `other`.
    pub fn xor(&self, other: &Polygon) -> Result<Polygon, Error> {
        clip_to_polygon(BinaryOp::Xor, self, other)
    }

    /// This polygon minus `other`.
    pub fn difference(&self, other: &Polygon) -> Result<Polygon, Error> {
        clip_to_polygon(BinaryOp::Difference, self, other)
    }

    /// Splits this polygon into triangle strips.
    pub fn to_mesh(&self) -> Result<Mesh, Error> {
        polygon_to_mesh(self)
    }
}
