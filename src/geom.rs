//! Geometric primitives: points, contours, polygons and triangle strips.

use crate::num::CheapOrderedFloat;

/// A two-dimensional point.
///
/// Points are sorted by `y` and then by `x`, matching the direction of the
/// sweep (which moves in increasing `y`).
#[derive(Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Vertical coordinate.
    pub y: f64,
    /// Horizontal coordinate.
    pub x: f64,
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (
            CheapOrderedFloat::from(self.y),
            CheapOrderedFloat::from(self.x),
        )
            .cmp(&(
                CheapOrderedFloat::from(other.y),
                CheapOrderedFloat::from(other.x),
            ))
    }
}

impl PartialOrd for Point {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Point {}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    ///
    /// Note that the `x` coordinate comes first, even though points sort by
    /// `y` first.
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Converts to a `kurbo` point.
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

fn bounding_box<'a>(mut points: impl Iterator<Item = &'a Point>) -> Option<kurbo::Rect> {
    let first = points.next()?.to_kurbo();
    Some(points.fold(kurbo::Rect::from_points(first, first), |rect, p| {
        rect.union_pt(p.to_kurbo())
    }))
}

/// A closed ring of vertices.
///
/// The ring is implicitly closed: the last point connects back to the first,
/// and the first point is not repeated.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Contour {
    /// The vertices, in order.
    pub points: Vec<Point>,
    /// Does this contour bound a hole?
    ///
    /// Clipping ignores this flag on its inputs (insideness is decided by
    /// even-odd parity) but sets it on its outputs.
    #[serde(default)]
    pub is_hole: bool,
}

impl Contour {
    /// A contour that isn't a hole.
    pub fn new(points: impl IntoIterator<Item = impl Into<Point>>) -> Self {
        Contour {
            points: points.into_iter().map(Into::into).collect(),
            is_hole: false,
        }
    }

    /// A contour flagged as a hole.
    pub fn hole(points: impl IntoIterator<Item = impl Into<Point>>) -> Self {
        Contour {
            is_hole: true,
            ..Contour::new(points)
        }
    }

    /// The number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Does this contour have no vertices at all?
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The smallest axis-aligned rectangle containing every vertex, or `None`
    /// for an empty contour.
    pub fn bounding_box(&self) -> Option<kurbo::Rect> {
        bounding_box(self.points.iter())
    }

    /// The shoelace area: positive for counter-clockwise rings (with `y`
    /// pointing up), negative for clockwise ones.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let p = self.points[i];
                let q = self.points[(i + 1) % n];
                p.x * q.y - q.x * p.y
            })
            .sum();
        twice / 2.0
    }

    /// This contour as a closed path.
    pub fn to_bez_path(&self) -> kurbo::BezPath {
        let mut ret = kurbo::BezPath::new();
        if let Some((first, rest)) = self.points.split_first() {
            ret.move_to(first.to_kurbo());
            for p in rest {
                ret.line_to(p.to_kurbo());
            }
            ret.close_path();
        }
        ret
    }
}

/// A set of contours, interpreted under the even-odd rule.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    /// The contours, in order.
    pub contours: Vec<Contour>,
}

impl Polygon {
    /// The empty polygon.
    pub fn new() -> Self {
        Polygon::default()
    }

    /// Does this polygon have no contours?
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Adds a contour.
    pub fn push(&mut self, contour: Contour) {
        self.contours.push(contour);
    }

    /// An iterator over the contours.
    pub fn contours(&self) -> impl Iterator<Item = &Contour> + '_ {
        self.contours.iter()
    }

    /// How many of the contours are holes.
    pub fn hole_count(&self) -> usize {
        self.contours.iter().filter(|c| c.is_hole).count()
    }

    /// The bounding box of all the vertices, or `None` if there are none.
    pub fn bounding_box(&self) -> Option<kurbo::Rect> {
        bounding_box(self.contours.iter().flat_map(|c| c.points.iter()))
    }

    /// The enclosed area: the areas of the outer contours minus the areas of
    /// the holes.
    ///
    /// This is only meaningful for polygons whose holes lie inside their outer
    /// contours and don't overlap, which is the case for clipping results.
    pub fn area(&self) -> f64 {
        self.contours
            .iter()
            .map(|c| {
                let a = c.signed_area().abs();
                if c.is_hole {
                    -a
                } else {
                    a
                }
            })
            .sum()
    }

    /// Drops every contour with fewer than three vertices.
    pub fn remove_open_contours(&mut self) {
        self.contours.retain(|c| c.len() >= 3);
    }

    /// Flattens a path into a polygon, one contour per subpath.
    ///
    /// Curves are approximated by line segments to within `tolerance`.
    /// Subpaths are closed whether or not the path closes them explicitly.
    pub fn from_bez_path(path: &kurbo::BezPath, tolerance: f64) -> Self {
        let mut contours = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        let mut finish = |current: &mut Vec<Point>| {
            if current.len() > 1 && current.first() == current.last() {
                current.pop();
            }
            if !current.is_empty() {
                contours.push(Contour {
                    points: std::mem::take(current),
                    is_hole: false,
                });
            }
        };

        path.flatten(tolerance, |el| match el {
            kurbo::PathEl::MoveTo(p) => {
                finish(&mut current);
                current.push(p.into());
            }
            kurbo::PathEl::LineTo(p) => current.push(p.into()),
            kurbo::PathEl::ClosePath => finish(&mut current),
            // `flatten` only produces lines.
            kurbo::PathEl::QuadTo(_, p) | kurbo::PathEl::CurveTo(_, _, p) => {
                current.push(p.into())
            }
        });
        finish(&mut current);
        Polygon { contours }
    }

    /// This polygon as a path, one closed subpath per contour.
    pub fn to_bez_path(&self) -> kurbo::BezPath {
        let mut ret = kurbo::BezPath::new();
        for c in &self.contours {
            ret.extend(c.to_bez_path().elements().iter().cloned());
        }
        ret
    }
}

impl FromIterator<Contour> for Polygon {
    fn from_iter<I: IntoIterator<Item = Contour>>(iter: I) -> Self {
        Polygon {
            contours: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Vec<(f64, f64)>>> for Polygon {
    fn from(contours: Vec<Vec<(f64, f64)>>) -> Self {
        contours.into_iter().map(Contour::new).collect()
    }
}

/// A triangle strip: every three consecutive points form a triangle.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Strip {
    /// The strip's vertices.
    pub points: Vec<Point>,
}

impl Strip {
    /// The triangles making up this strip, in order.
    pub fn triangles(&self) -> impl Iterator<Item = [Point; 3]> + '_ {
        self.points.windows(3).map(|w| [w[0], w[1], w[2]])
    }
}

/// A collection of triangle strips covering some region.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Mesh {
    /// The strips, in order.
    pub strips: Vec<Strip>,
}

impl Mesh {
    /// Does this mesh have no strips?
    pub fn is_empty(&self) -> bool {
        self.strips.is_empty()
    }

    /// The total number of triangles over all strips.
    pub fn triangle_count(&self) -> usize {
        self.strips
            .iter()
            .map(|s| s.points.len().saturating_sub(2))
            .sum()
    }

    /// The covered area: the sum of the unsigned areas of all triangles.
    pub fn area(&self) -> f64 {
        self.strips
            .iter()
            .flat_map(Strip::triangles)
            .map(|[a, b, c]| ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() / 2.0)
            .sum()
    }
}

#[cfg(feature = "debug-svg")]
mod debug_svg {
    use super::{Mesh, Point, Polygon};
    use svg::node::element::{path::Data, Path};

    fn view_box(rect: Option<kurbo::Rect>) -> (f64, f64, f64, f64) {
        let rect = rect.unwrap_or_default();
        let pad = (rect.width().max(rect.height()) / 32.0).max(1.0);
        (
            rect.min_x() - pad,
            rect.min_y() - pad,
            rect.width() + 2.0 * pad,
            rect.height() + 2.0 * pad,
        )
    }

    fn ring(mut data: Data, points: &[Point]) -> Data {
        if let Some((first, rest)) = points.split_first() {
            data = data.move_to((first.x, first.y));
            for p in rest {
                data = data.line_to((p.x, p.y));
            }
            data = data.close();
        }
        data
    }

    impl Polygon {
        /// Renders this polygon as an SVG document, outer contours in one
        /// color and holes in another.
        pub fn dump_svg(&self) -> svg::Document {
            let (x, y, w, h) = view_box(self.bounding_box());
            let stroke_width = w.max(h) / 512.0;
            let mut doc = svg::Document::new().set("viewBox", (x, y, w, h));
            for contour in &self.contours {
                let path = Path::new()
                    .set("d", ring(Data::new(), &contour.points))
                    .set("stroke", "black")
                    .set("stroke-width", stroke_width)
                    .set("stroke-linejoin", "round")
                    .set("opacity", 0.5)
                    .set("fill", if contour.is_hole { "white" } else { "pink" });
                doc = doc.add(path);
            }
            doc
        }
    }

    impl Mesh {
        /// Renders every triangle of this mesh as an outlined SVG path.
        pub fn dump_svg(&self) -> svg::Document {
            let bbox = self
                .strips
                .iter()
                .flat_map(|s| s.points.iter())
                .fold(None::<kurbo::Rect>, |rect, p| {
                    let p = p.to_kurbo();
                    Some(match rect {
                        Some(r) => r.union_pt(p),
                        None => kurbo::Rect::from_points(p, p),
                    })
                });
            let (x, y, w, h) = view_box(bbox);
            let stroke_width = w.max(h) / 512.0;
            let mut doc = svg::Document::new().set("viewBox", (x, y, w, h));
            for strip in &self.strips {
                let mut data = Data::new();
                for tri in strip.triangles() {
                    data = ring(data, &tri);
                }
                let path = Path::new()
                    .set("d", data)
                    .set("stroke", "black")
                    .set("stroke-width", stroke_width)
                    .set("stroke-linejoin", "round")
                    .set("fill", "lightblue");
                doc = doc.add(path);
            }
            doc
        }
    }
}
