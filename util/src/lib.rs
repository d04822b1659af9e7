use beamclip::{Contour, Mesh, Point, Polygon};
use kurbo::BezPath;
use std::path::{Path, PathBuf};

/// Parses SVG path data into a polygon, one contour per subpath.
///
/// Curves are flattened to within `tolerance`.
pub fn svg_path_to_polygon(data: &str, tolerance: f64) -> Result<Polygon, kurbo::SvgParseError> {
    let path = BezPath::from_svg(data)?;
    Ok(Polygon::from_bez_path(&path, tolerance))
}

/// Are the two rings the same, up to a choice of starting point?
///
/// Coordinates are compared with an absolute tolerance of `eps`.
pub fn same_ring(a: &[Point], b: &[Point], eps: f64) -> bool {
    if a.len() != b.len() {
        return false;
    }
    if a.is_empty() {
        return true;
    }
    let close = |p: &Point, q: &Point| (p.x - q.x).abs() <= eps && (p.y - q.y).abs() <= eps;
    (0..b.len()).any(|start| {
        a.iter()
            .zip(b[start..].iter().chain(&b[..start]))
            .all(|(p, q)| close(p, q))
    })
}

/// Do the two polygons have the same contours, in any order and each with
/// any starting point?
pub fn same_contours(a: &Polygon, b: &Polygon, eps: f64) -> bool {
    if a.contours.len() != b.contours.len() {
        return false;
    }
    let mut unmatched: Vec<&Contour> = b.contours.iter().collect();
    for c in &a.contours {
        let Some(pos) = unmatched
            .iter()
            .position(|d| d.is_hole == c.is_hole && same_ring(&c.points, &d.points, eps))
        else {
            return false;
        };
        unmatched.swap_remove(pos);
    }
    true
}

/// Renders the two inputs and the result of a clip side by side in one SVG
/// document: subject in red, clip in blue, result underneath in black.
pub fn render(subject: &Polygon, clip: &Polygon, result: &Polygon) -> svg::Document {
    use svg::node::element::{path::Data, Path as SvgPath};

    let bbox = [subject, clip, result]
        .iter()
        .filter_map(|p| p.bounding_box())
        .reduce(|a, b| a.union(b))
        .unwrap_or_default();
    let pad = (bbox.width().max(bbox.height()) / 32.0).max(1.0);
    let stroke_width = bbox.width().max(bbox.height()) / 512.0;

    let mut doc = svg::Document::new().set(
        "viewBox",
        (
            bbox.min_x() - pad,
            bbox.min_y() - pad,
            bbox.width() + 2.0 * pad,
            2.0 * bbox.height() + 3.0 * pad,
        ),
    );
    let shift = bbox.height() + pad;
    let layers = [
        (subject, "red", 0.0),
        (clip, "blue", 0.0),
        (result, "black", shift),
    ];
    for (poly, color, dy) in layers {
        let mut data = Data::new();
        for c in &poly.contours {
            if let Some((first, rest)) = c.points.split_first() {
                data = data.move_to((first.x, first.y + dy));
                for p in rest {
                    data = data.line_to((p.x, p.y + dy));
                }
                data = data.close();
            }
        }
        doc = doc.add(
            SvgPath::new()
                .set("d", data)
                .set("stroke", color)
                .set("stroke-width", stroke_width)
                .set("fill", color)
                .set("fill-opacity", 0.2)
                .set("fill-rule", "evenodd"),
        );
    }
    doc
}

/// Renders a clip with [`render`] and writes it to `path`, creating parent
/// directories as needed.
pub fn save_render(
    path: &Path,
    subject: &Polygon,
    clip: &Polygon,
    result: &Polygon,
) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    svg::save(path, &render(subject, clip, result))
}

/// Writes the triangles of a mesh to `path` as SVG.
pub fn save_mesh(path: &Path, mesh: &Mesh) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    svg::save(path, &mesh.dump_svg())
}

/// Where to put debugging output for a test input.
pub fn debug_output_path_for(input_path: &Path) -> PathBuf {
    let mut ws: PathBuf = std::env::var_os("CARGO_MANIFEST_DIR")
        .unwrap_or_else(|| ".".into())
        .into();
    ws.push("target/debug-svg");
    ws.push(input_path.file_name().unwrap_or(input_path.as_os_str()));
    ws.set_extension("svg");
    ws
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: &[(f64, f64)]) -> Vec<Point> {
        v.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn rings_up_to_rotation() {
        let a = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let b = pts(&[(1.0, 1.0), (0.0, 0.0), (1.0, 0.0)]);
        let reversed = pts(&[(1.0, 1.0), (1.0, 0.0), (0.0, 0.0)]);
        assert!(same_ring(&a, &b, 0.0));
        assert!(!same_ring(&a, &reversed, 0.0));
        assert!(!same_ring(&a, &a[..2], 0.0));
    }

    #[test]
    fn parse_square() {
        let poly = svg_path_to_polygon("M0,0 L2,0 L2,2 L0,2 Z M5,5 L6,5 L6,6 Z", 0.1).unwrap();
        assert_eq!(poly.contours.len(), 2);
        assert_eq!(poly.contours[0].len(), 4);
        assert!(same_contours(&poly, &poly.clone(), 0.0));
    }
}
