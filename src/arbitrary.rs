//! Utilities for fuzz and/or property testing using `arbitrary`.

use arbitrary::Unstructured;

use crate::{BinaryOp, Contour, Point, Polygon};

/// Generate an arbitrary float in some range.
pub fn float_in_range(
    start: f64,
    end: f64,
    u: &mut Unstructured<'_>,
) -> Result<f64, arbitrary::Error> {
    let num: u32 = u.arbitrary()?;
    let t = num as f64 / u32::MAX as f64;
    Ok((1.0 - t) * start + t * end)
}

/// Generate a float in some range, but give it a chance to be equal or very
/// close to another float.
fn another_float_in_range(
    orig: f64,
    start: f64,
    end: f64,
    u: &mut Unstructured<'_>,
) -> Result<f64, arbitrary::Error> {
    match u.int_in_range(0..=3)? {
        0 => Ok(orig),
        1 => {
            let ulps: i32 = u.int_in_range(-32..=32)?;
            let scale = 1.0f64 + ulps as f64 * f64::EPSILON;
            Ok((orig * scale).clamp(start, end))
        }
        _ => float_in_range(start, end, u),
    }
}

/// Generate a point in the square `[-size, size]²`, with a chance of sharing
/// a coordinate with `prev`.
fn point(size: f64, prev: Option<Point>, u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    Ok(match prev {
        Some(p) => Point::new(
            another_float_in_range(p.x, -size, size, u)?,
            another_float_in_range(p.y, -size, size, u)?,
        ),
        None => Point::new(
            float_in_range(-size, size, u)?,
            float_in_range(-size, size, u)?,
        ),
    })
}

/// Generate an arbitrary contour with between 3 and `max_len` vertices.
///
/// Consecutive vertices are biased towards sharing a coordinate, so there
/// are plenty of horizontal and vertical edges. The contour may
/// self-intersect.
pub fn contour(
    size: f64,
    max_len: usize,
    u: &mut Unstructured<'_>,
) -> Result<Contour, arbitrary::Error> {
    let len = u.int_in_range(3..=max_len.max(3))?;
    let mut points = Vec::with_capacity(len);
    let mut prev = None;
    for _ in 0..len {
        let p = point(size, prev, u)?;
        points.push(p);
        prev = Some(p);
    }
    Ok(Contour::new(points))
}

/// Generate an arbitrary contour whose vertices lie on an integer grid.
///
/// Grid contours are much more likely than [`contour`] to have coincident
/// edges and vertices, with each other and with other grid contours.
pub fn grid_contour(
    size: i32,
    max_len: usize,
    u: &mut Unstructured<'_>,
) -> Result<Contour, arbitrary::Error> {
    let len = u.int_in_range(3..=max_len.max(3))?;
    let mut points = Vec::with_capacity(len);
    for _ in 0..len {
        let x = u.int_in_range(-size..=size)?;
        let y = u.int_in_range(-size..=size)?;
        points.push(Point::new(x as f64, y as f64));
    }
    Ok(Contour::new(points))
}

/// Generate an arbitrary polygon with up to `max_contours` contours.
pub fn polygon(max_contours: usize, u: &mut Unstructured<'_>) -> Result<Polygon, arbitrary::Error> {
    let count = u.int_in_range(0..=max_contours)?;
    let grid: bool = u.arbitrary()?;
    (0..count)
        .map(|_| {
            if grid {
                grid_contour(8, 8, u)
            } else {
                contour(1e3, 8, u)
            }
        })
        .collect()
}

/// Generate an arbitrary operation.
pub fn binary_op(u: &mut Unstructured<'_>) -> Result<BinaryOp, arbitrary::Error> {
    Ok(*u.choose(&[
        BinaryOp::Union,
        BinaryOp::Intersection,
        BinaryOp::Xor,
        BinaryOp::Difference,
    ])?)
}
