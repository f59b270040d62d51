use super::{Point3, Vector3, TOLERANCE};

/// Unit normal of the triangle `(a, b, c)` from `(b - a) × (c - b)`.
///
/// Returns `None` for a degenerate (zero-area) triangle.
#[must_use]
pub fn face_normal(a: &Point3, b: &Point3, c: &Point3) -> Option<Vector3> {
    let n = (b - a).cross(&(c - b));
    let len = n.norm();
    if len < TOLERANCE {
        None
    } else {
        Some(n / len)
    }
}

/// Hit test of `point` against the triangle `(a, b, c)`.
///
/// The point must lie within `tolerance` of the triangle's plane and either
/// inside the triangle or within `tolerance` of one of its edges.
#[must_use]
pub fn point_in_triangle(point: &Point3, a: &Point3, b: &Point3, c: &Point3, tolerance: f64) -> bool {
    let Some(normal) = face_normal(a, b, c) else {
        return false;
    };
    if (point - a).dot(&normal).abs() > tolerance {
        return false;
    }

    let side = |p: &Point3, q: &Point3| (q - p).cross(&(point - p)).dot(&normal);
    let (s1, s2, s3) = (side(a, b), side(b, c), side(c, a));
    if s1 >= 0.0 && s2 >= 0.0 && s3 >= 0.0 {
        return true;
    }

    [(a, b), (b, c), (c, a)]
        .iter()
        .any(|(p, q)| distance_to_segment(point, p, q) <= tolerance)
}

/// Distance from `point` to the segment `[p, q]`.
fn distance_to_segment(point: &Point3, p: &Point3, q: &Point3) -> f64 {
    let dir = q - p;
    let len2 = dir.norm_squared();
    if len2 < TOLERANCE {
        return (point - p).norm();
    }
    let t = ((point - p).dot(&dir) / len2).clamp(0.0, 1.0);
    (point - (p + dir * t)).norm()
}
