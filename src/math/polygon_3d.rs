use super::{Point3, Vector3, TOLERANCE};

/// Computes the (unnormalized) polygon normal using Newell's method.
///
/// Works for non-planar and non-convex polygons; the magnitude equals twice
/// the projected area. Returns the zero vector for fewer than 3 points.
#[must_use]
pub fn newell_normal(points: &[Point3]) -> Vector3 {
    let n = points.len();
    let mut normal = Vector3::zeros();
    if n < 3 {
        return normal;
    }
    for i in 0..n {
        let curr = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }
    normal
}

/// Unit polygon normal, or the zero vector for degenerate polygons.
#[must_use]
pub fn unit_normal(points: &[Point3]) -> Vector3 {
    let normal = newell_normal(points);
    let len = normal.norm();
    if len < TOLERANCE {
        Vector3::zeros()
    } else {
        normal / len
    }
}

/// Average of all vertex positions. Returns `None` for an empty slice.
#[must_use]
pub fn vertex_centroid(points: &[Point3]) -> Option<Point3> {
    if points.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let inv_n = 1.0 / points.len() as f64;
    Some(Point3::new(
        points.iter().map(|p| p.x).sum::<f64>() * inv_n,
        points.iter().map(|p| p.y).sum::<f64>() * inv_n,
        points.iter().map(|p| p.z).sum::<f64>() * inv_n,
    ))
}

/// Midpoint of the first and third vertex: the centre of a quadrilateral's
/// diagonal. Returns `None` for fewer than 3 points.
#[must_use]
pub fn diagonal_midpoint(points: &[Point3]) -> Option<Point3> {
    match (points.first(), points.get(2)) {
        (Some(a), Some(c)) => Some(nalgebra::center(a, c)),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn unit_square() -> Vec<Point3> {
        vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn ccw_square_normal_points_up() {
        let n = unit_normal(&unit_square());
        assert_relative_eq!(n, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn newell_magnitude_is_twice_area() {
        let n = newell_normal(&unit_square());
        assert_relative_eq!(n.norm(), 2.0);
    }

    #[test]
    fn collinear_points_have_zero_normal() {
        let pts = vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)];
        assert_relative_eq!(unit_normal(&pts), Vector3::zeros());
    }

    #[test]
    fn diagonal_midpoint_of_square_is_centre() {
        let mid = diagonal_midpoint(&unit_square()).unwrap();
        assert_relative_eq!(mid, p(0.5, 0.5, 0.0));
    }

    #[test]
    fn diagonal_midpoint_differs_from_centroid_for_pentagon() {
        let mut pts = unit_square();
        pts.push(p(0.0, 5.0, 0.0));
        let diag = diagonal_midpoint(&pts).unwrap();
        let avg = vertex_centroid(&pts).unwrap();
        assert_relative_eq!(diag, p(0.5, 0.5, 0.0));
        assert_relative_eq!(avg, p(0.4, 1.4, 0.0));
    }

    #[test]
    fn centroid_of_empty_is_none() {
        assert!(vertex_centroid(&[]).is_none());
        assert!(diagonal_midpoint(&[p(0.0, 0.0, 0.0)]).is_none());
    }
}
