use super::{Matrix4, Point3, Vector3};

/// Transforms a direction vector by a 4x4 matrix (ignoring translation).
///
/// Column-vector convention: the result is `M * [dir, 0]`.
#[must_use]
pub fn transform_direction(matrix: &Matrix4, dir: &Vector3) -> Vector3 {
    let v = matrix * nalgebra::Vector4::new(dir.x, dir.y, dir.z, 0.0);
    Vector3::new(v.x, v.y, v.z)
}

/// Returns the view-space depth `z'` and homogeneous divisor `w'` of a point,
/// i.e. the responses of the matrix's third and fourth rows.
#[must_use]
pub fn depth_and_divisor(matrix: &Matrix4, point: &Point3) -> (f64, f64) {
    let z = matrix[(2, 0)] * point.x
        + matrix[(2, 1)] * point.y
        + matrix[(2, 2)] * point.z
        + matrix[(2, 3)];
    let w = matrix[(3, 0)] * point.x
        + matrix[(3, 1)] * point.y
        + matrix[(3, 2)] * point.z
        + matrix[(3, 3)];
    (z, w)
}
