use crate::mesh::FaceCollection;

/// Uniform scale that brings the collection's depth range into `[-1, 1]`.
///
/// Only the first vertex of each face is sampled. Returns `None` for an
/// empty collection or when every sample lies at `z = 0`.
#[must_use]
pub fn fit_scale(faces: &FaceCollection) -> Option<f64> {
    let (min_z, max_z) = faces
        .iter()
        .filter_map(|f| f.vertices.first())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v.z, v.z)),
            Some((lo, hi)) => Some((lo.min(v.z), hi.max(v.z))),
        })?;
    let extent = min_z.abs().max(max_z.abs());
    (extent > 0.0).then(|| 1.0 / extent)
}
