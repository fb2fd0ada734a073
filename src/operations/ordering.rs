use tracing::trace;

use crate::math::polygon_3d::{diagonal_midpoint, vertex_centroid};
use crate::math::view::{depth_and_divisor, transform_direction};
use crate::math::{Matrix4, Point3, Vector3, TOLERANCE};
use crate::mesh::{Face, FaceCollection};

/// How a face's reference point for depth sorting is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CentroidRule {
    /// Midpoint of vertices 0 and 2: the centre of a quadrilateral.
    #[default]
    Diagonal,
    /// Average of all vertices, for faces of any arity.
    Average,
}

/// Parameters controlling per-frame ordering.
#[derive(Debug, Clone, Copy)]
pub struct DepthOrderParams {
    /// Sort near-to-far and cull faces whose normal points away from the camera.
    pub depth_sort: bool,
    /// Fixed direction the camera looks along, in view space.
    pub camera_direction: Vector3,
    /// Reference point used for the depth key.
    pub centroid: CentroidRule,
}

impl Default for DepthOrderParams {
    fn default() -> Self {
        Self {
            depth_sort: false,
            camera_direction: Vector3::new(0.0, 0.0, -1.0),
            centroid: CentroidRule::Diagonal,
        }
    }
}

/// One face in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawEntry {
    /// Index into the collection.
    pub index: usize,
    /// Whether the face should be drawn.
    pub visible: bool,
}

/// The draw order of a frame. Every face index appears exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameOrder {
    entries: Vec<DrawEntry>,
}

impl FrameOrder {
    /// Entries in draw order.
    #[must_use]
    pub fn as_slice(&self) -> &[DrawEntry] {
        &self.entries
    }

    /// Iterates entries in draw order.
    pub fn iter(&self) -> std::slice::Iter<'_, DrawEntry> {
        self.entries.iter()
    }

    /// Number of entries (equals the face count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` for an empty collection.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indices of faces to draw, in order.
    pub fn visible_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().filter(|e| e.visible).map(|e| e.index)
    }
}

impl<'a> IntoIterator for &'a FrameOrder {
    type Item = &'a DrawEntry;
    type IntoIter = std::slice::Iter<'a, DrawEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Depth key `|z' / w'|` of a face's reference point under `view`.
#[must_use]
pub fn depth_key(face: &Face, view: &Matrix4, rule: CentroidRule) -> f64 {
    let centre = match rule {
        CentroidRule::Diagonal => {
            diagonal_midpoint(&face.vertices).or_else(|| vertex_centroid(&face.vertices))
        }
        CentroidRule::Average => vertex_centroid(&face.vertices),
    }
    .unwrap_or_else(Point3::origin);
    let (z, w) = depth_and_divisor(view, &centre);
    (z / w).abs()
}

/// Returns `true` unless the face's first normal, rotated into view space
/// (`R * n` with `R` the upper 3x3 of `view`), makes an angle of more than
/// 90 degrees with `camera_direction`.
///
/// Faces without normals always pass.
#[must_use]
pub fn is_facing_camera(face: &Face, view: &Matrix4, camera_direction: &Vector3) -> bool {
    let Some(normal) = face.first_normal() else {
        return true;
    };
    let rotated = normalized_or_zero(transform_direction(view, normal));
    let camera = normalized_or_zero(*camera_direction);
    let dot = camera.dot(&rotated).clamp(-1.0, 1.0);
    dot.acos().to_degrees() <= 90.0
}

fn normalized_or_zero(v: Vector3) -> Vector3 {
    let len = v.norm();
    if len < TOLERANCE {
        v
    } else {
        v / len
    }
}

/// Orders faces for drawing under a view transform.
///
/// Without depth sorting every face is drawn, farthest-looking key first.
/// With depth sorting the order is ascending by key and faces that point
/// away from the camera are marked invisible. Labels play no part.
pub struct DepthOrder {
    view: Matrix4,
    params: DepthOrderParams,
}

impl DepthOrder {
    /// Creates a new `DepthOrder` operation.
    #[must_use]
    pub fn new(view: Matrix4, params: DepthOrderParams) -> Self {
        Self { view, params }
    }

    /// Executes the ordering, returning one entry per face.
    #[must_use]
    pub fn execute(&self, faces: &FaceCollection) -> FrameOrder {
        let mut keyed: Vec<(f64, usize)> = faces
            .iter()
            .enumerate()
            .map(|(i, face)| (depth_key(face, &self.view, self.params.centroid), i))
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let entries: Vec<DrawEntry> = if self.params.depth_sort {
            keyed
                .iter()
                .map(|&(_, index)| DrawEntry {
                    index,
                    visible: is_facing_camera(
                        &faces.faces[index],
                        &self.view,
                        &self.params.camera_direction,
                    ),
                })
                .collect()
        } else {
            keyed
                .iter()
                .rev()
                .map(|&(_, index)| DrawEntry {
                    index,
                    visible: true,
                })
                .collect()
        };

        trace!(
            faces = entries.len(),
            depth_sort = self.params.depth_sort,
            "frame ordered"
        );
        FrameOrder { entries }
    }
}
