use crate::math::{Point3, Vector3};

/// Label value meaning "not yet assigned to a component".
pub const UNLABELED: u32 = 0;

/// How the normal data of a face relates to its vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalLayout {
    /// No normal data.
    None,
    /// A single normal shared by every vertex.
    Flat,
    /// One normal per vertex, parallel to `vertices`.
    PerVertex,
}

/// A planar polygon with optional normals, a grey intensity and a component label.
///
/// Vertex order defines the winding and the edges used for adjacency.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Ordered polygon corners.
    pub vertices: Vec<Point3>,
    /// Empty, one flat normal, or one normal per vertex.
    pub normal: Vec<Vector3>,
    /// Intensity in nominally `[0, 1]`.
    pub color: f64,
    /// Component label; [`UNLABELED`] until the labeler has run.
    pub label: u32,
}

impl Face {
    /// Creates an unlabeled face with the default intensity of `1.0`.
    #[must_use]
    pub fn new(vertices: Vec<Point3>, normal: Vec<Vector3>) -> Self {
        Self {
            vertices,
            normal,
            color: 1.0,
            label: UNLABELED,
        }
    }

    /// Returns `true` if the face carries any normal data.
    #[must_use]
    pub fn has_normals(&self) -> bool {
        !self.normal.is_empty()
    }

    /// The first normal, used as the face normal by the facing test.
    #[must_use]
    pub fn first_normal(&self) -> Option<&Vector3> {
        self.normal.first()
    }

    /// Classifies the normal data. Lengths other than 0, 1 or the vertex
    /// count are not produced by the parsers and report `None`.
    #[must_use]
    pub fn normal_layout(&self) -> Option<NormalLayout> {
        match self.normal.len() {
            0 => Some(NormalLayout::None),
            1 => Some(NormalLayout::Flat),
            n if n == self.vertices.len() => Some(NormalLayout::PerVertex),
            _ => None,
        }
    }

    /// Iterates the directed edges of the polygon, closing the loop from the
    /// last vertex back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (&Point3, &Point3)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |k| (&self.vertices[k], &self.vertices[(k + 1) % n]))
    }
}
