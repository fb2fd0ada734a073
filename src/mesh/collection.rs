use crate::operations::ComponentLabels;

use super::face::{Face, UNLABELED};

/// An ordered set of faces forming one mesh.
///
/// Face order is the order of the source file; later operations refer to
/// faces by their index in [`FaceCollection::faces`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceCollection {
    /// The faces, in file order.
    pub faces: Vec<Face>,
}

impl FaceCollection {
    /// Creates a new, empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of faces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Returns `true` if there are no faces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Iterates the faces in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Face> {
        self.faces.iter()
    }

    /// Returns `true` if every face has been assigned a component.
    #[must_use]
    pub fn is_fully_labeled(&self) -> bool {
        self.faces.iter().all(|f| f.label != UNLABELED)
    }

    /// Writes a label assignment back into the `label` field of each face.
    ///
    /// Faces beyond the length of `labels` keep their current label.
    pub fn apply_labels(&mut self, labels: &ComponentLabels) {
        for (face, &label) in self.faces.iter_mut().zip(labels.as_slice()) {
            face.label = label;
        }
    }

    /// Resets every label to [`UNLABELED`].
    pub fn clear_labels(&mut self) {
        for face in &mut self.faces {
            face.label = UNLABELED;
        }
    }
}

impl From<Vec<Face>> for FaceCollection {
    fn from(faces: Vec<Face>) -> Self {
        Self { faces }
    }
}

impl<'a> IntoIterator for &'a FaceCollection {
    type Item = &'a Face;
    type IntoIter = std::slice::Iter<'a, Face>;

    fn into_iter(self) -> Self::IntoIter {
        self.faces.iter()
    }
}
