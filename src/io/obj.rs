use std::path::Path;

use tracing::{debug, info};

use crate::error::{FormatError, Location, ReferenceError, ReferenceKind, Result};
use crate::math::{Point3, Vector3};
use crate::mesh::{Face, FaceCollection};

use super::numeric::{
    check_numeric_charset, parse_index, parse_triple, parse_triple_with_optional,
};

/// Running buffers of declared positions and normals.
#[derive(Debug, Default)]
struct ObjBuffers {
    positions: Vec<Point3>,
    normals: Vec<Vector3>,
}

/// Resolves a 1-based OBJ index against a buffer.
fn resolve<T: Copy>(buffer: &[T], index: i64, kind: ReferenceKind, line: usize) -> Result<T> {
    usize::try_from(index)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| buffer.get(i))
        .copied()
        .ok_or_else(|| {
            ReferenceError::OutOfRange {
                line,
                kind,
                index,
                len: buffer.len(),
            }
            .into()
        })
}

impl ObjBuffers {
    /// Builds a face from the text following an `f` directive.
    fn face(&self, body: &str, line: usize) -> Result<Face> {
        check_numeric_charset(body, line, "face")?;

        let mut vertices = Vec::new();
        let mut normal = Vec::new();
        for corner in body.split_whitespace() {
            let parts: Vec<&str> = corner.split('/').collect();
            if parts.len() > 3 {
                return Err(FormatError::Arity {
                    at: Location::Line(line),
                    what: "face reference",
                    expected: 3,
                    found: parts.len(),
                }
                .into());
            }

            let vi = parse_index(parts[0], line, "face")?;
            vertices.push(resolve(&self.positions, vi, ReferenceKind::Position, line)?);

            if let Some(tex) = parts.get(1).filter(|t| !t.is_empty()) {
                parse_index(tex, line, "face")?;
            }

            if let Some(nrm) = parts.get(2).filter(|n| !n.is_empty()) {
                let ni = parse_index(nrm, line, "face")?;
                normal.push(resolve(&self.normals, ni, ReferenceKind::Normal, line)?);
            }
        }

        if vertices.len() < 3 {
            return Err(FormatError::TooFewVertices {
                at: Location::Line(line),
                found: vertices.len(),
            }
            .into());
        }
        if !normal.is_empty() && normal.len() != vertices.len() {
            return Err(FormatError::MixedNormals { line }.into());
        }

        Ok(Face::new(vertices, normal))
    }
}

/// Parses Wavefront OBJ text in a single pass.
///
/// Only `v`, `vn` and `f` directives are read; all others are skipped. A `v`
/// line may carry a fourth weight component, which is dropped. Faces may
/// have any number of corners, each `v`, `v/vt`, `v//vn` or `v/vt/vn` with
/// 1-based indices referring only to positions and normals declared on
/// earlier lines. Texture indices are validated and discarded.
///
/// # Errors
///
/// Returns a [`ReferenceError`] for indices outside the declared buffers,
/// a [`ValueError`](crate::error::ValueError) for malformed numbers and a
/// [`FormatError`] for faces with fewer than 3 corners or inconsistent normals.
pub fn parse_obj(text: &str) -> Result<FaceCollection> {
    let mut buffers = ObjBuffers::default();
    let mut faces = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim_start();
        let (directive, body) = trimmed
            .split_once(char::is_whitespace)
            .unwrap_or((trimmed, ""));

        match directive {
            "v" => {
                let [x, y, z] = parse_triple_with_optional(body, line, "vertex", 1)?;
                buffers.positions.push(Point3::new(x, y, z));
            }
            "vn" => {
                let [x, y, z] = parse_triple(body, line, "normal")?;
                buffers.normals.push(Vector3::new(x, y, z));
            }
            "f" => faces.push(buffers.face(body, line)?),
            _ => {}
        }
    }

    debug!(
        positions = buffers.positions.len(),
        normals = buffers.normals.len(),
        "obj buffers filled"
    );
    Ok(FaceCollection::from(faces))
}

/// Loads an OBJ file.
///
/// # Errors
///
/// Returns an [`IoError`](crate::error::IoError) if the file cannot be read,
/// otherwise the errors of [`parse_obj`].
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<FaceCollection> {
    let path = path.as_ref();
    let text = super::read_source(path)?;
    let faces = parse_obj(&text)?;
    info!(path = %path.display(), faces = faces.len(), "loaded obj");
    Ok(faces)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{FacekitError, ValueError};

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\n";

    #[test]
    fn plain_triangle_has_no_normals() {
        let faces = parse_obj(&format!("{TRIANGLE}f 1 2 3\n")).unwrap();
        assert_eq!(faces.len(), 1);
        let face = &faces.faces[0];
        assert_eq!(
            face.vertices,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0)
            ]
        );
        assert!(!face.has_normals());
        assert_eq!(face.label, 0);
    }

    #[test]
    fn normal_indices_give_per_vertex_normals() {
        let text = format!("{TRIANGLE}vn 0 0 1\nf 1//1 2//1 3//1\n");
        let face = &parse_obj(&text).unwrap().faces[0];
        assert_eq!(face.normal, vec![Vector3::new(0.0, 0.0, 1.0); 3]);
        assert!(face.has_normals());
    }

    #[test]
    fn texture_indices_are_discarded() {
        let text = format!("{TRIANGLE}vt 0 0\nvn 0 0 1\nf 1/1/1 2/1/1 3/1/1\n");
        let face = &parse_obj(&text).unwrap().faces[0];
        assert_eq!(face.vertices.len(), 3);
        assert_eq!(face.normal.len(), 3);

        let text = format!("{TRIANGLE}f 1/4 2/5 3/6\n");
        let face = &parse_obj(&text).unwrap().faces[0];
        assert!(!face.has_normals());
    }

    #[test]
    fn polygons_of_any_arity() {
        let text = "v 0 0 0\nv 1 0 0\nv 2 1 0\nv 1 2 0\nv 0 1 0\nf 1 2 3 4 5\n";
        let face = &parse_obj(text).unwrap().faces[0];
        assert_eq!(face.vertices.len(), 5);
    }

    #[test]
    fn skips_comments_and_unknown_directives() {
        let text = format!("# comment\no thing\ng group\ns off\n{TRIANGLE}usemtl red\nf 1 2 3\n");
        assert_eq!(parse_obj(&text).unwrap().len(), 1);
    }

    #[test]
    fn tolerates_crlf_and_extra_spaces() {
        let text = "v  0 0 0\r\nv 1 0 0\r\nv 0 1 0\r\nf 1 2 3 \r\n";
        assert_eq!(parse_obj(text).unwrap().faces[0].vertices.len(), 3);
    }

    #[test]
    fn out_of_range_vertex_index() {
        let err = parse_obj(&format!("{TRIANGLE}f 1 2 4\n")).unwrap_err();
        assert!(matches!(
            err,
            FacekitError::Reference(ReferenceError::OutOfRange {
                kind: ReferenceKind::Position,
                index: 4,
                len: 3,
                line: 4,
            })
        ));
    }

    #[test]
    fn zero_index_is_out_of_range() {
        let err = parse_obj(&format!("{TRIANGLE}f 0 1 2\n")).unwrap_err();
        assert!(matches!(err, FacekitError::Reference(_)));
    }

    #[test]
    fn normal_must_be_declared_before_use() {
        let err = parse_obj(&format!("{TRIANGLE}f 1//1 2//1 3//1\nvn 0 0 1\n")).unwrap_err();
        assert!(matches!(
            err,
            FacekitError::Reference(ReferenceError::OutOfRange {
                kind: ReferenceKind::Normal,
                ..
            })
        ));
    }

    #[test]
    fn malformed_vertex_is_value_error() {
        let err = parse_obj("v 0 zero 0\n").unwrap_err();
        assert!(matches!(err, FacekitError::Value(ValueError::NonDigit { .. })));
        let err = parse_obj("v 0 1..2 0\n").unwrap_err();
        assert!(matches!(err, FacekitError::Value(ValueError::InvalidNumber { .. })));
    }

    #[test]
    fn vertex_weight_is_ignored() {
        let text = "v 0 0 0 1\nv 1 0 0 1.0\nv 0 1 0\nf 1 2 3\n";
        let face = &parse_obj(text).unwrap().faces[0];
        assert_eq!(face.vertices[1], Point3::new(1.0, 0.0, 0.0));

        let err = parse_obj("v 0 0 0 1 2\n").unwrap_err();
        assert!(matches!(
            err,
            FacekitError::Format(FormatError::Arity { found: 5, .. })
        ));
        assert!(matches!(
            parse_obj("vn 0 0 1 0\n").unwrap_err(),
            FacekitError::Format(FormatError::Arity { found: 4, .. })
        ));
    }

    #[test]
    fn two_corner_face_is_rejected() {
        let err = parse_obj(&format!("{TRIANGLE}f 1 2\n")).unwrap_err();
        assert!(matches!(
            err,
            FacekitError::Format(FormatError::TooFewVertices { found: 2, .. })
        ));
    }

    #[test]
    fn mixed_normal_references_are_rejected() {
        let err = parse_obj(&format!("{TRIANGLE}vn 0 0 1\nf 1//1 2 3//1\n")).unwrap_err();
        assert!(matches!(
            err,
            FacekitError::Format(FormatError::MixedNormals { line: 5 })
        ));
    }

    #[test]
    fn too_many_slashes() {
        let err = parse_obj(&format!("{TRIANGLE}f 1/1/1/1 2 3\n")).unwrap_err();
        assert!(matches!(
            err,
            FacekitError::Format(FormatError::Arity { found: 4, .. })
        ));
    }
}
