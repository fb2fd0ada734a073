use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{FormatError, IoError, Location, Result, SchemaError, ValueError};
use crate::math::polygon_3d::unit_normal;
use crate::math::{Point3, Vector3};
use crate::mesh::{Face, FaceCollection, NormalLayout};

/// Fields every face object must carry.
const REQUIRED_FIELDS: [&str; 3] = ["vertices", "normal", "color"];

/// On-disk shape of one face.
#[derive(Debug, Serialize)]
struct FaceRecord {
    vertices: Vec<[f64; 3]>,
    normal: [f64; 3],
    color: f64,
}

impl From<&Face> for FaceRecord {
    fn from(face: &Face) -> Self {
        // Only well-formed normal data is trusted; anything else is recomputed.
        let normal = match (face.normal_layout(), face.first_normal()) {
            (Some(NormalLayout::Flat | NormalLayout::PerVertex), Some(n)) => *n,
            _ => unit_normal(&face.vertices),
        };
        Self {
            vertices: face.vertices.iter().map(|p| [p.x, p.y, p.z]).collect(),
            normal: [normal.x, normal.y, normal.z],
            color: face.color,
        }
    }
}

/// Reads a 3-component numeric array.
fn vector_from_json(value: &Value, face: usize, field: &'static str) -> Result<[f64; 3]> {
    let at = Location::Face(face);
    let items = value.as_array().ok_or(FormatError::FieldType {
        at,
        field,
        expected: "an array of 3 numbers",
    })?;
    if items.len() != 3 {
        return Err(FormatError::Arity {
            at,
            what: field,
            expected: 3,
            found: items.len(),
        }
        .into());
    }

    let mut out = [0.0; 3];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item.as_f64().ok_or_else(|| ValueError::InvalidNumber {
            at,
            what: field,
            token: item.to_string(),
        })?;
    }
    Ok(out)
}

/// Builds one face from its JSON object.
fn face_from_json(object: &Map<String, Value>, face: usize) -> Result<Face> {
    for field in REQUIRED_FIELDS {
        if !object.contains_key(field) {
            return Err(SchemaError::MissingField { face, field }.into());
        }
    }
    let at = Location::Face(face);

    let vertex_list = object["vertices"]
        .as_array()
        .ok_or(FormatError::FieldType {
            at,
            field: "vertices",
            expected: "an array of vertices",
        })?;
    let vertices = vertex_list
        .iter()
        .map(|v| vector_from_json(v, face, "vertices").map(|[x, y, z]| Point3::new(x, y, z)))
        .collect::<Result<Vec<_>>>()?;
    if vertices.len() < 3 {
        return Err(FormatError::TooFewVertices {
            at,
            found: vertices.len(),
        }
        .into());
    }

    let [nx, ny, nz] = vector_from_json(&object["normal"], face, "normal")?;

    let color_value = &object["color"];
    let color = color_value.as_f64().ok_or_else(|| ValueError::InvalidNumber {
        at,
        what: "color",
        token: color_value.to_string(),
    })?;

    let mut result = Face::new(vertices, vec![Vector3::new(nx, ny, nz)]);
    result.color = color;
    Ok(result)
}

/// Parses a JSON array of face objects.
///
/// ```json
/// [
///   { "vertices": [[0, 0, 0], [1, 0, 0], [1, 1, 0]], "normal": [0, 0, 1], "color": 0.8 }
/// ]
/// ```
///
/// Labels are not part of the format; every face starts unlabeled.
///
/// # Errors
///
/// Returns a [`SchemaError`] for a missing field, a [`FormatError`] for
/// malformed JSON or wrong array sizes, and a [`ValueError`] for non-numeric
/// components.
pub fn parse_json(text: &str) -> Result<FaceCollection> {
    let document: Value = serde_json::from_str(text).map_err(|e| FormatError::Json {
        message: e.to_string(),
    })?;
    let entries = document.as_array().ok_or(FormatError::NotAnArray)?;

    let mut faces = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let object = entry
            .as_object()
            .ok_or(FormatError::NotAnObject { face: idx })?;
        faces.push(face_from_json(object, idx)?);
    }
    debug!(faces = faces.len(), "json faces decoded");
    Ok(FaceCollection::from(faces))
}

/// Loads a JSON face list.
///
/// # Errors
///
/// Returns an [`IoError`] if the file cannot be read, otherwise the errors
/// of [`parse_json`].
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<FaceCollection> {
    let path = path.as_ref();
    let text = super::read_source(path)?;
    let faces = parse_json(&text)?;
    info!(path = %path.display(), faces = faces.len(), "loaded json");
    Ok(faces)
}

/// Encodes a collection as a pretty-printed JSON face list.
///
/// Faces without normal data are written with their Newell normal.
///
/// # Errors
///
/// Returns a [`FormatError::Json`] if serialization fails.
pub fn to_json_string(faces: &FaceCollection) -> Result<String> {
    let records: Vec<FaceRecord> = faces.iter().map(FaceRecord::from).collect();
    serde_json::to_string_pretty(&records).map_err(|e| {
        FormatError::Json {
            message: e.to_string(),
        }
        .into()
    })
}

/// Writes a collection to `path` as a JSON face list.
///
/// # Errors
///
/// Returns an [`IoError::Write`] if the file cannot be written.
pub fn save_json<P: AsRef<Path>>(faces: &FaceCollection, path: P) -> Result<()> {
    let path = path.as_ref();
    let text = to_json_string(faces)?;
    std::fs::write(path, text).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), faces = faces.len(), "saved json");
    Ok(())
}
