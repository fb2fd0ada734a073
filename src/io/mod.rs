mod json;
mod numeric;
mod obj;
mod stl;

pub use json::{load_json, parse_json, save_json, to_json_string};
pub use obj::{load_obj, parse_obj};
pub use stl::{load_stl, parse_stl};

use std::path::Path;

use tracing::debug;

use crate::error::{FormatError, IoError, Result};
use crate::mesh::FaceCollection;

/// Mesh file formats understood by [`load_faces`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    /// JSON array of face objects.
    Json,
    /// ASCII STL, Onshape dialect.
    Stl,
    /// Wavefront OBJ.
    Obj,
}

impl MeshFormat {
    /// Maps an extension (without the dot) to a format. Matching is exact.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "json" => Some(Self::Json),
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            _ => None,
        }
    }

    /// Determines the format from a path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::UnsupportedExtension`] if the extension is
    /// missing or not one of `json`, `stl`, `obj`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_extension(&extension)
            .ok_or_else(|| FormatError::UnsupportedExtension { extension }.into())
    }

    /// Parses in-memory text in this format.
    ///
    /// # Errors
    ///
    /// Returns the errors of the matching `parse_*` function.
    pub fn parse(self, text: &str) -> Result<FaceCollection> {
        match self {
            Self::Json => parse_json(text),
            Self::Stl => parse_stl(text),
            Self::Obj => parse_obj(text),
        }
    }
}

/// Loads a mesh, choosing the parser from the file extension.
///
/// # Errors
///
/// Returns a [`FormatError::UnsupportedExtension`] for unknown extensions,
/// an [`IoError`] if the file cannot be read, and otherwise whatever the
/// selected parser reports. No partial collection is ever returned.
pub fn load_faces<P: AsRef<Path>>(path: P) -> Result<FaceCollection> {
    let path = path.as_ref();
    let format = MeshFormat::from_path(path)?;
    debug!(path = %path.display(), ?format, "dispatching loader");
    match format {
        MeshFormat::Json => load_json(path),
        MeshFormat::Stl => load_stl(path),
        MeshFormat::Obj => load_obj(path),
    }
}

/// Reads a whole text file, mapping failures to [`IoError`].
fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::NotFound {
                path: path.to_path_buf(),
            }
            .into()
        } else {
            IoError::Read {
                path: path.to_path_buf(),
                source: e,
            }
            .into()
        }
    })
}
