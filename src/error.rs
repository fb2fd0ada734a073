use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for mesh loading and saving.
#[derive(Debug, Error)]
pub enum FacekitError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Errors raised while touching the filesystem.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where in the input an error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// 1-based line of a text format.
    Line(usize),
    /// 0-based face object of a JSON document.
    Face(usize),
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Line(line) => write!(f, "line {line}"),
            Self::Face(face) => write!(f, "face {face}"),
        }
    }
}

/// Structural mismatch against the grammar of a format.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("file format is not supported: expected first line {expected:?}, found {found:?}")]
    HeaderMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: file is corrupted, expected {expected}, found {found:?}")]
    UnexpectedStatement {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: unexpected end of file, expected {expected}")]
    UnexpectedEof { line: usize, expected: &'static str },

    #[error("{at}: unexpected number of components in {what}: expected {expected}, found {found}")]
    Arity {
        at: Location,
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{at}: face has {found} vertices, at least 3 are required")]
    TooFewVertices { at: Location, found: usize },

    #[error("line {line}: face mixes references with and without normal indices")]
    MixedNormals { line: usize },

    #[error("{at}: '{field}' must be {expected}")]
    FieldType {
        at: Location,
        field: &'static str,
        expected: &'static str,
    },

    #[error("malformed json: {message}")]
    Json { message: String },

    #[error("json root must be an array of faces")]
    NotAnArray,

    #[error("face {face}: expected a json object")]
    NotAnObject { face: usize },

    #[error("unsupported file extension {extension:?} (expected json, stl or obj)")]
    UnsupportedExtension { extension: String },
}

/// A token that should be numeric is not.
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("{at}: the definition of a {what} contains non-digit characters: {text:?}")]
    NonDigit {
        at: Location,
        what: &'static str,
        text: String,
    },

    #[error("{at}: invalid number {token} in {what}")]
    InvalidNumber {
        at: Location,
        what: &'static str,
        token: String,
    },
}

/// Which OBJ buffer an index was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Position,
    Normal,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Position => f.write_str("vertex"),
            Self::Normal => f.write_str("normal"),
        }
    }
}

/// An OBJ index that falls outside the declared buffers.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("line {line}: {kind} index {index} is out of range (1..={len})")]
    OutOfRange {
        line: usize,
        kind: ReferenceKind,
        index: i64,
        len: usize,
    },
}

/// A JSON face object lacks a required field.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("face {face}: missing field '{field}'")]
    MissingField { face: usize, field: &'static str },
}

/// Convenience type alias for results using [`FacekitError`].
pub type Result<T> = std::result::Result<T, FacekitError>;
