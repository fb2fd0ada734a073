use std::path::Path;

use tracing::{debug, info};

use crate::error::{FacekitError, FormatError, Result};
use crate::math::{Point3, Vector3};
use crate::mesh::{Face, FaceCollection};

use super::numeric::parse_triple;

/// Required first line of the file.
const HEADER: &str = "solid Onshape";

/// A keyword expected at a fixed byte column of a line.
#[derive(Debug, Clone, Copy)]
struct Keyword {
    text: &'static str,
    column: usize,
}

impl Keyword {
    const fn new(text: &'static str, column: usize) -> Self {
        Self { text, column }
    }

    /// Returns `true` if the line holds this keyword at its column.
    fn matches(self, line: &str) -> bool {
        line.get(self.column..self.column + self.text.len()) == Some(self.text)
    }

    /// The text after the keyword, or `""` if the line ends there.
    fn remainder(self, line: &str) -> &str {
        line.get(self.column + self.text.len()..).unwrap_or("")
    }
}

const FACET_NORMAL: Keyword = Keyword::new("facet normal", 2);
const END_SOLID: Keyword = Keyword::new("endsolid Onshape", 0);
const OUTER_LOOP: Keyword = Keyword::new("outer loop", 4);
const VERTEX: Keyword = Keyword::new("vertex", 6);
const END_LOOP: Keyword = Keyword::new("endloop", 4);
const END_FACET: Keyword = Keyword::new("endfacet", 2);

/// Number of `vertex` statements inside one `outer loop`.
const VERTICES_PER_FACET: usize = 3;

/// Position of the reader within the statement grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Header,
    ExpectFacetOrEnd,
    ExpectOuterLoop,
    /// Waiting for the vertex with this 0-based position in the loop.
    ExpectVertex(usize),
    ExpectEndLoop,
    ExpectEndFacet,
    Finished,
}

impl State {
    /// What the reader wants next, for error messages.
    fn expectation(self) -> &'static str {
        match self {
            Self::Header => "'solid Onshape'",
            Self::ExpectFacetOrEnd => "'facet normal' or 'endsolid Onshape'",
            Self::ExpectOuterLoop => "an outer loop after the normal vector",
            Self::ExpectVertex(_) => "a vertex in the outer loop",
            Self::ExpectEndLoop => "an endloop statement",
            Self::ExpectEndFacet => "an endfacet statement",
            Self::Finished => "nothing",
        }
    }
}

/// Line-driven state machine that accumulates facets.
#[derive(Debug)]
struct StlReader {
    state: State,
    normal: Vector3,
    vertices: Vec<Point3>,
    faces: Vec<Face>,
}

impl StlReader {
    fn new() -> Self {
        Self {
            state: State::Header,
            normal: Vector3::zeros(),
            vertices: Vec::with_capacity(VERTICES_PER_FACET),
            faces: Vec::new(),
        }
    }

    /// Consumes one line. `line_no` is 1-based.
    fn feed(&mut self, line_no: usize, line: &str) -> Result<()> {
        self.state = match self.state {
            State::Header => {
                if line != HEADER {
                    return Err(FormatError::HeaderMismatch {
                        expected: HEADER,
                        found: line.to_owned(),
                    }
                    .into());
                }
                State::ExpectFacetOrEnd
            }
            State::ExpectFacetOrEnd => {
                if FACET_NORMAL.matches(line) {
                    let [x, y, z] = parse_triple(FACET_NORMAL.remainder(line), line_no, "normal")?;
                    self.normal = Vector3::new(x, y, z);
                    self.vertices.clear();
                    State::ExpectOuterLoop
                } else if END_SOLID.matches(line) {
                    State::Finished
                } else {
                    return Err(self.unexpected(line_no, line));
                }
            }
            State::ExpectOuterLoop => {
                self.require(OUTER_LOOP, line_no, line)?;
                State::ExpectVertex(0)
            }
            State::ExpectVertex(n) => {
                self.require(VERTEX, line_no, line)?;
                let [x, y, z] = parse_triple(VERTEX.remainder(line), line_no, "vertex")?;
                self.vertices.push(Point3::new(x, y, z));
                if n + 1 < VERTICES_PER_FACET {
                    State::ExpectVertex(n + 1)
                } else {
                    State::ExpectEndLoop
                }
            }
            State::ExpectEndLoop => {
                self.require(END_LOOP, line_no, line)?;
                State::ExpectEndFacet
            }
            State::ExpectEndFacet => {
                self.require(END_FACET, line_no, line)?;
                let vertices = std::mem::replace(
                    &mut self.vertices,
                    Vec::with_capacity(VERTICES_PER_FACET),
                );
                self.faces.push(Face::new(vertices, vec![self.normal]));
                State::ExpectFacetOrEnd
            }
            State::Finished => State::Finished,
        };
        Ok(())
    }

    fn require(&self, keyword: Keyword, line_no: usize, line: &str) -> Result<()> {
        if keyword.matches(line) {
            Ok(())
        } else {
            Err(self.unexpected(line_no, line))
        }
    }

    fn unexpected(&self, line_no: usize, line: &str) -> FacekitError {
        FormatError::UnexpectedStatement {
            line: line_no,
            expected: self.state.expectation(),
            found: line.to_owned(),
        }
        .into()
    }

    /// Called when input runs out after `last_line` lines.
    fn finish(self, last_line: usize) -> Result<FaceCollection> {
        match self.state {
            State::Finished => Ok(FaceCollection::from(self.faces)),
            State::Header => Err(FormatError::HeaderMismatch {
                expected: HEADER,
                found: String::new(),
            }
            .into()),
            state => Err(FormatError::UnexpectedEof {
                line: last_line + 1,
                expected: state.expectation(),
            }
            .into()),
        }
    }
}

/// Parses ASCII STL text of the single-line-per-statement Onshape dialect.
///
/// ```text
/// solid Onshape
///   facet normal ni nj nk
///     outer loop
///       vertex v1x v1y v1z
///       vertex v2x v2y v2z
///       vertex v3x v3y v3z
///     endloop
///   endfacet
/// endsolid Onshape
/// ```
///
/// Keywords are recognised only at the column shown above. Anything else,
/// including the generic `solid <name>` header of other exporters, is rejected.
///
/// Every face gets one flat normal, three vertices and intensity `1.0`.
/// Lines after `endsolid Onshape` are not inspected.
///
/// # Errors
///
/// Returns a [`FormatError`] for a wrong header, a statement out of place or
/// input ending before `endsolid Onshape`, and a
/// [`ValueError`](crate::error::ValueError) for malformed numbers.
pub fn parse_stl(text: &str) -> Result<FaceCollection> {
    let mut reader = StlReader::new();
    let mut last_line = 0;
    for (idx, line) in text.lines().enumerate() {
        last_line = idx + 1;
        reader.feed(last_line, line)?;
        if reader.state == State::Finished {
            break;
        }
    }
    let faces = reader.finish(last_line)?;
    debug!(lines = last_line, "stl statements consumed");
    Ok(faces)
}

/// Loads an STL file of the Onshape dialect.
///
/// # Errors
///
/// Returns an [`IoError`](crate::error::IoError) if the file cannot be read,
/// otherwise the errors of [`parse_stl`].
pub fn load_stl<P: AsRef<Path>>(path: P) -> Result<FaceCollection> {
    let path = path.as_ref();
    let text = super::read_source(path)?;
    let faces = parse_stl(&text)?;
    info!(path = %path.display(), faces = faces.len(), "loaded stl");
    Ok(faces)
}
