pub mod display;
pub mod error;
pub mod io;
pub mod math;
pub mod mesh;
pub mod operations;

pub use error::{FacekitError, Result};
pub use io::load_faces;
pub use mesh::{Face, FaceCollection};
