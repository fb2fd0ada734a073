pub mod collection;
pub mod face;

pub use collection::FaceCollection;
pub use face::{Face, NormalLayout, UNLABELED};
