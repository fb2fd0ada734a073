mod camera;
mod fit;
mod shading;

pub use camera::Camera;
pub use fit::fit_scale;
pub use shading::{face_rgba, palette_color, PALETTE};
