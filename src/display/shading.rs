use crate::mesh::Face;

/// Colours cycled through by component label.
pub const PALETTE: [[f32; 3]; 8] = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [0.3, 0.7, 0.2],
    [0.5, 0.2, 0.9],
];

/// Palette entry for a component label.
#[must_use]
pub fn palette_color(label: u32) -> [f32; 3] {
    PALETTE[label as usize % PALETTE.len()]
}

/// RGBA fill colour of a face.
///
/// When `colorize` is set the colour comes from the face's label, otherwise
/// the face intensity is used as a grey level.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn face_rgba(face: &Face, colorize: bool, alpha: f32) -> [f32; 4] {
    let [r, g, b] = if colorize {
        palette_color(face.label)
    } else {
        let c = face.color as f32;
        [c, c, c]
    };
    [r, g, b, alpha]
}
