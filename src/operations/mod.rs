mod labeling;
mod ordering;

pub use labeling::{AdjacencyRule, ComponentLabels, LabelComponents};
pub use ordering::{
    depth_key, is_facing_camera, CentroidRule, DepthOrder, DepthOrderParams, DrawEntry,
    FrameOrder,
};
