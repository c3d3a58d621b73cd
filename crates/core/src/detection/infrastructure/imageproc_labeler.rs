use image::Luma;
use imageproc::region_labelling::{self, connected_components};
use ndarray::Array2;

use crate::detection::domain::component_labeler::{ComponentLabeler, Connectivity, Labeling};
use crate::shared::mask::Mask;

/// Labeler backed by `imageproc`'s connected-components pass.
pub struct ImageprocLabeler;

impl ImageprocLabeler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageprocLabeler {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentLabeler for ImageprocLabeler {
    fn label(&self, mask: &Mask, connectivity: Connectivity) -> Labeling {
        let conn = match connectivity {
            Connectivity::Four => region_labelling::Connectivity::Four,
            Connectivity::Eight => region_labelling::Connectivity::Eight,
        };
        let labelled = connected_components(&mask.to_gray_image(), conn, Luma([0u8]));
        let raw = Array2::from_shape_fn((mask.height(), mask.width()), |(y, x)| {
            labelled.get_pixel(x as u32, y as u32)[0]
        });
        Labeling::from_raw_labels(raw)
    }
}
