use serde::Serialize;

/// Axis-aligned box given by its top-left corner and size, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// One blob found in one frame.
///
/// Records carry no identity across frames.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetectionRecord {
    pub bbox: BoundingBox,
    pub area: u32,
    pub centroid: (f64, f64),
    pub frame_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_with_expected_keys() {
        let record = DetectionRecord {
            bbox: BoundingBox::new(2, 2, 3, 3),
            area: 9,
            centroid: (3.0, 3.0),
            frame_id: 7,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "bbox": {"x": 2, "y": 2, "w": 3, "h": 3},
                "area": 9,
                "centroid": [3.0, 3.0],
                "frame_id": 7
            })
        );
    }
}
