use crate::detection::domain::component_labeler::{Centroid, ComponentStats, Labeling};
use crate::shared::detection_record::{BoundingBox, DetectionRecord};

/// Converts labeler output into detection records.
pub struct DetectionFormatter;

impl DetectionFormatter {
    pub fn new() -> Self {
        Self
    }

    /// One record per label in `1..component_count`, ascending.
    ///
    /// Label 0 is the background and is never emitted.
    pub fn format(
        &self,
        component_count: usize,
        stats: &[ComponentStats],
        centroids: &[Centroid],
        frame_id: u64,
    ) -> Vec<DetectionRecord> {
        debug_assert!(stats.len() >= component_count && centroids.len() >= component_count);
        (1..component_count)
            .map(|label| {
                let s = &stats[label];
                DetectionRecord {
                    bbox: BoundingBox::new(s.left, s.top, s.width, s.height),
                    area: s.area,
                    centroid: centroids[label],
                    frame_id,
                }
            })
            .collect()
    }

    pub fn format_labeling(&self, labeling: &Labeling, frame_id: u64) -> Vec<DetectionRecord> {
        self.format(
            labeling.component_count,
            &labeling.stats,
            &labeling.centroids,
            frame_id,
        )
    }
}

impl Default for DetectionFormatter {
    fn default() -> Self {
        Self::new()
    }
}
