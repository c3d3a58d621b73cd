use crate::shared::detection_record::DetectionRecord;
use crate::shared::frame::Frame;

/// Domain interface for blob detection on a single frame.
///
/// Detection never fails: invalid or empty input yields an empty list.
/// Implementations hold no per-frame state, hence `&self`.
pub trait BlobDetector: Send + Sync {
    fn predict(&self, frame: Option<&Frame>) -> Vec<DetectionRecord>;
}
