use crate::detection::domain::blob_detector::BlobDetector;
use crate::shared::detection_record::DetectionRecord;
use crate::shared::frame::Frame;

/// Abstracts how a batch of frames is fed through a detector.
///
/// This is a port (application-layer interface). Infrastructure provides
/// concrete implementations (e.g. threaded, sequential). Results are always
/// returned in input order, one list per frame.
pub trait FrameExecutor: Send {
    fn run(&self, detector: &dyn BlobDetector, frames: &[Frame]) -> Vec<Vec<DetectionRecord>>;
}

/// Runs every frame on the calling thread.
pub struct SequentialExecutor;

impl FrameExecutor for SequentialExecutor {
    fn run(&self, detector: &dyn BlobDetector, frames: &[Frame]) -> Vec<Vec<DetectionRecord>> {
        frames.iter().map(|f| detector.predict(Some(f))).collect()
    }
}
