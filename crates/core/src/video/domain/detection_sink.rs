use crate::shared::detection_record::DetectionRecord;
use crate::shared::frame::Frame;

/// Receives each frame together with the blobs found in it.
///
/// Frames arrive in id order. A frame with no detections is still delivered.
pub trait DetectionSink: Send {
    fn consume(
        &mut self,
        frame: &Frame,
        detections: &[DetectionRecord],
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Flushes buffered output. Called once after the last frame.
    fn finish(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}
