use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;

/// Reads frames from an image file or a directory of images.
///
/// Implementations handle decoding and ordering while the pipeline works
/// with the abstract `Frame` and `SourceMetadata` types. Frame ids are
/// assigned in yield order starting at 0.
pub trait FrameSource: Send {
    /// Opens the input and returns its metadata.
    fn open(&mut self, path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in id order.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the source.
    fn close(&mut self);
}
