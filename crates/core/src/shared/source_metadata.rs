use std::path::PathBuf;

/// What a frame source reports once opened.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceMetadata {
    /// Dimensions of the first frame. Later frames may differ.
    pub width: u32,
    pub height: u32,
    pub total_frames: usize,
    pub source_path: Option<PathBuf>,
}
