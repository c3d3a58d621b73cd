use thiserror::Error;

use crate::shared::frame::PixelDepth;

/// Why a frame produced no detections.
///
/// These never escape `predict`; they are reported through `log` or
/// returned by `evaluate` for callers that want the reason as a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("frame absent")]
    AbsentFrame,
    #[error("frame {frame_id} has {channels} channels, expected 1")]
    InvalidFrameShape { frame_id: u64, channels: u8 },
    #[error("frame {frame_id} pixel type is {depth}, expected u8")]
    InvalidFramePixelType { frame_id: u64, depth: PixelDepth },
    #[error("frame {frame_id} has {actual} bytes of pixel data, expected {expected}")]
    InvalidFrameLength {
        frame_id: u64,
        expected: usize,
        actual: usize,
    },
    #[error("no detection in frame {frame_id}")]
    NoForegroundFound { frame_id: u64 },
}

impl Diagnostic {
    /// Rejections of caller input, as opposed to an empty scene.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, Diagnostic::NoForegroundFound { .. })
    }

    pub fn level(&self) -> log::Level {
        if self.is_invalid_input() {
            log::Level::Warn
        } else {
            log::Level::Debug
        }
    }
}
