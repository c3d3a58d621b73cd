use ndarray::ArrayView2;

use crate::detection::domain::binarizer::Binarizer;
use crate::detection::domain::blob_detector::BlobDetector;
use crate::detection::domain::component_labeler::{ComponentLabeler, Connectivity};
use crate::detection::domain::detection_formatter::DetectionFormatter;
use crate::detection::infrastructure::adaptive_threshold_binarizer::AdaptiveThresholdBinarizer;
use crate::detection::infrastructure::imageproc_labeler::ImageprocLabeler;
use crate::detection::infrastructure::preprocessing_binarizer::PreprocessingBinarizer;
use crate::detection::infrastructure::union_find_labeler::UnionFindLabeler;
use crate::pipeline::detection_config::{DetectionConfig, LabelerKind};
use crate::shared::config_error::ConfigError;
use crate::shared::detection_record::DetectionRecord;
use crate::shared::diagnostic::Diagnostic;
use crate::shared::frame::{Frame, PixelDepth};

/// Blob detection pipeline: validate → binarize → label → format.
///
/// Holds only immutable configuration, so one instance can serve frames
/// from several threads at once.
pub struct DetectorPipeline {
    binarizer: Box<dyn Binarizer>,
    labeler: Box<dyn ComponentLabeler>,
    formatter: DetectionFormatter,
    connectivity: Connectivity,
}

impl DetectorPipeline {
    pub fn new(
        binarizer: Box<dyn Binarizer>,
        labeler: Box<dyn ComponentLabeler>,
        connectivity: Connectivity,
    ) -> Self {
        Self {
            binarizer,
            labeler,
            formatter: DetectionFormatter::new(),
            connectivity,
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let threshold = AdaptiveThresholdBinarizer::new(config.block_size, config.bias)?;
        let binarizer: Box<dyn Binarizer> = if config.has_preprocessing() {
            let mut wrapped = PreprocessingBinarizer::new(Box::new(threshold))
                .with_contrast_normalization(config.normalize_contrast)
                .with_erosion(config.erode_iterations);
            if let Some(k) = config.pre_blur {
                wrapped = wrapped.with_pre_blur(k)?;
            }
            Box::new(wrapped)
        } else {
            Box::new(threshold)
        };
        let labeler: Box<dyn ComponentLabeler> = match config.labeler {
            LabelerKind::UnionFind => Box::new(UnionFindLabeler::new()),
            LabelerKind::Imageproc => Box::new(ImageprocLabeler::new()),
        };
        log::debug!(
            "Detector configured: block_size={}, bias={}, connectivity={:?}, labeler={:?}",
            config.block_size,
            config.bias,
            config.connectivity,
            config.labeler
        );
        Ok(Self::new(binarizer, labeler, config.connectivity))
    }

    /// Runs every stage and reports why nothing was found, if so.
    pub fn evaluate(&self, frame: Option<&Frame>) -> Result<Vec<DetectionRecord>, Diagnostic> {
        let (frame, image) = validate(frame)?;

        let mask = self.binarizer.binarize(image);
        if !mask.has_foreground() {
            return Err(Diagnostic::NoForegroundFound {
                frame_id: frame.id(),
            });
        }

        let labeling = self.labeler.label(&mask, self.connectivity);
        Ok(self.formatter.format_labeling(&labeling, frame.id()))
    }
}

impl Default for DetectorPipeline {
    fn default() -> Self {
        Self::new(
            Box::new(AdaptiveThresholdBinarizer::default()),
            Box::new(UnionFindLabeler::new()),
            Connectivity::Eight,
        )
    }
}

impl BlobDetector for DetectorPipeline {
    fn predict(&self, frame: Option<&Frame>) -> Vec<DetectionRecord> {
        match self.evaluate(frame) {
            Ok(detections) => detections,
            Err(diagnostic) => {
                log::log!(diagnostic.level(), "{diagnostic}");
                Vec::new()
            }
        }
    }
}

/// Accepts only present, single-channel, 8-bit frames.
///
/// The returned view borrows the caller's buffer read-only.
pub fn validate(frame: Option<&Frame>) -> Result<(&Frame, ArrayView2<'_, u8>), Diagnostic> {
    let frame = frame.ok_or(Diagnostic::AbsentFrame)?;
    if frame.channels() != 1 {
        return Err(Diagnostic::InvalidFrameShape {
            frame_id: frame.id(),
            channels: frame.channels(),
        });
    }
    if frame.depth() != PixelDepth::U8 {
        return Err(Diagnostic::InvalidFramePixelType {
            frame_id: frame.id(),
            depth: frame.depth(),
        });
    }
    let length_error = Diagnostic::InvalidFrameLength {
        frame_id: frame.id(),
        expected: frame.expected_len(),
        actual: frame.data().len(),
    };
    if !frame.has_expected_len() {
        return Err(length_error);
    }
    let view = frame.as_gray_view().ok_or(length_error)?;
    Ok((frame, view))
}
