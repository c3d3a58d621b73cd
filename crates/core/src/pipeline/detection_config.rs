use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detection::domain::component_labeler::Connectivity;
use crate::shared::config_error::ConfigError;
use crate::shared::constants::{DEFAULT_BIAS, DEFAULT_BLOCK_SIZE};

/// Which connected-components implementation to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelerKind {
    #[default]
    UnionFind,
    Imageproc,
}

/// Tuning knobs for the detector. Missing keys fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub block_size: usize,
    pub bias: i32,
    pub connectivity: Connectivity,
    pub labeler: LabelerKind,
    /// Gaussian kernel size applied before thresholding.
    pub pre_blur: Option<usize>,
    pub normalize_contrast: bool,
    pub erode_iterations: u8,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            bias: DEFAULT_BIAS,
            connectivity: Connectivity::Eight,
            labeler: LabelerKind::UnionFind,
            pre_blur: None,
            normalize_contrast: false,
            erode_iterations: 0,
        }
    }
}

impl DetectionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size < 3 || self.block_size % 2 == 0 {
            return Err(ConfigError::BlockSize(self.block_size));
        }
        if let Some(k) = self.pre_blur {
            if k == 0 || k % 2 == 0 {
                return Err(ConfigError::PreBlurKernel(k));
            }
        }
        Ok(())
    }

    /// True when any stage beyond the plain adaptive threshold is enabled.
    pub fn has_preprocessing(&self) -> bool {
        self.pre_blur.is_some_and(|k| k > 1) || self.normalize_contrast || self.erode_iterations > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let c = DetectionConfig::default();
        assert_eq!(c.block_size, 11);
        assert_eq!(c.bias, 2);
        assert_eq!(c.connectivity, Connectivity::Eight);
        assert_eq!(c.labeler, LabelerKind::UnionFind);
        assert!(!c.has_preprocessing());
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let c = DetectionConfig::from_json_str("{}").unwrap();
        assert_eq!(c, DetectionConfig::default());
    }

    #[test]
    fn test_partial_object_overrides_only_given_keys() {
        let c = DetectionConfig::from_json_str(r#"{"block_size": 15, "labeler": "imageproc"}"#)
            .unwrap();
        assert_eq!(c.block_size, 15);
        assert_eq!(c.bias, 2);
        assert_eq!(c.labeler, LabelerKind::Imageproc);
    }

    #[test]
    fn test_unrecognized_keys_are_ignored() {
        let c = DetectionConfig::from_json_str(r#"{"min_confidence": 0.5}"#).unwrap();
        assert_eq!(c, DetectionConfig::default());
    }

    #[test]
    fn test_preprocessing_keys() {
        let c = DetectionConfig::from_json_str(
            r#"{"pre_blur": 5, "normalize_contrast": true, "erode_iterations": 1, "connectivity": "four"}"#,
        )
        .unwrap();
        assert_eq!(c.pre_blur, Some(5));
        assert_eq!(c.connectivity, Connectivity::Four);
        assert!(c.has_preprocessing());
    }

    #[rstest]
    #[case::even_block(r#"{"block_size": 8}"#)]
    #[case::tiny_block(r#"{"block_size": 1}"#)]
    #[case::even_blur(r#"{"pre_blur": 4}"#)]
    #[case::zero_blur(r#"{"pre_blur": 0}"#)]
    fn test_invalid_values_rejected(#[case] json: &str) {
        assert!(DetectionConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            DetectionConfig::from_json_str("{block_size"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"bias": -3}}"#).unwrap();
        let c = DetectionConfig::load(file.path()).unwrap();
        assert_eq!(c.bias, -3);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            DetectionConfig::load(Path::new("/nonexistent/blobscan.json")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_serializes_back() {
        let json = serde_json::to_string(&DetectionConfig::default()).unwrap();
        assert!(json.contains(r#""connectivity":"eight""#));
        assert!(json.contains(r#""labeler":"union_find""#));
    }
}
