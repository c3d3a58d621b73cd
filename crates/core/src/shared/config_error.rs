use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("block size must be an odd integer >= 3, got {0}")]
    BlockSize(usize),
    #[error("pre-blur kernel size must be a positive odd integer, got {0}")]
    PreBlurKernel(usize),
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
