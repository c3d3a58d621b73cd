use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;
use crate::video::domain::frame_source::FrameSource;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("input not found: {0}")]
    NotFound(PathBuf),
    #[error("no image files in {0}")]
    EmptyDirectory(PathBuf),
    #[error("source not opened")]
    NotOpened,
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Adapts a single image, or every image in a directory, to [`FrameSource`].
///
/// Directory entries are taken in file-name order. Images are decoded
/// lazily with the `image` crate and converted to 8-bit grayscale unless
/// `keep_native` is set, in which case the decoded layout is passed through
/// for the detector to accept or reject.
pub struct ImageSequenceSource {
    keep_native: bool,
    paths: Option<Vec<PathBuf>>,
}

impl ImageSequenceSource {
    pub fn new() -> Self {
        Self {
            keep_native: false,
            paths: None,
        }
    }

    pub fn keep_native(mut self, keep: bool) -> Self {
        self.keep_native = keep;
        self
    }
}

impl Default for ImageSequenceSource {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn load_frame(path: &Path, id: u64, keep_native: bool) -> Result<Frame, SourceError> {
    let image = image::open(path).map_err(|source| SourceError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    if keep_native {
        return Ok(Frame::from_dynamic_image(&image, id));
    }
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    Ok(Frame::gray(gray.into_raw(), width, height, id))
}

impl FrameSource for ImageSequenceSource {
    fn open(&mut self, path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
        if !path.exists() {
            return Err(SourceError::NotFound(path.to_path_buf()).into());
        }
        let paths = if path.is_dir() {
            list_images(path)?
        } else {
            vec![path.to_path_buf()]
        };
        let first = paths
            .first()
            .ok_or_else(|| SourceError::EmptyDirectory(path.to_path_buf()))?;
        let (width, height) =
            image::image_dimensions(first).map_err(|source| SourceError::Decode {
                path: first.clone(),
                source,
            })?;

        log::debug!("Opened {} ({} images)", path.display(), paths.len());
        let metadata = SourceMetadata {
            width,
            height,
            total_frames: paths.len(),
            source_path: Some(path.to_path_buf()),
        };
        self.paths = Some(paths);
        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        let Some(paths) = self.paths.as_ref() else {
            let err: Box<dyn std::error::Error> = SourceError::NotOpened.into();
            return Box::new(std::iter::once(Err(err)));
        };
        let keep_native = self.keep_native;
        Box::new(paths.iter().enumerate().map(move |(i, path)| {
            load_frame(path, i as u64, keep_native).map_err(Box::<dyn std::error::Error>::from)
        }))
    }

    fn close(&mut self) {
        self.paths = None;
    }
}
