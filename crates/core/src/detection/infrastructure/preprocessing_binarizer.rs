use imageproc::distance_transform::Norm;
use imageproc::morphology::erode;
use ndarray::{Array2, ArrayView2};

use crate::detection::domain::binarizer::Binarizer;
use crate::detection::infrastructure::gaussian::{gaussian_blur_with_kernel, gaussian_kernel_1d};
use crate::shared::config_error::ConfigError;
use crate::shared::mask::Mask;

/// Decorator that denoises around an inner binarizer.
///
/// Order: Gaussian pre-blur → min/max contrast stretch → inner threshold →
/// mask erosion. Each stage is optional; with all stages off the output is
/// exactly the inner binarizer's.
pub struct PreprocessingBinarizer {
    inner: Box<dyn Binarizer>,
    blur_kernel: Option<Vec<f32>>,
    normalize_contrast: bool,
    erode_iterations: u8,
}

impl PreprocessingBinarizer {
    pub fn new(inner: Box<dyn Binarizer>) -> Self {
        Self {
            inner,
            blur_kernel: None,
            normalize_contrast: false,
            erode_iterations: 0,
        }
    }

    pub fn with_pre_blur(mut self, kernel_size: usize) -> Result<Self, ConfigError> {
        if kernel_size == 0 || kernel_size % 2 == 0 {
            return Err(ConfigError::PreBlurKernel(kernel_size));
        }
        self.blur_kernel = (kernel_size > 1).then(|| gaussian_kernel_1d(kernel_size));
        Ok(self)
    }

    pub fn with_contrast_normalization(mut self, enabled: bool) -> Self {
        self.normalize_contrast = enabled;
        self
    }

    pub fn with_erosion(mut self, iterations: u8) -> Self {
        self.erode_iterations = iterations;
        self
    }
}

impl Binarizer for PreprocessingBinarizer {
    fn binarize(&self, image: ArrayView2<'_, u8>) -> Mask {
        let mut working: Option<Array2<u8>> = None;

        if let Some(kernel) = &self.blur_kernel {
            let mut temp = Vec::new();
            working = Some(gaussian_blur_with_kernel(image, kernel, &mut temp));
        }
        if self.normalize_contrast {
            let source = working.as_ref().map_or(image, |w| w.view());
            working = Some(stretch_contrast(source));
        }

        let mask = match &working {
            Some(w) => self.inner.binarize(w.view()),
            None => self.inner.binarize(image),
        };

        if self.erode_iterations == 0 || !mask.has_foreground() {
            return mask;
        }
        let eroded = erode(&mask.to_gray_image(), Norm::LInf, self.erode_iterations);
        Mask::from_gray_image(&eroded)
    }
}

/// Linearly maps the darkest pixel to 0 and the brightest to 255.
///
/// Flat images are returned unchanged.
fn stretch_contrast(image: ArrayView2<'_, u8>) -> Array2<u8> {
    let min = image.iter().copied().min().unwrap_or(0);
    let max = image.iter().copied().max().unwrap_or(0);
    if max <= min {
        return image.to_owned();
    }
    let range = (max - min) as f32;
    image.mapv(|v| ((v - min) as f32 * 255.0 / range).round() as u8)
}
