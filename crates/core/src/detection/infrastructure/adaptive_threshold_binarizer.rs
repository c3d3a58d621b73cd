use ndarray::ArrayView2;

use crate::detection::domain::binarizer::Binarizer;
use crate::detection::infrastructure::gaussian::{gaussian_blur_with_kernel, gaussian_kernel_1d};
use crate::shared::config_error::ConfigError;
use crate::shared::constants::{DEFAULT_BIAS, DEFAULT_BLOCK_SIZE};
use crate::shared::mask::Mask;

/// Adaptive threshold against a Gaussian-weighted local mean.
///
/// A pixel is foreground when it exceeds the rounded mean of its
/// `block_size × block_size` neighbourhood by more than `bias`. Flat regions
/// therefore stay background regardless of their absolute brightness.
pub struct AdaptiveThresholdBinarizer {
    block_size: usize,
    bias: i32,
    kernel: Vec<f32>,
}

impl AdaptiveThresholdBinarizer {
    pub fn new(block_size: usize, bias: i32) -> Result<Self, ConfigError> {
        if block_size < 3 || block_size % 2 == 0 {
            return Err(ConfigError::BlockSize(block_size));
        }
        Ok(Self {
            block_size,
            bias,
            kernel: gaussian_kernel_1d(block_size),
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn bias(&self) -> i32 {
        self.bias
    }
}

impl Default for AdaptiveThresholdBinarizer {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            bias: DEFAULT_BIAS,
            kernel: gaussian_kernel_1d(DEFAULT_BLOCK_SIZE),
        }
    }
}

impl Binarizer for AdaptiveThresholdBinarizer {
    fn binarize(&self, image: ArrayView2<'_, u8>) -> Mask {
        let (height, width) = image.dim();
        let mut temp = Vec::new();
        let mean = gaussian_blur_with_kernel(image, &self.kernel, &mut temp);
        Mask::from_fn(width, height, |x, y| {
            image[[y, x]] as i32 - mean[[y, x]] as i32 > self.bias
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use rstest::rstest;

    fn block_image() -> Array2<u8> {
        let mut image = Array2::<u8>::zeros((10, 10));
        for y in 2..=4 {
            for x in 2..=4 {
                image[[y, x]] = 255;
            }
        }
        image
    }

    #[rstest]
    #[case::even(10)]
    #[case::one(1)]
    #[case::zero(0)]
    fn test_rejects_invalid_block_size(#[case] size: usize) {
        assert!(matches!(
            AdaptiveThresholdBinarizer::new(size, 2),
            Err(ConfigError::BlockSize(s)) if s == size
        ));
    }

    #[test]
    fn test_default_parameters() {
        let b = AdaptiveThresholdBinarizer::default();
        assert_eq!(b.block_size(), 11);
        assert_eq!(b.bias(), 2);
    }

    #[test]
    fn test_all_zero_image_has_no_foreground() {
        let mask = AdaptiveThresholdBinarizer::default().binarize(Array2::zeros((10, 10)).view());
        assert!(!mask.has_foreground());
    }

    #[rstest]
    #[case(0)]
    #[case(128)]
    #[case(255)]
    fn test_uniform_image_has_no_foreground(#[case] level: u8) {
        let image = Array2::from_elem((12, 9), level);
        let mask = AdaptiveThresholdBinarizer::default().binarize(image.view());
        assert!(!mask.has_foreground());
    }

    #[test]
    fn test_bright_block_is_exact_foreground() {
        let image = block_image();
        let mask = AdaptiveThresholdBinarizer::default().binarize(image.view());
        for y in 0..10 {
            for x in 0..10 {
                let inside = (2..=4).contains(&x) && (2..=4).contains(&y);
                assert_eq!(mask.is_foreground(x, y), inside, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_mask_has_input_shape() {
        let image = Array2::<u8>::zeros((7, 13));
        let mask = AdaptiveThresholdBinarizer::new(5, 2).unwrap().binarize(image.view());
        assert_eq!(mask.width(), 13);
        assert_eq!(mask.height(), 7);
    }

    #[test]
    fn test_spot_on_gradient_background() {
        // Smooth horizontal ramp with one bright dot in the middle. The
        // replicated right border makes the last column brighter than its
        // mean, so only the interior is checked.
        let mut image = Array2::from_shape_fn((21, 21), |(_, x)| (x * 4) as u8);
        image[[10, 10]] = 250;
        let mask = AdaptiveThresholdBinarizer::default().binarize(image.view());
        let interior: Vec<(usize, usize)> = (0..21)
            .flat_map(|y| (0..20).map(move |x| (x, y)))
            .filter(|&(x, y)| mask.is_foreground(x, y))
            .collect();
        assert_eq!(interior, vec![(10, 10)]);
    }

    #[test]
    fn test_large_bias_suppresses_dim_blob() {
        let mut image = Array2::from_elem((15, 15), 100u8);
        image[[7, 7]] = 110;
        let lenient = AdaptiveThresholdBinarizer::new(11, 2).unwrap();
        let strict = AdaptiveThresholdBinarizer::new(11, 20).unwrap();
        assert!(lenient.binarize(image.view()).is_foreground(7, 7));
        assert!(!strict.binarize(image.view()).has_foreground());
    }

    #[test]
    fn test_is_deterministic() {
        let image = Array2::from_shape_fn((16, 16), |(y, x)| ((x * 37 + y * 91) % 256) as u8);
        let b = AdaptiveThresholdBinarizer::default();
        assert_eq!(b.binarize(image.view()), b.binarize(image.view()));
    }

    #[test]
    fn test_does_not_touch_input() {
        let image = block_image();
        let before = image.clone();
        let _ = AdaptiveThresholdBinarizer::default().binarize(image.view());
        assert_eq!(image, before);
    }
}
