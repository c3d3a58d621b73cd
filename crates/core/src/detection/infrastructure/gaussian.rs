use ndarray::{Array2, ArrayView2};

/// Precompute a 1D Gaussian kernel of the given size.
///
/// `kernel_size` must be odd and >= 1. Sizes up to 7 use the fixed binomial
/// taps and larger sizes derive sigma as `0.3 * ((k - 1) * 0.5 - 1) + 0.8`,
/// matching OpenCV's sigma=0 convention.
pub fn gaussian_kernel_1d(kernel_size: usize) -> Vec<f32> {
    debug_assert!(kernel_size >= 1 && kernel_size % 2 == 1);
    match kernel_size {
        1 => return vec![1.0],
        3 => return vec![0.25, 0.5, 0.25],
        5 => return vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => {
            return vec![
                0.031_25, 0.109_375, 0.218_75, 0.281_25, 0.218_75, 0.109_375, 0.031_25,
            ]
        }
        _ => {}
    }

    let sigma = 0.3 * ((kernel_size as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let half = (kernel_size / 2) as f64;
    let mut kernel_f64: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = kernel_f64.iter().sum();
    for v in &mut kernel_f64 {
        *v /= sum;
    }
    kernel_f64.iter().map(|&v| v as f32).collect()
}

/// Convenience wrapper that builds the kernel and allocates its own temp buffer.
#[cfg(test)]
pub fn gaussian_blur(image: ArrayView2<'_, u8>, kernel_size: usize) -> Array2<u8> {
    let kernel = gaussian_kernel_1d(kernel_size);
    let mut temp = Vec::new();
    gaussian_blur_with_kernel(image, &kernel, &mut temp)
}

/// Separable Gaussian blur of a single-channel image with replicated borders.
///
/// Reuses `temp` between calls; results are rounded back to 8 bits.
pub fn gaussian_blur_with_kernel(
    image: ArrayView2<'_, u8>,
    kernel: &[f32],
    temp: &mut Vec<f32>,
) -> Array2<u8> {
    let (height, width) = image.dim();
    let kernel_size = kernel.len();
    if kernel_size <= 1 || width == 0 || height == 0 {
        return image.to_owned();
    }
    let half = kernel_size / 2;

    temp.clear();
    temp.resize(width * height, 0.0);

    // Horizontal pass: image → temp
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0f32;
            for (k, &w) in kernel.iter().enumerate() {
                let sx = (x as isize + k as isize - half as isize)
                    .max(0)
                    .min((width - 1) as isize) as usize;
                sum += image[[y, sx]] as f32 * w;
            }
            temp[y * width + x] = sum;
        }
    }

    // Vertical pass: temp → output
    let mut out = Array2::<u8>::zeros((height, width));
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0f32;
            for (k, &w) in kernel.iter().enumerate() {
                let sy = (y as isize + k as isize - half as isize)
                    .max(0)
                    .min((height - 1) as isize) as usize;
                sum += temp[sy * width + x] * w;
            }
            out[[y, x]] = sum.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(5)]
    #[case(7)]
    #[case(11)]
    #[case(31)]
    fn test_kernel_sums_to_one(#[case] size: usize) {
        let k = gaussian_kernel_1d(size);
        assert_eq!(k.len(), size);
        let sum: f32 = k.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_kernel_is_symmetric() {
        let k = gaussian_kernel_1d(11);
        for i in 0..k.len() / 2 {
            assert_relative_eq!(k[i], k[k.len() - 1 - i], epsilon = 1e-7);
        }
    }

    #[test]
    fn test_kernel_center_is_largest() {
        let k = gaussian_kernel_1d(11);
        let center = k[5];
        for (i, &v) in k.iter().enumerate() {
            if i != 5 {
                assert!(center > v);
            }
        }
    }

    #[test]
    fn test_kernel_11_uses_sigma_two() {
        // sigma = 0.3 * (5 - 1) + 0.8 = 2.0
        let k = gaussian_kernel_1d(11);
        let expected_ratio = (-1.0f64 / 8.0).exp() as f32;
        assert_relative_eq!(k[6] / k[5], expected_ratio, epsilon = 1e-5);
    }

    #[test]
    fn test_blur_uniform_image_unchanged() {
        let image = Array2::from_elem((10, 10), 128u8);
        let blurred = gaussian_blur(image.view(), 5);
        assert!(blurred.iter().all(|&v| (v as i32 - 128).abs() <= 1));
    }

    #[test]
    fn test_blur_spreads_single_bright_pixel() {
        let mut image = Array2::<u8>::zeros((10, 10));
        image[[5, 5]] = 255;
        let blurred = gaussian_blur(image.view(), 5);
        assert!(blurred[[5, 5]] < 255);
        assert!(blurred[[5, 6]] > 0);
        assert!(blurred[[4, 5]] > 0);
    }

    #[test]
    fn test_kernel_size_1_is_identity() {
        let image = Array2::from_shape_fn((4, 6), |(y, x)| (y * 6 + x) as u8);
        assert_eq!(gaussian_blur(image.view(), 1), image);
    }

    #[test]
    fn test_temp_buffer_reuse_gives_same_result() {
        let image = Array2::from_shape_fn((8, 8), |(y, x)| ((x * 31 + y * 17) % 256) as u8);
        let kernel = gaussian_kernel_1d(5);
        let mut temp = Vec::new();
        let first = gaussian_blur_with_kernel(image.view(), &kernel, &mut temp);
        let second = gaussian_blur_with_kernel(image.view(), &kernel, &mut temp);
        assert_eq!(first, second);
    }
}
