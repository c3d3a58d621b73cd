use image::GrayImage;
use ndarray::{Array2, ArrayView2};

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Binary foreground/background mask, indexed `[row, col]`.
///
/// Every value is either [`FOREGROUND`] or [`BACKGROUND`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pixels: Array2<u8>,
}

impl Mask {
    /// Builds a mask from a predicate; `true` marks foreground.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut is_foreground: impl FnMut(usize, usize) -> bool,
    ) -> Self {
        let pixels = Array2::from_shape_fn((height, width), |(y, x)| {
            if is_foreground(x, y) {
                FOREGROUND
            } else {
                BACKGROUND
            }
        });
        Self { pixels }
    }

    /// Normalizes arbitrary bytes: any non-zero value becomes foreground.
    pub fn from_array(values: Array2<u8>) -> Self {
        let pixels = values.mapv(|v| if v > 0 { FOREGROUND } else { BACKGROUND });
        Self { pixels }
    }

    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn is_foreground(&self, x: usize, y: usize) -> bool {
        self.pixels[[y, x]] == FOREGROUND
    }

    pub fn has_foreground(&self) -> bool {
        self.pixels.iter().any(|&v| v == FOREGROUND)
    }

    pub fn foreground_count(&self) -> usize {
        self.pixels.iter().filter(|&&v| v == FOREGROUND).count()
    }

    pub fn view(&self) -> ArrayView2<'_, u8> {
        self.pixels.view()
    }

    pub fn to_gray_image(&self) -> GrayImage {
        let (w, h) = (self.width() as u32, self.height() as u32);
        GrayImage::from_fn(w, h, |x, y| image::Luma([self.pixels[[y as usize, x as usize]]]))
    }

    pub fn from_gray_image(image: &GrayImage) -> Self {
        let (w, h) = (image.width() as usize, image.height() as usize);
        Self::from_array(Array2::from_shape_fn((h, w), |(y, x)| {
            image.get_pixel(x as u32, y as u32)[0]
        }))
    }
}
