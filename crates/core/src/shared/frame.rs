use std::fmt;

use image::DynamicImage;
use ndarray::ArrayView2;

/// Storage type of a single pixel sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelDepth {
    U8,
    U16,
    F32,
}

impl PixelDepth {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            PixelDepth::U8 => 1,
            PixelDepth::U16 => 2,
            PixelDepth::F32 => 4,
        }
    }
}

impl fmt::Display for PixelDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelDepth::U8 => write!(f, "u8"),
            PixelDepth::U16 => write!(f, "u16"),
            PixelDepth::F32 => write!(f, "f32"),
        }
    }
}

/// A single video/image frame: raw sample bytes in row-major, interleaved order.
///
/// The frame carries its channel count and sample depth so that callers can
/// hand over whatever their source decoded; the detector decides whether the
/// layout is acceptable.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    depth: PixelDepth,
    id: u64,
}

impl Frame {
    /// The data length is not checked here; see [`Frame::has_expected_len`].
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
        depth: PixelDepth,
        id: u64,
    ) -> Self {
        Self {
            data,
            width,
            height,
            channels,
            depth,
            id,
        }
    }

    /// Single-channel 8-bit frame, the layout the detector accepts.
    pub fn gray(data: Vec<u8>, width: u32, height: u32, id: u64) -> Self {
        Self::new(data, width, height, 1, PixelDepth::U8, id)
    }

    /// Wraps a decoded image without converting it.
    pub fn from_dynamic_image(image: &DynamicImage, id: u64) -> Self {
        let width = image.width();
        let height = image.height();
        let channels = image.color().channel_count();
        match image {
            DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageRgb8(_)
            | DynamicImage::ImageRgba8(_) => Self::new(
                image.as_bytes().to_vec(),
                width,
                height,
                channels,
                PixelDepth::U8,
                id,
            ),
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => Self::new(
                image.as_bytes().to_vec(),
                width,
                height,
                channels,
                PixelDepth::F32,
                id,
            ),
            // Luma16, LumaA16, Rgb16, Rgba16 and any future 16-bit layouts.
            _ => {
                let depth = if image.color().bytes_per_pixel() / channels.max(1) == 2 {
                    PixelDepth::U16
                } else {
                    PixelDepth::U8
                };
                Self::new(
                    image.as_bytes().to_vec(),
                    width,
                    height,
                    channels,
                    depth,
                    id,
                )
            }
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn depth(&self) -> PixelDepth {
        self.depth
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Byte count implied by the dimensions, channel count and depth.
    pub fn expected_len(&self) -> usize {
        (self.width as usize)
            * (self.height as usize)
            * (self.channels as usize)
            * self.depth.bytes_per_sample()
    }

    pub fn has_expected_len(&self) -> bool {
        self.data.len() == self.expected_len()
    }

    pub fn is_gray8(&self) -> bool {
        self.channels == 1 && self.depth == PixelDepth::U8
    }

    /// `(height, width)` view over a single-channel 8-bit frame.
    ///
    /// Returns `None` for any other layout.
    pub fn as_gray_view(&self) -> Option<ArrayView2<'_, u8>> {
        if !self.is_gray8() {
            return None;
        }
        ArrayView2::from_shape((self.height as usize, self.width as usize), &self.data).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 3, PixelDepth::U8, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.depth(), PixelDepth::U8);
        assert_eq!(frame.id(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    fn test_gray_constructor() {
        let frame = Frame::gray(vec![7u8; 6], 3, 2, 1);
        assert!(frame.is_gray8());
        assert_eq!(frame.channels(), 1);
    }

    #[test]
    fn test_mismatched_data_length_is_reported() {
        let frame = Frame::new(vec![0u8; 4], 2, 2, 1, PixelDepth::U16, 0);
        assert_eq!(frame.expected_len(), 8);
        assert!(!frame.has_expected_len());
        assert!(Frame::gray(vec![0u8; 4], 2, 2, 0).has_expected_len());
    }

    #[test]
    fn test_gray_view_none_for_short_data() {
        let frame = Frame::gray(vec![0u8; 3], 2, 2, 0);
        assert!(frame.as_gray_view().is_none());
    }

    #[test]
    fn test_gray_view_shape_and_pixel_access() {
        let mut data = vec![0u8; 8]; // 2 rows x 4 cols
        data[6] = 200; // row=1, col=2
        let frame = Frame::gray(data, 4, 2, 0);
        let view = frame.as_gray_view().unwrap();
        assert_eq!(view.shape(), &[2, 4]);
        assert_eq!(view[[1, 2]], 200);
    }

    #[test]
    fn test_gray_view_none_for_color() {
        let frame = Frame::new(vec![0u8; 12], 2, 2, 3, PixelDepth::U8, 0);
        assert!(frame.as_gray_view().is_none());
    }

    #[test]
    fn test_gray_view_none_for_wide_samples() {
        let frame = Frame::new(vec![0u8; 8], 2, 2, 1, PixelDepth::U16, 0);
        assert!(frame.as_gray_view().is_none());
    }

    #[test]
    fn test_from_dynamic_luma8() {
        let img = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(3, 2, image::Luma([9])));
        let frame = Frame::from_dynamic_image(&img, 4);
        assert!(frame.is_gray8());
        assert_eq!(frame.id(), 4);
        assert!(frame.data().iter().all(|&v| v == 9));
    }

    #[test]
    fn test_from_dynamic_luma16() {
        let img = DynamicImage::new_luma16(3, 2);
        let frame = Frame::from_dynamic_image(&img, 0);
        assert_eq!(frame.channels(), 1);
        assert_eq!(frame.depth(), PixelDepth::U16);
        assert_eq!(frame.data().len(), 12);
    }

    #[test]
    fn test_from_dynamic_rgb8() {
        let img = DynamicImage::new_rgb8(2, 2);
        let frame = Frame::from_dynamic_image(&img, 0);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.depth(), PixelDepth::U8);
    }

    #[test]
    fn test_from_dynamic_rgb32f() {
        let img = DynamicImage::new_rgb32f(2, 2);
        let frame = Frame::from_dynamic_image(&img, 0);
        assert_eq!(frame.depth(), PixelDepth::F32);
        assert_eq!(frame.data().len(), 2 * 2 * 3 * 4);
    }

    #[test]
    fn test_clone_is_independent() {
        let frame = Frame::gray(vec![100u8; 4], 2, 2, 0);
        let cloned = frame.clone();
        assert_eq!(frame.data(), cloned.data());
        assert_eq!(frame.id(), cloned.id());
    }
}
