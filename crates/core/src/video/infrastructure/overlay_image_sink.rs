use std::path::PathBuf;

use image::{
    DynamicImage, GrayAlphaImage, GrayImage, ImageBuffer, Luma, LumaA, Rgb, Rgb32FImage, RgbImage,
    Rgba, Rgba32FImage, RgbaImage,
};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::shared::constants::{DEFAULT_BOX_COLOR, DEFAULT_BOX_THICKNESS};
use crate::shared::detection_record::{BoundingBox, DetectionRecord};
use crate::shared::frame::{Frame, PixelDepth};
use crate::video::domain::detection_sink::DetectionSink;

/// Saves each frame as a grayscale PNG with its detections outlined.
///
/// Output files are named `frame_{id:06}.png` inside the target directory.
/// Boxes grow outward from the blob bounds, one pixel per thickness step.
pub struct OverlayImageSink {
    dir: PathBuf,
    color: u8,
    thickness: u32,
}

impl OverlayImageSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            color: DEFAULT_BOX_COLOR,
            thickness: DEFAULT_BOX_THICKNESS,
        }
    }

    pub fn with_color(mut self, color: u8) -> Self {
        self.color = color;
        self
    }

    pub fn with_thickness(mut self, thickness: u32) -> Self {
        self.thickness = thickness.max(1);
        self
    }

    pub fn frame_path(&self, frame_id: u64) -> PathBuf {
        self.dir.join(format!("frame_{frame_id:06}.png"))
    }
}

fn u16_samples(data: &[u8]) -> Vec<u16> {
    data.chunks_exact(2)
        .map(|c| u16::from_ne_bytes([c[0], c[1]]))
        .collect()
}

fn f32_samples(data: &[u8]) -> Vec<f32> {
    data.chunks_exact(4)
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// Rebuilds the frame as a [`DynamicImage`] so `image` does the luma conversion.
///
/// Returns `Ok(None)` when the data does not fill the frame dimensions.
fn to_dynamic_image(frame: &Frame) -> Result<Option<DynamicImage>, Box<dyn std::error::Error>> {
    let (w, h) = (frame.width(), frame.height());
    let data = frame.data();
    let image = match (frame.depth(), frame.channels()) {
        (PixelDepth::U8, 1) => {
            GrayImage::from_raw(w, h, data.to_vec()).map(DynamicImage::ImageLuma8)
        }
        (PixelDepth::U8, 2) => {
            GrayAlphaImage::from_raw(w, h, data.to_vec()).map(DynamicImage::ImageLumaA8)
        }
        (PixelDepth::U8, 3) => {
            RgbImage::from_raw(w, h, data.to_vec()).map(DynamicImage::ImageRgb8)
        }
        (PixelDepth::U8, 4) => {
            RgbaImage::from_raw(w, h, data.to_vec()).map(DynamicImage::ImageRgba8)
        }
        (PixelDepth::U16, 1) => ImageBuffer::<Luma<u16>, _>::from_raw(w, h, u16_samples(data))
            .map(DynamicImage::ImageLuma16),
        (PixelDepth::U16, 2) => ImageBuffer::<LumaA<u16>, _>::from_raw(w, h, u16_samples(data))
            .map(DynamicImage::ImageLumaA16),
        (PixelDepth::U16, 3) => ImageBuffer::<Rgb<u16>, _>::from_raw(w, h, u16_samples(data))
            .map(DynamicImage::ImageRgb16),
        (PixelDepth::U16, 4) => ImageBuffer::<Rgba<u16>, _>::from_raw(w, h, u16_samples(data))
            .map(DynamicImage::ImageRgba16),
        // `image` has no float gray layouts; widen to RGB(A) with equal colour channels.
        (PixelDepth::F32, 1) => {
            let rgb = f32_samples(data).into_iter().flat_map(|l| [l, l, l]).collect();
            Rgb32FImage::from_raw(w, h, rgb).map(DynamicImage::ImageRgb32F)
        }
        (PixelDepth::F32, 2) => {
            let rgba = f32_samples(data)
                .chunks_exact(2)
                .flat_map(|la| [la[0], la[0], la[0], la[1]])
                .collect();
            Rgba32FImage::from_raw(w, h, rgba).map(DynamicImage::ImageRgba32F)
        }
        (PixelDepth::F32, 3) => {
            Rgb32FImage::from_raw(w, h, f32_samples(data)).map(DynamicImage::ImageRgb32F)
        }
        (PixelDepth::F32, 4) => {
            Rgba32FImage::from_raw(w, h, f32_samples(data)).map(DynamicImage::ImageRgba32F)
        }
        (depth, n) => return Err(format!("cannot render {n}-channel {depth} frame").into()),
    };
    Ok(image)
}

fn to_gray_image(frame: &Frame) -> Result<GrayImage, Box<dyn std::error::Error>> {
    if !frame.has_expected_len() {
        return Err("frame data does not match its dimensions".into());
    }
    let image = to_dynamic_image(frame)?.ok_or("frame data does not match its dimensions")?;
    Ok(image.to_luma8())
}

fn draw_box(canvas: &mut GrayImage, bbox: &BoundingBox, color: u8, thickness: u32) {
    for t in 0..thickness {
        let rect = Rect::at(bbox.x as i32 - t as i32, bbox.y as i32 - t as i32)
            .of_size(bbox.w + 2 * t, bbox.h + 2 * t);
        draw_hollow_rect_mut(canvas, rect, Luma([color]));
    }
}

impl DetectionSink for OverlayImageSink {
    fn consume(
        &mut self,
        frame: &Frame,
        detections: &[DetectionRecord],
    ) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::create_dir_all(&self.dir)?;
        let mut canvas = to_gray_image(frame)?;
        for det in detections {
            draw_box(&mut canvas, &det.bbox, self.color, self.thickness);
        }
        let path = self.frame_path(frame.id());
        canvas.save(&path)?;
        log::debug!("Wrote overlay {}", path.display());
        Ok(())
    }
}
