/// Neighbourhood size of the adaptive threshold, in pixels (odd).
pub const DEFAULT_BLOCK_SIZE: usize = 11;

/// Amount a pixel must exceed its local mean by to count as foreground.
pub const DEFAULT_BIAS: i32 = 2;

/// Label reserved for non-foreground pixels.
pub const BACKGROUND_LABEL: u32 = 0;

/// Color of overlay rectangles on grayscale output.
pub const DEFAULT_BOX_COLOR: u8 = 255;

pub const DEFAULT_BOX_THICKNESS: u32 = 1;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp", "pgm"];
