use ndarray::ArrayView2;

use crate::shared::mask::Mask;

/// Domain interface for turning a grayscale image into a foreground mask.
///
/// Implementations must be pure: the same image always yields the same mask.
/// `&self` plus `Sync` lets one binarizer serve several frames concurrently.
pub trait Binarizer: Send + Sync {
    /// `image` is indexed `[row, col]`; the returned mask has the same shape.
    fn binarize(&self, image: ArrayView2<'_, u8>) -> Mask;
}
