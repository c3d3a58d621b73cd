pub mod adaptive_threshold_binarizer;
mod gaussian;
pub mod imageproc_labeler;
pub mod preprocessing_binarizer;
pub mod union_find_labeler;
