use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocPhotoError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("image dimensions are zero")]
    ZeroDimensions,

    #[error(
        "crop rectangle {left},{top} {width}x{height} exceeds image bounds \
         {image_width}x{image_height}"
    )]
    CropOutOfBounds {
        left: u32,
        top: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },

    #[error("crop rectangle has zero width or height")]
    EmptyCrop,

    #[error("background removal failed: {0}")]
    SegmentationFailed(String),

    #[error("no background remover installed")]
    MissingBackgroundRemover,

    #[error("failed to encode image: {0}")]
    Encode(String),
}
