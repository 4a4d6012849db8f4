use image::{DynamicImage, RgbaImage};

use crate::error::DocPhotoError;

/// Pluggable background-removal backend.
///
/// Implementors take the high-resolution crop and return an RGBA image of
/// identical dimensions whose alpha channel isolates the foreground subject
/// (opaque subject, transparent background, partial alpha along edges).
/// The segmentation model itself — ONNX, a remote service, anything — is a
/// black box behind this trait; install one with
/// [`crate::EditSession::background_remover`].
pub trait BackgroundRemover: Send + Sync {
    /// Segment the subject from the background.
    ///
    /// Any failure (unsupported input, model error, timeout) should be
    /// reported as [`DocPhotoError::SegmentationFailed`]; the compositor
    /// does not retry.
    fn remove(&self, image: &DynamicImage) -> Result<RgbaImage, DocPhotoError>;
}
