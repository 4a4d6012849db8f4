/// Bounding box of a detected face, in source-image pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceBounds {
    /// X coordinate of the top-left corner (pixels).
    pub x: f64,
    /// Y coordinate of the top-left corner (pixels).
    pub y: f64,
    /// Width of the bounding box (pixels).
    pub width: f64,
    /// Height of the bounding box (pixels).
    pub height: f64,
    /// Detection confidence score (detector-specific scale).
    pub confidence: f64,
}

impl FaceBounds {
    /// Box area in square pixels.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Horizontal center of the box.
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// Pluggable face detection backend.
///
/// Implement this trait to plug in any detection engine (SeetaFace, ONNX,
/// a cascade classifier, ...) and install it with
/// [`crate::EditSession::face_detector`]. Detection operates on a grayscale,
/// alpha-stripped copy of the working image.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a row-major grayscale buffer of `width` × `height` bytes.
    ///
    /// Returning an empty vector is a normal outcome, not an error; the
    /// smart crop falls back to the unmodified image.
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBounds>;
}
