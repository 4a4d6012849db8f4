//! Face-centered pre-crop ("smart crop").
//!
//! A heuristic that reduces manual panning for typical front-facing photos:
//! detect the dominant face and crop to an expanded window around it that
//! leaves room for hair above and shoulders below. It is fail-open — no
//! detectable face means the image passes through unchanged — and the caller
//! can always disable it.

use image::DynamicImage;
use log::debug;

use crate::face_detector::{FaceBounds, FaceDetector};
use crate::geometry::Rect;

/// Tunable margins for the face-centered crop window.
///
/// The defaults frame a face for a 3×4 document photo, but print-photo
/// conventions vary by country, so every factor is adjustable.
#[derive(Debug, Clone, Copy)]
pub struct SmartCropParams {
    /// Window width as a multiple of the face width (shoulders + margin).
    pub width_factor: f64,
    /// Window height as a multiple of the face height (hair to chest).
    pub height_factor: f64,
    /// Headroom above the face's top edge, as a multiple of the face height.
    pub headroom_factor: f64,
    /// Minimum face size in source pixels; smaller detections are treated
    /// as spurious and ignored.
    pub min_face_size: u32,
}

impl Default for SmartCropParams {
    fn default() -> Self {
        Self {
            width_factor: 4.0,
            height_factor: 6.0,
            headroom_factor: 1.5,
            min_face_size: 50,
        }
    }
}

/// Pick the authoritative face: largest area wins, ties go to the leftmost.
///
/// Detector order is not stable across backends, so equal-area ties are
/// resolved deterministically by the smaller `x`.
fn dominant_face(faces: &[FaceBounds]) -> Option<&FaceBounds> {
    faces.iter().fold(None, |best, face| match best {
        None => Some(face),
        Some(b) => {
            if face.area() > b.area() || (face.area() == b.area() && face.x < b.x) {
                Some(face)
            } else {
                best
            }
        }
    })
}

/// Compute the crop window for a face inside an `img_w` × `img_h` image.
///
/// The window is horizontally centered on the face and reserves
/// `headroom_factor` face-heights above the forehead. Clamping near an edge
/// shifts the window back inside the image rather than shrinking it, so the
/// full target size is preserved wherever the image permits.
pub fn crop_window(img_w: u32, img_h: u32, face: &FaceBounds, params: &SmartCropParams) -> Rect {
    let win_w = (face.width * params.width_factor).round() as u64;
    let win_h = (face.height * params.height_factor).round() as u64;

    // The window can never exceed the image itself.
    let win_w = (win_w.min(img_w as u64)).max(1) as u32;
    let win_h = (win_h.min(img_h as u64)).max(1) as u32;

    let left = face.center_x() - win_w as f64 / 2.0;
    let top = face.y - face.height * params.headroom_factor;

    // Shift, not shrink: clamp the origin into [0, image - window].
    let left = left
        .round()
        .max(0.0)
        .min(img_w.saturating_sub(win_w) as f64) as u32;
    let top = top
        .round()
        .max(0.0)
        .min(img_h.saturating_sub(win_h) as f64) as u32;

    Rect {
        left,
        top,
        width: win_w,
        height: win_h,
    }
}

/// Detect the dominant face and crop the expanded window around it.
///
/// Returns the input unchanged when no face of at least
/// `params.min_face_size` in both dimensions is found.
pub fn locate_and_crop(
    image: &DynamicImage,
    detector: &dyn FaceDetector,
    params: &SmartCropParams,
) -> DynamicImage {
    let gray = image.to_luma8();
    let (img_w, img_h) = (gray.width(), gray.height());

    let floor = params.min_face_size as f64;
    let faces: Vec<FaceBounds> = detector
        .detect(gray.as_raw(), img_w, img_h)
        .into_iter()
        .filter(|f| f.width >= floor && f.height >= floor)
        .collect();

    let Some(face) = dominant_face(&faces) else {
        debug!("no usable face detected, passing image through");
        return image.clone();
    };

    let window = crop_window(img_w, img_h, face, params);
    debug!(
        "smart crop: face {:.0}x{:.0} at ({:.0},{:.0}) -> window {}x{} at ({},{})",
        face.width, face.height, face.x, face.y, window.width, window.height, window.left,
        window.top
    );
    image.crop_imm(window.left, window.top, window.width, window.height)
}
