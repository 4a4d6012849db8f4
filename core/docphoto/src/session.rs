//! Per-session editing state.
//!
//! Each editing session owns one [`EditSession`]: the EXIF-normalized
//! original, the user's orientation controls, the smart-crop toggle, and a
//! memoized working image. Nothing here is global; concurrent sessions are
//! independent by construction.

use image::{imageops::FilterType, DynamicImage};
use log::debug;

use crate::background::BackgroundRemover;
use crate::compositor::{self, EXPORT_FILENAME};
use crate::error::DocPhotoError;
use crate::face_detector::FaceDetector;
use crate::geometry::{map_to_source, PreviewScale, Rect};
use crate::orientation::{self, OrientationState};
use crate::smart_crop::{self, SmartCropParams};

/// A finished, print-ready document photo.
#[derive(Debug, Clone)]
pub struct ProcessedPhoto {
    /// PNG bytes, exactly 354×472, three opaque channels.
    pub png: Vec<u8>,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

impl ProcessedPhoto {
    /// Fixed filename the photo is offered for download under.
    pub fn filename(&self) -> &'static str {
        EXPORT_FILENAME
    }
}

/// One user's editing session.
///
/// Collaborators (face detector, background remover) are installed
/// builder-style; editing actions mutate orientation state and invalidate
/// the memoized working image. A failed [`process`](Self::process) call
/// leaves every piece of editing state exactly as it was.
pub struct EditSession {
    original: DynamicImage,
    orientation: OrientationState,
    smart_crop_enabled: bool,
    smart_crop_params: SmartCropParams,
    detector: Option<Box<dyn FaceDetector>>,
    remover: Option<Box<dyn BackgroundRemover>>,
    /// Memoized working image; `None` means dirty.
    working: Option<DynamicImage>,
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("orientation", &self.orientation)
            .field("smart_crop_enabled", &self.smart_crop_enabled)
            .field("smart_crop_params", &self.smart_crop_params)
            .field("detector", &self.detector.is_some())
            .field("remover", &self.remover.is_some())
            .field("working_cached", &self.working.is_some())
            .finish_non_exhaustive()
    }
}

impl EditSession {
    /// Start a session from raw upload bytes (JPEG or PNG).
    ///
    /// The embedded EXIF orientation is applied immediately, so all
    /// subsequent coordinates are in upright display space.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocPhotoError> {
        let original = orientation::decode_oriented(bytes)?;
        Ok(Self::from_image(original))
    }

    /// Start a session from an already-decoded (and EXIF-corrected) image.
    pub fn from_image(original: DynamicImage) -> Self {
        Self {
            original,
            orientation: OrientationState::default(),
            smart_crop_enabled: false,
            smart_crop_params: SmartCropParams::default(),
            detector: None,
            remover: None,
            working: None,
        }
    }

    /// Install a face detector, enabling the smart crop.
    pub fn face_detector(mut self, detector: Box<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self.working = None;
        self
    }

    /// Install a background remover; required before [`process`](Self::process).
    pub fn background_remover(mut self, remover: Box<dyn BackgroundRemover>) -> Self {
        self.remover = Some(remover);
        self
    }

    /// Override the smart-crop margins.
    pub fn smart_crop_params(mut self, params: SmartCropParams) -> Self {
        self.smart_crop_params = params;
        self.working = None;
        self
    }

    /// Replace the active image, e.g. after a new upload or camera capture.
    ///
    /// Orientation state resets to the default; installed collaborators and
    /// the smart-crop toggle survive.
    pub fn replace_image(&mut self, bytes: &[u8]) -> Result<(), DocPhotoError> {
        let original = orientation::decode_oriented(bytes)?;
        self.original = original;
        self.orientation = OrientationState::default();
        self.working = None;
        Ok(())
    }

    /// Current orientation controls.
    pub fn orientation(&self) -> OrientationState {
        self.orientation
    }

    /// Whether the smart crop is currently applied.
    pub fn smart_crop_enabled(&self) -> bool {
        self.smart_crop_enabled
    }

    /// Rotate a quarter turn clockwise.
    pub fn rotate_cw(&mut self) {
        self.orientation.rotation = self.orientation.rotation.quarter_turn_cw();
        self.working = None;
    }

    /// Rotate a quarter turn counter-clockwise.
    pub fn rotate_ccw(&mut self) {
        self.orientation.rotation = self.orientation.rotation.quarter_turn_ccw();
        self.working = None;
    }

    /// Set the horizontal-mirror flag.
    pub fn set_mirrored(&mut self, mirrored: bool) {
        if self.orientation.mirrored != mirrored {
            self.orientation.mirrored = mirrored;
            self.working = None;
        }
    }

    /// Enable or disable the face-centered pre-crop.
    pub fn set_smart_crop(&mut self, enabled: bool) {
        if self.smart_crop_enabled != enabled {
            self.smart_crop_enabled = enabled;
            self.working = None;
        }
    }

    /// The image the user's crop rectangle is defined against: orientation
    /// applied, then the smart crop when enabled and a detector is installed.
    ///
    /// Memoized until an editing action invalidates it.
    pub fn working_image(&mut self) -> &DynamicImage {
        let Self {
            original,
            orientation: state,
            smart_crop_enabled,
            smart_crop_params,
            detector,
            working,
            ..
        } = self;
        working.get_or_insert_with(|| {
            debug!(
                "recomputing working image (rotation {}°, mirrored {}, smart crop {})",
                state.rotation.degrees(),
                state.mirrored,
                smart_crop_enabled
            );
            let oriented = orientation::apply(original, *state);
            match (detector.as_deref(), *smart_crop_enabled) {
                (Some(detector), true) => {
                    smart_crop::locate_and_crop(&oriented, detector, smart_crop_params)
                }
                _ => oriented,
            }
        })
    }

    /// Downscale the working image for the interactive cropper.
    ///
    /// Returns the preview together with the exact scale relating it back to
    /// the working image. Images already at or under `max_width` pass
    /// through at identity scale.
    pub fn preview(&mut self, max_width: u32) -> (DynamicImage, PreviewScale) {
        let working = self.working_image();
        let (w, h) = (working.width(), working.height());

        if w <= max_width {
            return (working.clone(), PreviewScale::identity(w));
        }

        let scale = PreviewScale::new(max_width, w);
        let preview_h = ((h as u64 * max_width as u64 / w as u64) as u32).max(1);
        let preview = working.resize_exact(max_width, preview_h, FilterType::Triangle);
        (preview, scale)
    }

    /// Crop, remove the background, and produce the final 354×472 PNG.
    ///
    /// `preview_rect` is the rectangle the user drew on the preview returned
    /// by [`preview`](Self::preview); it is mapped back to full resolution
    /// here so the compositor never sees downscaled pixels. Every error is
    /// recoverable: the session's editing state is untouched.
    pub fn process(
        &mut self,
        preview_rect: Rect,
        scale: PreviewScale,
    ) -> Result<ProcessedPhoto, DocPhotoError> {
        let source_rect = map_to_source(preview_rect, scale);
        if source_rect.width == 0 || source_rect.height == 0 {
            return Err(DocPhotoError::EmptyCrop);
        }

        let working = self.working_image();
        let (w, h) = (working.width(), working.height());
        if !source_rect.contained_in(w, h) {
            return Err(DocPhotoError::CropOutOfBounds {
                left: source_rect.left,
                top: source_rect.top,
                width: source_rect.width,
                height: source_rect.height,
                image_width: w,
                image_height: h,
            });
        }

        let crop = working.crop_imm(
            source_rect.left,
            source_rect.top,
            source_rect.width,
            source_rect.height,
        );

        let Some(remover) = self.remover.as_deref() else {
            return Err(DocPhotoError::MissingBackgroundRemover);
        };
        let composed = compositor::compose(&crop, remover)?;
        let png = compositor::encode_png(&composed)?;

        Ok(ProcessedPhoto {
            width: composed.width(),
            height: composed.height(),
            png,
        })
    }
}
