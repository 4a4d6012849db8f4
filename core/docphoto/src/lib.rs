//! Document-photo processing: turn an arbitrary photograph into a
//! standardized 3×4 cm identity photo.
//!
//! The pipeline: decode with EXIF correction, apply user rotation and
//! mirroring, optionally pre-crop around the detected face, map the crop
//! rectangle drawn on a downscaled preview back onto the full-resolution
//! image, strip the background, composite onto opaque white, and resample to
//! exactly 354×472 pixels (3×4 cm at 300 DPI).
//!
//! Face detection and background removal are pluggable seams
//! ([`FaceDetector`], [`BackgroundRemover`]); the crate ships no model of
//! its own except the optional `rustface`-backed detector.
//!
//! # Example
//!
//! ```no_run
//! use docphoto::{BackgroundRemover, DocPhotoError, EditSession, Rect};
//! use image::{DynamicImage, RgbaImage};
//!
//! struct MyRemover;
//! impl BackgroundRemover for MyRemover {
//!     fn remove(&self, image: &DynamicImage) -> Result<RgbaImage, DocPhotoError> {
//!         // Call out to a segmentation model here.
//!         Ok(image.to_rgba8())
//!     }
//! }
//!
//! let bytes = std::fs::read("upload.jpg").unwrap();
//! let mut session = EditSession::from_bytes(&bytes)
//!     .unwrap()
//!     .background_remover(Box::new(MyRemover));
//!
//! session.rotate_cw();
//! let (preview, scale) = session.preview(500);
//! // The UI lets the user draw a 3:4 box on `preview`...
//! let rect = Rect { left: 50, top: 20, width: 300, height: 400 };
//! let photo = session.process(rect, scale).unwrap();
//! std::fs::write(photo.filename(), &photo.png).unwrap();
//! ```
#![warn(missing_docs)]

/// Background-removal trait seam.
pub mod background;
/// White-background compositing and print-resolution output.
pub mod compositor;
mod error;
/// Face detection traits and data types.
pub mod face_detector;
/// Preview-to-source crop coordinate mapping.
pub mod geometry;
/// EXIF correction and user rotation/mirroring.
pub mod orientation;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;
mod session;
/// Face-centered pre-crop heuristic.
pub mod smart_crop;

pub use background::BackgroundRemover;
pub use compositor::{
    compose, encode_png, EXPORT_FILENAME, OUTPUT_DPI, OUTPUT_HEIGHT, OUTPUT_WIDTH,
};
/// Error type returned by docphoto operations.
pub use error::DocPhotoError;
pub use face_detector::{FaceBounds, FaceDetector};
pub use geometry::{map_to_source, PreviewScale, Rect};
pub use orientation::{OrientationState, Rotation};
#[cfg(feature = "rustface")]
pub use rustface_backend::RustfaceDetector;
pub use session::{EditSession, ProcessedPhoto};
pub use smart_crop::SmartCropParams;
