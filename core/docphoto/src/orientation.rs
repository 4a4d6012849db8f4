//! Decoding with EXIF correction and user-requested orientation.
//!
//! Order is fixed and load-bearing: EXIF correction happens at decode time,
//! then mirroring, then the user's 90°-multiple rotation. Swapping mirror and
//! rotation changes the pixel layout for any non-zero rotation.

use std::io::Cursor;

use image::{DynamicImage, ImageDecoder, ImageReader};
use log::{debug, warn};

use crate::error::DocPhotoError;

/// User-requested rotation, clockwise, in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// No rotation.
    #[default]
    Deg0,
    /// 90° clockwise.
    Deg90,
    /// 180°.
    Deg180,
    /// 270° clockwise.
    Deg270,
}

impl Rotation {
    /// One quarter turn clockwise.
    pub fn quarter_turn_cw(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// One quarter turn counter-clockwise.
    pub fn quarter_turn_ccw(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg270,
            Rotation::Deg90 => Rotation::Deg0,
            Rotation::Deg180 => Rotation::Deg90,
            Rotation::Deg270 => Rotation::Deg180,
        }
    }

    /// Clockwise degrees, always a multiple of 90.
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

/// Per-session orientation controls, reset whenever a new image is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrientationState {
    /// User-requested rotation, applied after mirroring.
    pub rotation: Rotation,
    /// Horizontal mirror, applied first.
    pub mirrored: bool,
}

/// Decode image bytes and apply the embedded EXIF orientation.
///
/// Phone cameras record sensor orientation as metadata instead of rotating
/// pixels; correcting it here means every downstream coordinate is in
/// upright display space. Formats without decoder-level metadata support
/// fall back to a plain decode.
pub fn decode_oriented(bytes: &[u8]) -> Result<DynamicImage, DocPhotoError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DocPhotoError::Decode(e.to_string()))?;

    let image = match reader.into_decoder() {
        Ok(mut decoder) => {
            let orientation = decoder
                .orientation()
                .unwrap_or(image::metadata::Orientation::NoTransforms);
            let mut image = DynamicImage::from_decoder(decoder)
                .map_err(|e| DocPhotoError::Decode(e.to_string()))?;
            if orientation != image::metadata::Orientation::NoTransforms {
                debug!("applying EXIF orientation {orientation:?}");
                image.apply_orientation(orientation);
            }
            image
        }
        Err(e) => {
            warn!("decoder interface unavailable, decoding without EXIF: {e}");
            image::load_from_memory(bytes).map_err(|e| DocPhotoError::Decode(e.to_string()))?
        }
    };

    if image.width() == 0 || image.height() == 0 {
        return Err(DocPhotoError::ZeroDimensions);
    }
    Ok(image)
}

/// Apply the user's orientation controls to an EXIF-corrected image.
///
/// Mirror first, then rotate. A 90° or 270° rotation swaps width and height;
/// no pixels are ever clipped.
pub fn apply(image: &DynamicImage, state: OrientationState) -> DynamicImage {
    let mirrored = if state.mirrored {
        image.fliph()
    } else {
        image.clone()
    };

    match state.rotation {
        Rotation::Deg0 => mirrored,
        Rotation::Deg90 => mirrored.rotate90(),
        Rotation::Deg180 => mirrored.rotate180(),
        Rotation::Deg270 => mirrored.rotate270(),
    }
}
