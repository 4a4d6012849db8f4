//! Final document-photo assembly: background removal, white fill, and
//! resampling to print resolution.

use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageEncoder, Rgb, RgbImage, RgbaImage};
use log::debug;

use crate::background::BackgroundRemover;
use crate::error::DocPhotoError;

/// Output width in pixels: 3 cm at 300 DPI.
///
/// `OUTPUT_WIDTH` and [`OUTPUT_HEIGHT`] are a paired external requirement —
/// if the DPI assumption ever changes, both must change together.
pub const OUTPUT_WIDTH: u32 = 354;

/// Output height in pixels: 4 cm at 300 DPI. See [`OUTPUT_WIDTH`].
pub const OUTPUT_HEIGHT: u32 = 472;

/// Print density both output constants are derived from.
pub const OUTPUT_DPI: u32 = 300;

/// Fixed filename the finished photo is offered under.
pub const EXPORT_FILENAME: &str = "foto_3x4_final.png";

/// Composite a segmented subject over an opaque white canvas.
///
/// Alpha-correct blending, not a hard cutout: fully transparent pixels stay
/// white, opaque pixels replace it, partial alpha blends proportionally so
/// hair and shoulder edges stay smooth.
fn over_white(cutout: &RgbaImage) -> RgbImage {
    let (width, height) = (cutout.width(), cutout.height());
    let mut canvas = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    for (x, y, pixel) in cutout.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        if a == 0 {
            continue;
        }
        let alpha = a as f32 / 255.0;
        let inv_alpha = 1.0 - alpha;
        let out = Rgb([
            (r as f32 * alpha + 255.0 * inv_alpha).round() as u8,
            (g as f32 * alpha + 255.0 * inv_alpha).round() as u8,
            (b as f32 * alpha + 255.0 * inv_alpha).round() as u8,
        ]);
        canvas.put_pixel(x, y, out);
    }

    canvas
}

/// Produce the final 354×472 document photo from a high-resolution crop.
///
/// Pipeline: background removal → white canvas composite → flatten to
/// opaque RGB → Lanczos resample to exactly [`OUTPUT_WIDTH`] ×
/// [`OUTPUT_HEIGHT`]. The caller supplies a 3:4 crop; a crop with a
/// different aspect ratio is resampled anyway and will appear stretched.
pub fn compose(
    crop: &DynamicImage,
    remover: &dyn BackgroundRemover,
) -> Result<RgbImage, DocPhotoError> {
    if crop.width() == 0 || crop.height() == 0 {
        return Err(DocPhotoError::ZeroDimensions);
    }

    let cutout = remover.remove(crop)?;
    if cutout.dimensions() != (crop.width(), crop.height()) {
        return Err(DocPhotoError::SegmentationFailed(format!(
            "remover returned {}x{} for a {}x{} input",
            cutout.width(),
            cutout.height(),
            crop.width(),
            crop.height()
        )));
    }

    let flattened = over_white(&cutout);
    debug!(
        "compositing {}x{} crop to {OUTPUT_WIDTH}x{OUTPUT_HEIGHT}",
        crop.width(),
        crop.height()
    );

    let resized = DynamicImage::ImageRgb8(flattened).resize_exact(
        OUTPUT_WIDTH,
        OUTPUT_HEIGHT,
        FilterType::Lanczos3,
    );
    Ok(resized.to_rgb8())
}

/// Encode an opaque RGB image as PNG.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, DocPhotoError> {
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new(&mut buffer);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| DocPhotoError::Encode(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// Remover that marks everything opaque foreground.
    struct KeepAll;

    impl BackgroundRemover for KeepAll {
        fn remove(&self, image: &DynamicImage) -> Result<RgbaImage, DocPhotoError> {
            Ok(image.to_rgba8())
        }
    }

    /// Remover that always fails.
    struct Broken;

    impl BackgroundRemover for Broken {
        fn remove(&self, _image: &DynamicImage) -> Result<RgbaImage, DocPhotoError> {
            Err(DocPhotoError::SegmentationFailed("model exploded".into()))
        }
    }

    /// Remover that returns the wrong dimensions.
    struct WrongSize;

    impl BackgroundRemover for WrongSize {
        fn remove(&self, _image: &DynamicImage) -> Result<RgbaImage, DocPhotoError> {
            Ok(RgbaImage::new(10, 10))
        }
    }

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            Rgb(rgb),
        ))
    }

    #[test]
    fn output_is_exactly_354x472() {
        let crop = solid(1800, 2400, [40, 80, 120]);
        let out = compose(&crop, &KeepAll).unwrap();
        assert_eq!((out.width(), out.height()), (OUTPUT_WIDTH, OUTPUT_HEIGHT));
    }

    #[test]
    fn transparent_background_becomes_white() {
        let mut rgba = RgbaImage::from_pixel(4, 4, Rgba([10, 200, 30, 0]));
        // One opaque subject pixel in a transparent field.
        rgba.put_pixel(1, 1, Rgba([10, 200, 30, 255]));
        let rgb = over_white(&rgba);
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(rgb.get_pixel(1, 1), &Rgb([10, 200, 30]));
    }

    #[test]
    fn partial_alpha_blends_toward_white() {
        let rgba = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128]));
        let rgb = over_white(&rgba);
        let pixel = rgb.get_pixel(0, 0).0;
        // ~50% black over white lands near mid-gray on every channel.
        for channel in pixel {
            assert!((channel as i16 - 127).abs() <= 2, "channel {channel}");
        }
    }

    #[test]
    fn remover_failure_propagates_as_segmentation_failed() {
        let crop = solid(300, 400, [0, 0, 0]);
        let err = compose(&crop, &Broken).unwrap_err();
        assert!(matches!(err, DocPhotoError::SegmentationFailed(_)));
    }

    #[test]
    fn dimension_mismatch_is_a_segmentation_failure() {
        let crop = solid(300, 400, [0, 0, 0]);
        let err = compose(&crop, &WrongSize).unwrap_err();
        assert!(matches!(err, DocPhotoError::SegmentationFailed(_)));
    }

    #[test]
    fn encode_png_produces_png_magic() {
        let crop = solid(300, 400, [200, 100, 50]);
        let out = compose(&crop, &KeepAll).unwrap();
        let png = encode_png(&out).unwrap();
        assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn uniform_input_survives_resampling() {
        let crop = solid(600, 800, [40, 80, 120]);
        let out = compose(&crop, &KeepAll).unwrap();
        // A solid color is invariant under any resampling filter.
        assert_eq!(out.get_pixel(0, 0), &Rgb([40, 80, 120]));
        assert_eq!(
            out.get_pixel(OUTPUT_WIDTH - 1, OUTPUT_HEIGHT - 1),
            &Rgb([40, 80, 120])
        );
    }
}
