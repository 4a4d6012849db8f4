//! WebAssembly surface for the docphoto pipeline.
//!
//! The browser owns the widgets and the segmentation model; this binding
//! owns the coordinate math and compositing. The flow mirrors the web UI:
//! build a session from upload bytes, adjust orientation, fetch a preview,
//! crop at full resolution, run segmentation in JS, then hand the RGBA
//! cut-out back to `compose` for the white-background 354×472 PNG.

use serde::Deserialize;
use wasm_bindgen::prelude::*;

use docphoto::{BackgroundRemover, DocPhotoError, EditSession, PreviewScale, Rect};
use image::{DynamicImage, RgbaImage};

/// Crop rectangle in preview coordinates, passed as a JavaScript object.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Create a JS `Error` with a machine-readable `code` property.
fn make_error(code: &str, message: &str) -> JsValue {
    let err = js_sys::Error::new(message);
    let _ = js_sys::Reflect::set(&err, &"code".into(), &JsValue::from_str(code));
    JsValue::from(err)
}

fn to_js_error(e: DocPhotoError) -> JsValue {
    let code = match &e {
        DocPhotoError::Decode(_) => "DECODE_ERROR",
        DocPhotoError::ZeroDimensions => "ZERO_DIMENSIONS",
        DocPhotoError::CropOutOfBounds { .. } => "CROP_OUT_OF_BOUNDS",
        DocPhotoError::EmptyCrop => "EMPTY_CROP",
        DocPhotoError::SegmentationFailed(_) => "SEGMENTATION_FAILED",
        DocPhotoError::MissingBackgroundRemover => "MISSING_BACKGROUND_REMOVER",
        DocPhotoError::Encode(_) => "ENCODE_ERROR",
    };
    make_error(code, &e.to_string())
}

fn parse_rect(rect: JsValue) -> Result<Rect, JsValue> {
    let rect: CropRect = serde_wasm_bindgen::from_value(rect)
        .map_err(|e| make_error("INVALID_RECT", &format!("invalid crop rect: {e}")))?;
    Ok(Rect {
        left: rect.left,
        top: rect.top,
        width: rect.width,
        height: rect.height,
    })
}

/// A cut-out already produced by the JS segmentation model.
struct PrecomputedCutout(RgbaImage);

impl BackgroundRemover for PrecomputedCutout {
    fn remove(&self, _image: &DynamicImage) -> Result<RgbaImage, DocPhotoError> {
        Ok(self.0.clone())
    }
}

/// One user's editing session, exported to JavaScript.
#[wasm_bindgen]
pub struct PhotoSession {
    inner: EditSession,
    /// Scale of the most recent preview; crop coordinates arriving from the
    /// UI are interpreted against it.
    scale: Option<PreviewScale>,
    /// The most recent full-resolution crop, awaiting its cut-out.
    pending_crop: Option<DynamicImage>,
}

#[wasm_bindgen]
impl PhotoSession {
    /// Start a session from raw upload or camera-capture bytes.
    #[wasm_bindgen(constructor)]
    pub fn new(bytes: &[u8]) -> Result<PhotoSession, JsValue> {
        let inner = EditSession::from_bytes(bytes).map_err(to_js_error)?;
        Ok(PhotoSession {
            inner,
            scale: None,
            pending_crop: None,
        })
    }

    /// Replace the active image; orientation controls reset.
    #[wasm_bindgen(js_name = "replaceImage")]
    pub fn replace_image(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.inner.replace_image(bytes).map_err(to_js_error)?;
        self.scale = None;
        self.pending_crop = None;
        Ok(())
    }

    /// Rotate a quarter turn clockwise.
    #[wasm_bindgen(js_name = "rotateCw")]
    pub fn rotate_cw(&mut self) {
        self.inner.rotate_cw();
        self.scale = None;
    }

    /// Rotate a quarter turn counter-clockwise.
    #[wasm_bindgen(js_name = "rotateCcw")]
    pub fn rotate_ccw(&mut self) {
        self.inner.rotate_ccw();
        self.scale = None;
    }

    /// Set the horizontal-mirror flag.
    #[wasm_bindgen(js_name = "setMirrored")]
    pub fn set_mirrored(&mut self, mirrored: bool) {
        self.inner.set_mirrored(mirrored);
        self.scale = None;
    }

    /// Enable or disable the face-centered pre-crop.
    #[wasm_bindgen(js_name = "setSmartCrop")]
    pub fn set_smart_crop(&mut self, enabled: bool) {
        self.inner.set_smart_crop(enabled);
        self.scale = None;
    }

    /// Render the working image downscaled for the interactive cropper.
    ///
    /// Returns `{ png: Uint8Array, width, height, scale }`; crop rectangles
    /// passed to [`crop`](Self::crop) are in this preview's coordinates.
    pub fn preview(&mut self, max_width: u32) -> Result<JsValue, JsValue> {
        let (preview, scale) = self.inner.preview(max_width);
        self.scale = Some(scale);

        let png = docphoto::encode_png(&preview.to_rgb8()).map_err(to_js_error)?;
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"png".into(), &js_sys::Uint8Array::from(&png[..]))?;
        js_sys::Reflect::set(&obj, &"width".into(), &JsValue::from(preview.width()))?;
        js_sys::Reflect::set(&obj, &"height".into(), &JsValue::from(preview.height()))?;
        js_sys::Reflect::set(&obj, &"scale".into(), &JsValue::from(scale.factor()))?;
        Ok(JsValue::from(obj))
    }

    /// Cut the rectangle drawn on the preview out of the *full-resolution*
    /// working image and return it as PNG bytes for segmentation.
    ///
    /// The crop keeps the working image's color type — an upload that
    /// carried alpha reaches the segmentation model with it intact.
    ///
    /// @param rect - `{ left, top, width, height }` in preview coordinates
    pub fn crop(&mut self, rect: JsValue) -> Result<Vec<u8>, JsValue> {
        let rect = parse_rect(rect)?;
        let scale = self
            .scale
            .ok_or_else(|| make_error("NO_PREVIEW", "call preview() before crop()"))?;

        let source_rect = docphoto::map_to_source(rect, scale);
        if source_rect.width == 0 || source_rect.height == 0 {
            return Err(to_js_error(DocPhotoError::EmptyCrop));
        }
        let working = self.inner.working_image();
        if !source_rect.contained_in(working.width(), working.height()) {
            return Err(to_js_error(DocPhotoError::CropOutOfBounds {
                left: source_rect.left,
                top: source_rect.top,
                width: source_rect.width,
                height: source_rect.height,
                image_width: working.width(),
                image_height: working.height(),
            }));
        }

        let crop = working.crop_imm(
            source_rect.left,
            source_rect.top,
            source_rect.width,
            source_rect.height,
        );
        let mut png = Vec::new();
        crop.write_to(
            &mut std::io::Cursor::new(&mut png),
            image::ImageFormat::Png,
        )
        .map_err(|e| to_js_error(DocPhotoError::Encode(e.to_string())))?;
        self.pending_crop = Some(crop);
        Ok(png)
    }

    /// Composite a segmented cut-out (RGBA PNG from the JS model) over white
    /// and produce the final 354×472 document photo.
    ///
    /// Returns `{ png: Uint8Array, width, height, filename }`.
    pub fn compose(&mut self, cutout_png: &[u8]) -> Result<JsValue, JsValue> {
        let crop = self
            .pending_crop
            .as_ref()
            .ok_or_else(|| make_error("NO_CROP", "call crop() before compose()"))?;

        let cutout = image::load_from_memory(cutout_png)
            .map_err(|e| to_js_error(DocPhotoError::SegmentationFailed(e.to_string())))?
            .to_rgba8();

        let remover = PrecomputedCutout(cutout);
        let composed = docphoto::compose(crop, &remover).map_err(to_js_error)?;
        let png = docphoto::encode_png(&composed).map_err(to_js_error)?;

        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"png".into(), &js_sys::Uint8Array::from(&png[..]))?;
        js_sys::Reflect::set(&obj, &"width".into(), &JsValue::from(composed.width()))?;
        js_sys::Reflect::set(&obj, &"height".into(), &JsValue::from(composed.height()))?;
        js_sys::Reflect::set(
            &obj,
            &"filename".into(),
            &JsValue::from_str(docphoto::EXPORT_FILENAME),
        )?;
        Ok(JsValue::from(obj))
    }
}
