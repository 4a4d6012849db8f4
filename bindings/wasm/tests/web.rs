use docphoto_wasm::PhotoSession;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

fn make_test_png(width: u32, height: u32) -> Vec<u8> {
    let mut img = RgbImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ]);
    }

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buffer
}

fn rect_value(left: u32, top: u32, width: u32, height: u32) -> JsValue {
    let obj = js_sys::Object::new();
    js_sys::Reflect::set(&obj, &"left".into(), &JsValue::from(left)).unwrap();
    js_sys::Reflect::set(&obj, &"top".into(), &JsValue::from(top)).unwrap();
    js_sys::Reflect::set(&obj, &"width".into(), &JsValue::from(width)).unwrap();
    js_sys::Reflect::set(&obj, &"height".into(), &JsValue::from(height)).unwrap();
    JsValue::from(obj)
}

#[wasm_bindgen_test]
fn preview_reports_scale_and_dimensions() {
    let png = make_test_png(1000, 1500);
    let mut session = PhotoSession::new(&png).unwrap();

    let preview = session.preview(500).unwrap();
    let width = js_sys::Reflect::get(&preview, &"width".into()).unwrap();
    let scale = js_sys::Reflect::get(&preview, &"scale".into()).unwrap();

    assert_eq!(width.as_f64().unwrap(), 500.0);
    assert!((scale.as_f64().unwrap() - 0.5).abs() < 1e-9);
}

#[wasm_bindgen_test]
fn crop_then_compose_produces_354x472() {
    let png = make_test_png(1000, 1500);
    let mut session = PhotoSession::new(&png).unwrap();

    session.preview(500).unwrap();
    let crop_png = session.crop(rect_value(50, 50, 300, 400)).unwrap();
    assert!(!crop_png.is_empty());

    // Stand in for the JS segmentation model: the crop itself, fully opaque.
    let result = session.compose(&crop_png).unwrap();
    let width = js_sys::Reflect::get(&result, &"width".into()).unwrap();
    let height = js_sys::Reflect::get(&result, &"height".into()).unwrap();
    let filename = js_sys::Reflect::get(&result, &"filename".into()).unwrap();

    assert_eq!(width.as_f64().unwrap(), 354.0);
    assert_eq!(height.as_f64().unwrap(), 472.0);
    assert_eq!(filename.as_string().unwrap(), "foto_3x4_final.png");
}

#[wasm_bindgen_test]
fn crop_keeps_alpha_for_the_segmentation_model() {
    // A semi-transparent RGBA upload must reach the JS model with its alpha
    // channel intact, not flattened to RGB.
    let img = image::RgbaImage::from_pixel(1000, 1500, image::Rgba([10, 20, 30, 128]));
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(img.as_raw(), 1000, 1500, ExtendedColorType::Rgba8)
        .unwrap();

    let mut session = PhotoSession::new(&png).unwrap();
    session.preview(500).unwrap();
    let crop_png = session.crop(rect_value(0, 0, 300, 400)).unwrap();

    let crop = image::load_from_memory(&crop_png).unwrap();
    assert!(crop.color().has_alpha());
    assert_eq!(crop.to_rgba8().get_pixel(0, 0).0[3], 128);
}

#[wasm_bindgen_test]
fn crop_without_preview_is_an_error() {
    let png = make_test_png(400, 500);
    let mut session = PhotoSession::new(&png).unwrap();
    assert!(session.crop(rect_value(0, 0, 100, 100)).is_err());
}

#[wasm_bindgen_test]
fn out_of_bounds_crop_is_rejected() {
    let png = make_test_png(1000, 1500);
    let mut session = PhotoSession::new(&png).unwrap();
    session.preview(500).unwrap();
    assert!(session.crop(rect_value(400, 700, 300, 400)).is_err());
}

#[wasm_bindgen_test]
fn rotation_swaps_preview_dimensions() {
    let png = make_test_png(1000, 1500);
    let mut session = PhotoSession::new(&png).unwrap();
    session.rotate_cw();

    let preview = session.preview(500).unwrap();
    let height = js_sys::Reflect::get(&preview, &"height".into()).unwrap();
    // 1500x1000 after rotation → 500x333 preview.
    assert_eq!(height.as_f64().unwrap(), 333.0);
}

#[wasm_bindgen_test]
fn invalid_input_returns_error() {
    assert!(PhotoSession::new(b"not an image").is_err());
}
