//! Conditional resize and vector-to-raster transcoding.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, RgbaImage};
use resvg::{tiny_skia, usvg};

use crate::{ImageError, Result};

/// Raster extensions a vector source can be transcoded into.
const RASTER_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Returns true if the source looks like a vector image.
///
/// The check is destination-agnostic: the source URL path (query and
/// fragment stripped) ends in `.svg`, or the reported content type says so.
pub fn is_vector_source(source_url: &str, content_type: Option<&str>) -> bool {
    let path = source_url
        .split(['?', '#'])
        .next()
        .unwrap_or(source_url)
        .to_ascii_lowercase();
    path.ends_with(".svg")
        || content_type.is_some_and(|ct| ct.contains("image/svg"))
}

/// Applies the requested size bounds and destination-extension transcode.
///
/// Raster sources are resized to fit inside the `width`/`height` box without
/// ever enlarging; a source that already fits is returned unchanged. Vector
/// sources with a png/jpg/jpeg destination are rasterized at the bounded
/// size; other vector destinations pass through untouched.
pub fn transform(
    bytes: &[u8],
    content_type: Option<&str>,
    source_url: &str,
    dest_extension: &str,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<Vec<u8>> {
    if is_vector_source(source_url, content_type) {
        let ext = dest_extension.to_ascii_lowercase();
        if RASTER_EXTENSIONS.contains(&ext.as_str()) {
            return rasterize_svg(bytes, &ext, width, height);
        }
        return Ok(bytes.to_vec());
    }

    if width.is_some() || height.is_some() {
        return resize_raster(bytes, dest_extension, width, height);
    }

    Ok(bytes.to_vec())
}

/// Computes output dimensions that fit inside the requested box, preserve
/// aspect ratio, and never exceed the native dimensions.
fn fit_within(
    native_w: u32,
    native_h: u32,
    width: Option<u32>,
    height: Option<u32>,
) -> (u32, u32) {
    let max_w = width.unwrap_or(native_w).min(native_w);
    let max_h = height.unwrap_or(native_h).min(native_h);
    if native_w <= max_w && native_h <= max_h {
        return (native_w, native_h);
    }
    let scale = (max_w as f64 / native_w as f64).min(max_h as f64 / native_h as f64);
    let out_w = ((native_w as f64 * scale).round() as u32).max(1);
    let out_h = ((native_h as f64 * scale).round() as u32).max(1);
    (out_w, out_h)
}

fn resize_raster(
    bytes: &[u8],
    dest_extension: &str,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ImageError::Transcode(format!("failed to decode image: {e}")))?;
    let (native_w, native_h) = img.dimensions();
    let (out_w, out_h) = fit_within(native_w, native_h, width, height);

    if (out_w, out_h) == (native_w, native_h) {
        return Ok(bytes.to_vec());
    }

    let format = ImageFormat::from_extension(dest_extension)
        .or_else(|| image::guess_format(bytes).ok())
        .unwrap_or(ImageFormat::Png);
    let resized = img.resize_exact(out_w, out_h, FilterType::Lanczos3);
    encode(resized, format)
}

fn rasterize_svg(
    bytes: &[u8],
    dest_extension: &str,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<Vec<u8>> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &options)
        .map_err(|e| ImageError::Transcode(format!("failed to parse SVG: {e}")))?;

    let size = tree.size();
    let native_w = size.width().round().max(1.0) as u32;
    let native_h = size.height().round().max(1.0) as u32;
    let (out_w, out_h) = fit_within(native_w, native_h, width, height);

    let mut pixmap = tiny_skia::Pixmap::new(out_w, out_h)
        .ok_or_else(|| ImageError::Transcode("zero-sized render target".to_string()))?;
    let scale = tiny_skia::Transform::from_scale(
        out_w as f32 / size.width(),
        out_h as f32 / size.height(),
    );
    resvg::render(&tree, scale, &mut pixmap.as_mut());

    let rgba = unpremultiply(pixmap.data());
    let img = RgbaImage::from_raw(out_w, out_h, rgba)
        .ok_or_else(|| ImageError::Transcode("pixel buffer size mismatch".to_string()))?;

    let format = ImageFormat::from_extension(dest_extension).unwrap_or(ImageFormat::Png);
    encode(DynamicImage::ImageRgba8(img), format)
}

/// Converts premultiplied RGBA pixels to straight alpha.
fn unpremultiply(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for px in data.chunks(4) {
        let a = px[3] as f32 / 255.0;
        if a > 0.0 {
            out.push((px[0] as f32 / a).min(255.0) as u8);
            out.push((px[1] as f32 / a).min(255.0) as u8);
            out.push((px[2] as f32 / a).min(255.0) as u8);
            out.push(px[3]);
        } else {
            out.extend_from_slice(&[0, 0, 0, 0]);
        }
    }
    out
}

fn encode(img: DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    // The jpeg encoder rejects alpha channels.
    let img = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format)
        .map_err(|e| ImageError::Transcode(format!("failed to encode image: {e}")))?;
    Ok(out.into_inner())
}
