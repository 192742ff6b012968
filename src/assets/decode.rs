use anyhow::Context;

use crate::{assets::raster::RasterImage, foundation::error::MorphResult};

/// Decode encoded image bytes (PNG, JPEG, ...) into a straight-alpha RGBA8 raster.
pub fn decode_image(bytes: &[u8]) -> MorphResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(raster_from_dynamic(dyn_img))
}

/// Convert an already-decoded `image` buffer.
pub fn raster_from_dynamic(img: image::DynamicImage) -> RasterImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    RasterImage {
        width,
        height,
        rgba: rgba.into_raw(),
        cache_key: None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
