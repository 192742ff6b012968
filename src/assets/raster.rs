use crate::foundation::{
    core::GridPoint,
    error::{MorphError, MorphResult},
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Straight-alpha RGBA8 raster consumed by mesh extraction.
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixel bytes.
    pub rgba: Vec<u8>,
    /// Key under which extracted meshes are cached, if any.
    pub cache_key: Option<String>,
}

impl RasterImage {
    /// Wrap raw RGBA8 bytes, checking the buffer length.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> MorphResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| MorphError::validation("image dimensions overflow"))?;
        if rgba.len() != expected {
            return Err(MorphError::validation(format!(
                "rgba buffer has {} bytes, expected {expected} for {width}x{height}",
                rgba.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba,
            cache_key: None,
        })
    }

    /// Fully transparent image.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width as usize * height as usize * 4],
            cache_key: None,
        }
    }

    /// Attach a cache key.
    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    /// Alpha of pixel `(x, y)`; out-of-bounds reads are transparent.
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4 + 3;
        self.rgba[i]
    }

    /// Overwrite pixel `(x, y)`; out-of-bounds writes are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.rgba[i..i + 4].copy_from_slice(&rgba);
    }
}

/// Largest accepted border of transparent cells around an image.
pub const MAX_PADDING: u32 = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Row-major opacity grid handed to boundary tracing.
///
/// `origin` is the image-space coordinate of cell `(0, 0)`; a padded grid has a negative origin.
/// Padding cells are background for every threshold.
pub struct AlphaGrid {
    width: usize,
    height: usize,
    origin: GridPoint,
    padding: usize,
    alpha: Vec<u8>,
}

impl AlphaGrid {
    /// Build an unpadded grid from raw opacity values.
    pub fn new(width: usize, height: usize, alpha: Vec<u8>) -> MorphResult<Self> {
        if alpha.len() != width * height {
            return Err(MorphError::validation(format!(
                "alpha grid has {} cells, expected {}",
                alpha.len(),
                width * height
            )));
        }
        Ok(Self {
            width,
            height,
            origin: GridPoint::new(0, 0),
            padding: 0,
            alpha,
        })
    }

    /// Extract the alpha channel of `image`, surrounded by `padding` transparent cells.
    ///
    /// Fails when `padding` exceeds [`MAX_PADDING`].
    pub fn from_image(image: &RasterImage, padding: u32) -> MorphResult<Self> {
        if padding > MAX_PADDING {
            return Err(MorphError::validation(format!(
                "padding {padding} exceeds the maximum of {MAX_PADDING}"
            )));
        }
        let pad = padding as usize;
        let width = image.width as usize + 2 * pad;
        let height = image.height as usize + 2 * pad;
        let mut alpha = vec![0u8; width * height];
        for y in 0..image.height {
            let row = (y as usize + pad) * width;
            for x in 0..image.width {
                alpha[row + x as usize + pad] = image.alpha(x, y);
            }
        }
        let p = padding as i32;
        Ok(Self {
            width,
            height,
            origin: GridPoint::new(-p, -p),
            padding: pad,
            alpha,
        })
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Image-space coordinate of cell `(0, 0)`.
    pub fn origin(&self) -> GridPoint {
        self.origin
    }

    /// Opacity at a cell; outside the grid is transparent.
    pub fn get(&self, x: isize, y: isize) -> u8 {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return 0;
        }
        self.alpha[y as usize * self.width + x as usize]
    }

    /// Binarized foreground mask for `threshold`. Padding cells are never foreground.
    pub fn binarize(&self, threshold: u8) -> Vec<bool> {
        let pad = self.padding;
        let inner_x = pad..self.width - pad;
        let inner_y = pad..self.height - pad;
        self.alpha
            .iter()
            .enumerate()
            .map(|(i, &a)| {
                let (x, y) = (i % self.width, i / self.width);
                a >= threshold && inner_x.contains(&x) && inner_y.contains(&y)
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/raster.rs"]
mod tests;
