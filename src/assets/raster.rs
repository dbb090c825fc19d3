use std::path::Path;

use anyhow::Context;

use crate::assets::Source;
use crate::effects::filter::FilterExpr;
use crate::foundation::core::{Rect, Size};
use crate::foundation::error::RasterfitResult;
use crate::foundation::math::premultiply_rgba8_in_place;
use crate::render::surface::{Surface, image_paint, pixmap_from_premul_bytes};

/// Decoded bitmap held as a shareable premultiplied pixmap.
#[derive(Clone)]
pub struct RasterSource {
    size: Size,
    paint: vello_cpu::Image,
}

impl std::fmt::Debug for RasterSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSource")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl RasterSource {
    /// Decode encoded image bytes (any format `image` was built with).
    pub fn decode(bytes: &[u8]) -> RasterfitResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut rgba8_premul = rgba.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Self::from_premul_rgba8(&rgba8_premul, width, height)
    }

    /// Read and decode an image file.
    pub fn open(path: impl AsRef<Path>) -> RasterfitResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read image file '{}'", path.display()))?;
        Self::decode(&bytes)
    }

    /// Wrap premultiplied RGBA8 pixels.
    pub fn from_premul_rgba8(bytes: &[u8], width: u32, height: u32) -> RasterfitResult<Self> {
        let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
        Ok(Self {
            size: Size::new(width, height),
            paint: image_paint(pixmap),
        })
    }

    /// Snapshot a surface.
    pub fn from_surface(surface: &Surface) -> RasterfitResult<Self> {
        Self::from_premul_rgba8(surface.data(), surface.width(), surface.height())
    }
}

impl Source for RasterSource {
    fn intrinsic_size(&self) -> Size {
        self.size
    }

    fn draw_into(
        &self,
        surface: &mut Surface,
        src: Rect,
        dst: Rect,
        filter: &FilterExpr,
    ) -> RasterfitResult<()> {
        surface.draw_image(self.paint.clone(), src, dst, filter)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/raster.rs"]
mod tests;
