use std::sync::Arc;

use anyhow::Context;

use crate::assets::Source;
use crate::effects::filter::FilterExpr;
use crate::foundation::core::{Rect, Size};
use crate::foundation::error::{RasterfitError, RasterfitResult};
use crate::render::surface::{Surface, image_paint, pixmap_from_premul_bytes};

/// Parsed SVG document.
///
/// Drawing rasterizes the requested region straight at the destination size, so the result is
/// never an upscaled bitmap. Only the part that lands on the target surface is rasterized.
#[derive(Clone)]
pub struct VectorSource {
    tree: Arc<usvg::Tree>,
    size: Size,
}

impl std::fmt::Debug for VectorSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorSource")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl VectorSource {
    /// Parse SVG bytes.
    pub fn parse(bytes: &[u8]) -> RasterfitResult<Self> {
        let opts = usvg::Options::default();
        let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
        Self::from_tree(tree)
    }

    /// Wrap an already parsed tree.
    pub fn from_tree(tree: usvg::Tree) -> RasterfitResult<Self> {
        let s = tree.size();
        let size = Size::new(to_px(s.width())?, to_px(s.height())?);
        Ok(Self {
            tree: Arc::new(tree),
            size,
        })
    }

    /// Rasterize the `src` region of the document into a `width x height` premultiplied buffer.
    pub(crate) fn rasterize(&self, src: Rect, width: u32, height: u32) -> RasterfitResult<Vec<u8>> {
        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            RasterfitError::resource(width, height, "failed to allocate svg pixmap")
        })?;

        let sx = (f64::from(width) / src.width()) as f32;
        let sy = (f64::from(height) / src.height()) as f32;
        let xform = resvg::tiny_skia::Transform::from_row(
            sx,
            0.0,
            0.0,
            sy,
            -(src.x0 as f32) * sx,
            -(src.y0 as f32) * sy,
        );

        resvg::render(&self.tree, xform, &mut pixmap.as_mut());
        Ok(pixmap.data().to_vec())
    }
}

impl Source for VectorSource {
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
        for (name, r) in [("source", src), ("destination", dst)] {
            if !r.is_finite() || r.width() <= 0.0 || r.height() <= 0.0 {
                return Err(RasterfitError::config(format!(
                    "svg {name} rect must be finite and non-empty, got {r:?}"
                )));
            }
        }

        // Only the part of `dst` on the surface is rasterized; cover overflow can be far larger
        // than any pixmap.
        let visible = dst.intersect(surface.size().to_rect());
        if visible.width() <= 0.0 || visible.height() <= 0.0 {
            tracing::trace!(?dst, "svg destination is off the surface");
            return Ok(());
        }
        let visible = Rect::new(
            visible.x0.floor(),
            visible.y0.floor(),
            visible.x1.ceil(),
            visible.y1.ceil(),
        );
        let kx = src.width() / dst.width();
        let ky = src.height() / dst.height();
        let region = Rect::new(
            src.x0 + (visible.x0 - dst.x0) * kx,
            src.y0 + (visible.y0 - dst.y0) * ky,
            src.x0 + (visible.x1 - dst.x0) * kx,
            src.y0 + (visible.y1 - dst.y0) * ky,
        );
        // Bounded by the surface size.
        let w = visible.width() as u32;
        let h = visible.height() as u32;
        tracing::trace!(w, h, "rasterize visible svg region at destination size");

        let bytes = self.rasterize(region, w, h)?;
        let paint = image_paint(pixmap_from_premul_bytes(&bytes, w, h)?);
        let raster = Rect::new(0.0, 0.0, f64::from(w), f64::from(h));
        surface.draw_image(paint, raster, visible, filter)
    }
}

fn to_px(v: f32) -> RasterfitResult<u32> {
    if !v.is_finite() || v <= 0.0 {
        return Err(RasterfitError::config("svg has invalid width/height"));
    }
    Ok((v.ceil() as u32).max(1))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/vector.rs"]
mod tests;
