//! Drawable sources.
//!
//! A [`Source`] knows its intrinsic pixel size and how to draw a region of itself into a
//! destination rectangle of a [`Surface`]. Raster sources resample; vector sources rasterize
//! directly at the destination resolution.

use crate::effects::filter::FilterExpr;
use crate::foundation::core::{Rect, Size};
use crate::foundation::error::RasterfitResult;
use crate::render::surface::Surface;

pub(crate) mod raster;
pub(crate) mod vector;

/// Something that can be drawn into a [`Surface`].
pub trait Source {
    /// Natural size in pixels.
    fn intrinsic_size(&self) -> Size;

    /// Draw the `src` region (in intrinsic pixels) into `dst` (in surface pixels) with `filter`
    /// applied to the drawn content.
    fn draw_into(
        &self,
        surface: &mut Surface,
        src: Rect,
        dst: Rect,
        filter: &FilterExpr,
    ) -> RasterfitResult<()>;
}

impl Source for Surface {
    fn intrinsic_size(&self) -> Size {
        self.size()
    }

    fn draw_into(
        &self,
        surface: &mut Surface,
        src: Rect,
        dst: Rect,
        filter: &FilterExpr,
    ) -> RasterfitResult<()> {
        surface.draw_image(self.to_image()?, src, dst, filter)
    }
}

impl<S: Source + ?Sized> Source for &S {
    fn intrinsic_size(&self) -> Size {
        (**self).intrinsic_size()
    }

    fn draw_into(
        &self,
        surface: &mut Surface,
        src: Rect,
        dst: Rect,
        filter: &FilterExpr,
    ) -> RasterfitResult<()> {
        (**self).draw_into(surface, src, dst, filter)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/mod.rs"]
mod tests;
