//! The one draw routine behind every fit engine and the deferred pipeline.

use crate::assets::Source;
use crate::effects::filter::FilterExpr;
use crate::foundation::color::Color;
use crate::foundation::core::{Position, Rect, Rgba8Premul, Size};
use crate::foundation::error::RasterfitResult;
use crate::layout::calc::LayoutResult;
use crate::layout::padding::Edges;
use crate::render::surface::Surface;

/// Paint `background` over the whole surface, then draw `source` at `layout.position` scaled to
/// `layout.image_size` with `filter` active.
///
/// `surface` must already be `layout.output_size`. Placement outside the surface is clipped.
pub(crate) fn compose<S: Source + ?Sized>(
    surface: &mut Surface,
    source: &S,
    layout: &LayoutResult,
    background: Option<Color>,
    filter: &FilterExpr,
) -> RasterfitResult<()> {
    debug_assert_eq!(surface.size(), layout.output_size);
    if let Some(bg) = background {
        surface.fill_rect(surface.size().to_rect(), bg.to_premul());
    }
    let x = f64::from(layout.position.x);
    let y = f64::from(layout.position.y);
    let dst = Rect::new(
        x,
        y,
        x + f64::from(layout.image_size.width),
        y + f64::from(layout.image_size.height),
    );
    source.draw_into(surface, source.intrinsic_size().to_rect(), dst, filter)
}

/// Crop border rows and columns that are uniformly `background` (transparent without one), keeping
/// `padding` around what is left. Works in place on the composited `surface`.
///
/// Returns the geometry of the trimmed surface. A surface that is all background, or whose content
/// reaches into the padding, keeps its size.
pub(crate) fn trim_empty(
    surface: &mut Surface,
    layout: &LayoutResult,
    background: Option<Color>,
    padding: Edges,
) -> RasterfitResult<LayoutResult> {
    let Some((x, y, content)) = content_bounds(surface, background) else {
        tracing::warn!(
            width = surface.width(),
            height = surface.height(),
            "trim_empty found only background, keeping untrimmed result"
        );
        return Ok(*layout);
    };
    let frame = Size::new(
        content.width.saturating_add(padding.horizontal()),
        content.height.saturating_add(padding.vertical()),
    );
    if frame == surface.size()
        || x < padding.left
        || y < padding.top
        || frame.width > surface.width()
        || frame.height > surface.height()
    {
        return Ok(*layout);
    }

    let fill = background.map_or(Rgba8Premul::transparent(), Color::to_premul);
    surface.reframe((x, y), content, (padding.left, padding.top), frame, fill)?;
    tracing::debug!(
        width = frame.width,
        height = frame.height,
        "trimmed empty borders"
    );
    // Both shifts are bounded by the surface size, which fits in u16.
    let dx = (x - padding.left) as i32;
    let dy = (y - padding.top) as i32;
    Ok(LayoutResult {
        image_size: layout.image_size,
        output_size: frame,
        position: Position::new(layout.position.x - dx, layout.position.y - dy),
    })
}

/// Pixel bounds `(x, y, size)` of everything that differs from `background`.
///
/// `None` when the whole surface is background.
pub(crate) fn content_bounds(surface: &Surface, background: Option<Color>) -> Option<(u32, u32, Size)> {
    let bg = background
        .map_or(Rgba8Premul::transparent(), Color::to_premul)
        .to_array();
    let w = surface.width() as usize;
    let (mut x0, mut y0, mut x1, mut y1) = (usize::MAX, usize::MAX, 0usize, 0usize);
    for (i, px) in surface.data().chunks_exact(4).enumerate() {
        if px == bg {
            continue;
        }
        let (x, y) = (i % w, i / w);
        x0 = x0.min(x);
        y0 = y0.min(y);
        x1 = x1.max(x + 1);
        y1 = y1.max(y + 1);
    }
    (x1 > x0 && y1 > y0).then(|| {
        (
            x0 as u32,
            y0 as u32,
            Size::new((x1 - x0) as u32, (y1 - y0) as u32),
        )
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
