//! Fit-mode geometry.
//!
//! [`calculate_final_layout`] turns a source size and a [`ResizeConfig`] into exact pixel results:
//! the scaled image size, the output size, and where the image sits inside the output.
//!
//! Per-mode scale `s` (uniform unless noted):
//!
//! | mode      | rule                                                                  | output          |
//! |-----------|-----------------------------------------------------------------------|-----------------|
//! | cover     | `max(tw/sw, th/sh)`                                                   | target + pad    |
//! | contain   | `min(tw/sw, th/sh)`, clamped to `1` with `without_enlargement`        | target + pad    |
//! | fill      | image is exactly the target (non-uniform)                             | target + pad    |
//! | max_fit   | `min(1, min over set axes of t/s)`                                    | image + pad     |
//! | min_fit   | one axis set: `max(1, t/s)`; both set: each axis `max(source, target)` | image + pad     |
//!
//! All fractional values round half away from zero. The image is centered in the padding-adjusted
//! interior; under cover the offset is negative and the overflow is clipped by the draw.

use crate::foundation::core::{Position, Size};
use crate::foundation::error::{RasterfitError, RasterfitResult};
use crate::foundation::math::{round_dim, round_px};
use crate::layout::config::{Bounds, Fit, FitMode, ResizeConfig};
use crate::layout::padding::Edges;

/// Computed geometry of one composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct LayoutResult {
    /// Size the source is drawn at.
    pub image_size: Size,
    /// Size of the result surface, padding included.
    pub output_size: Size,
    /// Top-left corner of the image inside the output.
    pub position: Position,
}

impl LayoutResult {
    /// Identity layout: the source drawn 1:1 at the origin.
    pub fn intrinsic(size: Size) -> Self {
        Self {
            image_size: size,
            output_size: size,
            position: Position::default(),
        }
    }
}

/// Compute the final layout of a `source_w x source_h` source under `config`.
///
/// Pure and deterministic. Only a zero-sized source is rejected; `config` is valid by
/// construction.
#[tracing::instrument(level = "trace", skip(config), fields(mode = %config.mode()))]
pub fn calculate_final_layout(
    source_w: u32,
    source_h: u32,
    config: &ResizeConfig,
) -> RasterfitResult<LayoutResult> {
    if source_w == 0 || source_h == 0 {
        return Err(RasterfitError::config(format!(
            "{}: source size must be non-zero, got {source_w}x{source_h}",
            config.mode()
        )));
    }

    let sw = f64::from(source_w);
    let sh = f64::from(source_h);
    let pad = config.edges();

    let (image_size, inner) = match *config.fit() {
        Fit::Cover(t) => {
            let (tw, th) = (f64::from(t.width()), f64::from(t.height()));
            let s = (tw / sw).max(th / sh);
            (scaled(sw, sh, s), Size::new(t.width(), t.height()))
        }
        Fit::Contain {
            target,
            without_enlargement,
            ..
        } => {
            let (tw, th) = (f64::from(target.width()), f64::from(target.height()));
            let mut s = (tw / sw).min(th / sh);
            if without_enlargement && s > 1.0 {
                s = 1.0;
            }
            (
                scaled(sw, sh, s),
                Size::new(target.width(), target.height()),
            )
        }
        Fit::Fill(t) => {
            let size = Size::new(t.width(), t.height());
            (size, size)
        }
        Fit::MaxFit(b) => {
            let s = bound_ratios(sw, sh, b)
                .fold(1.0_f64, |acc, r| acc.min(r));
            let image = scaled(sw, sh, s);
            (image, image)
        }
        Fit::MinFit(b) => {
            let image = match (b.width(), b.height()) {
                (Some(tw), Some(th)) => Size::new(source_w.max(tw), source_h.max(th)),
                _ => {
                    let s = bound_ratios(sw, sh, b).fold(1.0_f64, |acc, r| acc.max(r));
                    scaled(sw, sh, s)
                }
            };
            (image, image)
        }
    };

    let layout = LayoutResult {
        image_size,
        output_size: padded(inner, pad),
        position: Position::new(
            center(pad.left, inner.width, image_size.width),
            center(pad.top, inner.height, image_size.height),
        ),
    };
    debug_assert!(config.mode().has_fixed_output() || inner == image_size);
    debug_assert!(config.mode() != FitMode::Fill || layout.image_size == inner);
    Ok(layout)
}

fn bound_ratios(sw: f64, sh: f64, b: Bounds) -> impl Iterator<Item = f64> {
    let rw = b.width().map(|w| f64::from(w) / sw);
    let rh = b.height().map(|h| f64::from(h) / sh);
    rw.into_iter().chain(rh)
}

fn scaled(sw: f64, sh: f64, s: f64) -> Size {
    Size::new(round_dim(sw * s), round_dim(sh * s))
}

fn padded(inner: Size, pad: Edges) -> Size {
    Size::new(
        inner.width.saturating_add(pad.horizontal()),
        inner.height.saturating_add(pad.vertical()),
    )
}

fn center(pad_start: u32, inner: u32, image: u32) -> i32 {
    let offset = round_px((f64::from(inner) - f64::from(image)) / 2.0);
    let v = i64::from(pad_start) + offset;
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
#[path = "../../tests/unit/layout/calc.rs"]
mod tests;
