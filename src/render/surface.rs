use std::sync::Arc;

use crate::effects::filter::FilterExpr;
use crate::foundation::core::{Affine, Rect, Rgba8Premul, Size};
use crate::foundation::error::{RasterfitError, RasterfitResult};
use crate::foundation::math::{mul_div255_u8, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// Owned premultiplied RGBA8 drawing surface backed by a `vello_cpu` pixmap.
///
/// Dimensions are limited to `1..=u16::MAX` on both axes.
pub struct Surface {
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// Allocate a transparent surface.
    pub fn new(width: u32, height: u32) -> RasterfitResult<Self> {
        let (w, h) = pixmap_dims(width, height)?;
        Ok(Self {
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Build a surface from premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(bytes: &[u8], width: u32, height: u32) -> RasterfitResult<Self> {
        Ok(Self {
            pixmap: pixmap_from_premul_bytes(bytes, width, height)?,
        })
    }

    /// Build a surface from straight-alpha RGBA8 bytes.
    pub fn from_straight_rgba8(bytes: &[u8], width: u32, height: u32) -> RasterfitResult<Self> {
        let mut tmp = bytes.to_vec();
        premultiply_rgba8_in_place(&mut tmp);
        Self::from_premul_rgba8(&tmp, width, height)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.pixmap.width())
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.pixmap.height())
    }

    /// Size in pixels.
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    /// Copy out straight-alpha RGBA8 bytes.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data().to_vec();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }

    /// Read one pixel, `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        let i = self.index(x, y)?;
        let d = &self.data()[i..i + 4];
        Some(Rgba8Premul {
            r: d[0],
            g: d[1],
            b: d[2],
            a: d[3],
        })
    }

    /// Overwrite one pixel. Returns `false` outside the surface.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgba8Premul) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.data_mut()[i..i + 4].copy_from_slice(&px.to_array());
                true
            }
            None => false,
        }
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.data_mut().fill(0);
    }

    /// Composite a solid color over `rect`, clipped to the surface.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8Premul) {
        if color.a == 0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        let stride = self.width() as usize * 4;
        let inv = 255u16 - u16::from(color.a);
        let src = color.to_array();
        let data = self.data_mut();
        for y in y0..y1 {
            let row = &mut data[y * stride + x0 * 4..y * stride + x1 * 4];
            for d in row.chunks_exact_mut(4) {
                if inv == 0 {
                    d.copy_from_slice(&src);
                    continue;
                }
                for c in 0..4 {
                    d[c] = src[c].saturating_add(mul_div255_u8(u16::from(d[c]), inv));
                }
            }
        }
    }

    /// Reset `rect` to transparent, clipped to the surface.
    pub fn clear_rect(&mut self, rect: Rect) {
        self.set_rect(rect, Rgba8Premul::transparent());
    }

    /// Overwrite `rect` with `px`, clipped to the surface.
    fn set_rect(&mut self, rect: Rect, px: Rgba8Premul) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        let stride = self.width() as usize * 4;
        let px = px.to_array();
        let data = self.data_mut();
        for y in y0..y1 {
            for d in data[y * stride + x0 * 4..y * stride + x1 * 4].chunks_exact_mut(4) {
                d.copy_from_slice(&px);
            }
        }
    }

    /// Shrink the surface to `frame` in place, moving the `region` found at `(sx, sy)` to `at`.
    ///
    /// Pixels of the new frame outside the moved region are set to `fill`. The region must fit
    /// both the surface and the frame, `at` may not lie right of or below `(sx, sy)`, and the frame
    /// may not be larger than the surface. The pixel buffer is reused.
    pub(crate) fn reframe(
        &mut self,
        (sx, sy): (u32, u32),
        region: Size,
        (ax, ay): (u32, u32),
        frame: Size,
        fill: Rgba8Premul,
    ) -> RasterfitResult<()> {
        let within = |o: u32, len: u32, limit: u32| o.checked_add(len).is_some_and(|e| e <= limit);
        let fits = ax <= sx
            && ay <= sy
            && frame.width <= self.width()
            && frame.height <= self.height()
            && within(sx, region.width, self.width())
            && within(sy, region.height, self.height())
            && within(ax, region.width, frame.width)
            && within(ay, region.height, frame.height);
        if !fits {
            return Err(RasterfitError::config(format!(
                "cannot move a {}x{} region from ({sx}, {sy}) to ({ax}, {ay}) in a {}x{} frame of a {}x{} surface",
                region.width,
                region.height,
                frame.width,
                frame.height,
                self.width(),
                self.height()
            )));
        }
        let (fw, fh) = pixmap_dims(frame.width, frame.height)?;

        // Rows move towards the start of the buffer, so top-down copies never clobber unread rows.
        let old_stride = self.width() as usize * 4;
        let new_stride = frame.width as usize * 4;
        let row_len = region.width as usize * 4;
        let data = self.data_mut();
        for row in 0..region.height as usize {
            let from = (sy as usize + row) * old_stride + sx as usize * 4;
            let to = (ay as usize + row) * new_stride + ax as usize * 4;
            data.copy_within(from..from + row_len, to);
        }
        self.pixmap.resize(fw, fh);

        let (x0, y0) = (f64::from(ax), f64::from(ay));
        let (x1, y1) = (x0 + f64::from(region.width), y0 + f64::from(region.height));
        let (w, h) = (f64::from(fw), f64::from(fh));
        for r in [
            Rect::new(0.0, 0.0, w, y0),
            Rect::new(0.0, y1, w, h),
            Rect::new(0.0, y0, x0, y1),
            Rect::new(x1, y0, w, y1),
        ] {
            self.set_rect(r, fill);
        }
        Ok(())
    }

    /// Copy the `dst.width() x dst.height()` region starting at `(x, y)` into `dst`.
    ///
    /// Source pixels outside this surface read as transparent.
    pub fn crop_into(&self, x: u32, y: u32, dst: &mut Surface) {
        dst.clear();
        dst.copy_region(self, x, y, dst.size(), 0, 0);
    }

    /// Overwrite the pixels at `(dx, dy)` with the `size` region of `src` starting at `(sx, sy)`.
    ///
    /// Both sides are clipped to their surfaces.
    pub fn copy_region(&mut self, src: &Surface, sx: u32, sy: u32, size: Size, dx: u32, dy: u32) {
        let (sx, sy, dx, dy) = (sx as usize, sy as usize, dx as usize, dy as usize);
        let w = (size.width as usize)
            .min((src.width() as usize).saturating_sub(sx))
            .min((self.width() as usize).saturating_sub(dx));
        let h = (size.height as usize)
            .min((src.height() as usize).saturating_sub(sy))
            .min((self.height() as usize).saturating_sub(dy));
        if w == 0 || h == 0 {
            return;
        }
        let src_stride = src.width() as usize * 4;
        let dst_stride = self.width() as usize * 4;
        let from = src.data();
        let out = self.data_mut();
        for row in 0..h {
            let s0 = (sy + row) * src_stride + sx * 4;
            let d0 = (dy + row) * dst_stride + dx * 4;
            out[d0..d0 + w * 4].copy_from_slice(&from[s0..s0 + w * 4]);
        }
    }

    /// Copy a region into a newly allocated surface.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> RasterfitResult<Surface> {
        let mut out = Surface::new(width, height)?;
        self.crop_into(x, y, &mut out);
        Ok(out)
    }

    pub(crate) fn to_image(&self) -> RasterfitResult<vello_cpu::Image> {
        let pixmap = pixmap_from_premul_bytes(self.data(), self.width(), self.height())?;
        Ok(image_paint(pixmap))
    }

    /// Draw the `src` region of `paint` into `dst` with `filter` applied to the drawn layer.
    ///
    /// The image is rendered into a scratch layer the size of this surface, filtered, then
    /// composited source-over. Parts of `dst` outside the surface are clipped.
    pub(crate) fn draw_image(
        &mut self,
        paint: vello_cpu::Image,
        src: Rect,
        dst: Rect,
        filter: &FilterExpr,
    ) -> RasterfitResult<()> {
        if !valid_rect(src) || !valid_rect(dst) {
            return Err(RasterfitError::config(format!(
                "draw rects must be finite and non-empty, got src {src:?} dst {dst:?}"
            )));
        }
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        let tr = Affine::translate((dst.x0, dst.y0))
            * Affine::scale_non_uniform(dst.width() / src.width(), dst.height() / src.height())
            * Affine::translate((-src.x0, -src.y0));

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_transform(affine_to_cpu(tr));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(src.x0, src.y0, src.x1, src.y1));
        ctx.flush();

        let mut layer = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut layer);

        let bytes = layer.data_as_u8_slice_mut();
        filter.apply_rgba8_premul(bytes, self.width(), self.height())?;
        premul_over_in_place(self.data_mut(), bytes)
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width() && y < self.height())
            .then(|| (y as usize * self.width() as usize + x as usize) * 4)
    }

    /// Pixel-aligned intersection of `rect` with the surface, as `(x0, y0, x1, y1)`.
    fn clip(&self, rect: Rect) -> Option<(usize, usize, usize, usize)> {
        if !rect.is_finite() {
            return None;
        }
        let w = f64::from(self.width());
        let h = f64::from(self.height());
        let x0 = rect.x0.round().clamp(0.0, w);
        let y0 = rect.y0.round().clamp(0.0, h);
        let x1 = rect.x1.round().clamp(0.0, w);
        let y1 = rect.y1.round().clamp(0.0, h);
        (x1 > x0 && y1 > y0).then_some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }
}

fn valid_rect(r: Rect) -> bool {
    r.is_finite() && r.width() > 0.0 && r.height() > 0.0
}

fn pixmap_dims(width: u32, height: u32) -> RasterfitResult<(u16, u16)> {
    if width == 0 || height == 0 {
        return Err(RasterfitError::resource(
            width,
            height,
            "dimensions must be non-zero",
        ));
    }
    let w: u16 = width
        .try_into()
        .map_err(|_| RasterfitError::resource(width, height, "width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| RasterfitError::resource(width, height, "height exceeds u16"))?;
    Ok((w, h))
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> RasterfitResult<vello_cpu::Pixmap> {
    let (w, h) = pixmap_dims(width, height)?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(RasterfitError::resource(width, height, "pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

pub(crate) fn image_paint(pixmap: vello_cpu::Pixmap) -> vello_cpu::Image {
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler {
            quality: vello_cpu::peniko::ImageQuality::High,
            ..vello_cpu::peniko::ImageSampler::default()
        },
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> RasterfitResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(RasterfitError::config(
            "premul_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = s[3];
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - u16::from(sa);
        for c in 0..4 {
            d[c] = s[c].saturating_add(mul_div255_u8(u16::from(d[c]), inv));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
