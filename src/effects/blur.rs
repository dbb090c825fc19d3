use crate::foundation::error::{RasterfitError, RasterfitResult};

/// Q16 fixed-point gaussian weights for one blur of one surface.
///
/// The reach is three sigma, capped at the longer surface side: taps past that only ever sample
/// clamped edge pixels.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GaussianKernel {
    taps: Vec<u32>,
}

const ONE_Q16: u32 = 1 << 16;

impl GaussianKernel {
    /// Kernel for `sigma` over a `width x height` surface, `None` when the blur is a no-op.
    pub(crate) fn for_surface(sigma: f32, width: u32, height: u32) -> Option<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return None;
        }
        let sigma = f64::from(sigma);
        let reach = (sigma * 3.0).ceil().min(f64::from(width.max(height)));
        // `reach` is finite and within u32 here.
        let radius = reach as usize;
        if radius == 0 {
            return None;
        }

        let denom = 2.0 * sigma * sigma;
        let half: Vec<f64> = (0..=radius)
            .map(|d| {
                let d = d as f64;
                (-d * d / denom).exp()
            })
            .collect();
        let sum = half[0] + 2.0 * half[1..].iter().sum::<f64>();

        let mut taps = Vec::with_capacity(2 * radius + 1);
        taps.extend(half.iter().rev().map(|w| quantize(w / sum)));
        taps.extend(half[1..].iter().map(|w| quantize(w / sum)));

        // Push the rounding error into the center tap so the weights sum to exactly one.
        let total: i64 = taps.iter().map(|&t| i64::from(t)).sum();
        let center = &mut taps[radius];
        *center = (i64::from(*center) + i64::from(ONE_Q16) - total).clamp(0, i64::from(ONE_Q16)) as u32;

        Some(Self { taps })
    }

    pub(crate) fn radius(&self) -> usize {
        self.taps.len() / 2
    }
}

fn quantize(w: f64) -> u32 {
    (w * f64::from(ONE_Q16)).round().clamp(0.0, f64::from(ONE_Q16)) as u32
}

/// Separable gaussian blur of a premultiplied RGBA8 buffer, in place.
///
/// Edges clamp to the nearest pixel.
pub(crate) fn blur_rgba8_premul_in_place(
    buf: &mut [u8],
    width: u32,
    height: u32,
    kernel: &GaussianKernel,
) -> RasterfitResult<()> {
    let (w, h) = (width as usize, height as usize);
    let expected = w
        .checked_mul(h)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| RasterfitError::resource(width, height, "blur buffer size overflow"))?;
    if buf.len() != expected {
        return Err(RasterfitError::resource(
            width,
            height,
            "blur expects a width*height*4 buffer",
        ));
    }
    if expected == 0 {
        return Ok(());
    }

    let mut rows = vec![0u8; expected];
    convolve_lines(buf, &mut rows, Axis { len: w, lines: h, step: 1, line_step: w }, kernel);
    convolve_lines(&rows, buf, Axis { len: h, lines: w, step: w, line_step: 1 }, kernel);
    Ok(())
}

/// Pixel `j` of line `i` lives at pixel index `i * line_step + j * step`.
#[derive(Clone, Copy)]
struct Axis {
    len: usize,
    lines: usize,
    step: usize,
    line_step: usize,
}

fn convolve_lines(src: &[u8], dst: &mut [u8], axis: Axis, kernel: &GaussianKernel) {
    let r = kernel.radius();
    let last = axis.len - 1;
    for line in 0..axis.lines {
        let base = line * axis.line_step;
        for j in 0..axis.len {
            let mut acc = [0u64; 4];
            for (k, &tap) in kernel.taps.iter().enumerate() {
                let pos = (j + k).saturating_sub(r).min(last);
                let at = (base + pos * axis.step) * 4;
                for (a, &v) in acc.iter_mut().zip(&src[at..at + 4]) {
                    *a += u64::from(tap) * u64::from(v);
                }
            }
            let at = (base + j * axis.step) * 4;
            for (d, a) in dst[at..at + 4].iter_mut().zip(acc) {
                *d = ((a + u64::from(ONE_Q16 / 2)) >> 16).min(255) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
