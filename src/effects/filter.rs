//! Filter operations and their folding into one filter expression.
//!
//! A [`FilterExpr`] keeps the accumulated steps in order (for its CSS-like text form) and applies
//! them in a single pass: every color step is composed into one 4x5 color matrix, every blur is
//! merged into one gaussian (`sigma = sqrt(sum of sigma^2)`), then the matrix runs before the blur.
//!
//! This is simultaneous application, not sequential multi-pass. Color matrices do not commute with
//! blur or with per-step clamping, so a chain like `blur -> brightness -> blur` can differ slightly
//! from drawing each step separately.

use crate::effects::blur::{GaussianKernel, blur_rgba8_premul_in_place};
use crate::foundation::error::RasterfitResult;

/// 4x5 row-major color matrix over straight-alpha `[r, g, b, a, 1]` in `0..=1`.
pub type ColorMatrix = [f32; 20];

const IDENTITY: ColorMatrix = [
    1.0, 0.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, 0.0,
];

/// Gaussian blur request.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlurOpts {
    /// Standard deviation in pixels. Non-finite or negative values act as `0`.
    pub sigma: f32,
}

impl BlurOpts {
    /// Blur with the given sigma.
    pub fn new(sigma: f32) -> Self {
        Self { sigma }
    }

    fn sanitized_sigma(self) -> f32 {
        if self.sigma.is_finite() {
            self.sigma.max(0.0)
        } else {
            0.0
        }
    }
}

/// CSS-style color filter request.
///
/// Set fields apply in declaration order: brightness, contrast, grayscale, sepia, saturate,
/// hue_rotate, invert, opacity. Non-finite values are ignored; amounts are clamped to their valid
/// range instead of failing.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterOpts {
    /// Linear multiplier, `1` is identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f32>,
    /// Contrast around mid-gray, `1` is identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f32>,
    /// Amount in `0..=1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grayscale: Option<f32>,
    /// Amount in `0..=1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sepia: Option<f32>,
    /// Saturation multiplier, `1` is identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturate: Option<f32>,
    /// Hue rotation in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hue_rotate: Option<f32>,
    /// Amount in `0..=1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invert: Option<f32>,
    /// Alpha multiplier in `0..=1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
}

/// One normalized filter step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterStep {
    /// Gaussian blur, sigma in px.
    Blur(f32),
    /// Brightness multiplier.
    Brightness(f32),
    /// Contrast multiplier.
    Contrast(f32),
    /// Grayscale amount.
    Grayscale(f32),
    /// Sepia amount.
    Sepia(f32),
    /// Saturation multiplier.
    Saturate(f32),
    /// Hue rotation in degrees.
    HueRotate(f32),
    /// Invert amount.
    Invert(f32),
    /// Opacity multiplier.
    Opacity(f32),
}

impl FilterStep {
    fn matrix(self) -> Option<ColorMatrix> {
        Some(match self {
            FilterStep::Blur(_) => return None,
            FilterStep::Brightness(b) => scale_rgb(b, 0.0),
            FilterStep::Contrast(c) => scale_rgb(c, 0.5 - 0.5 * c),
            FilterStep::Grayscale(a) => {
                let s = 1.0 - a;
                luma_matrix(
                    [0.2126, 0.7152, 0.0722],
                    [
                        [0.7874 * s, -0.7152 * s, -0.0722 * s],
                        [-0.2126 * s, 0.2848 * s, -0.0722 * s],
                        [-0.2126 * s, -0.7152 * s, 0.9278 * s],
                    ],
                )
            }
            FilterStep::Sepia(a) => {
                let s = 1.0 - a;
                [
                    0.393 + 0.607 * s,
                    0.769 - 0.769 * s,
                    0.189 - 0.189 * s,
                    0.0,
                    0.0,
                    0.349 - 0.349 * s,
                    0.686 + 0.314 * s,
                    0.168 - 0.168 * s,
                    0.0,
                    0.0,
                    0.272 - 0.272 * s,
                    0.534 - 0.534 * s,
                    0.131 + 0.869 * s,
                    0.0,
                    0.0,
                    0.0,
                    0.0,
                    0.0,
                    1.0,
                    0.0,
                ]
            }
            FilterStep::Saturate(s) => luma_matrix(
                [0.213, 0.715, 0.072],
                [
                    [0.787 * s, -0.715 * s, -0.072 * s],
                    [-0.213 * s, 0.285 * s, -0.072 * s],
                    [-0.213 * s, -0.715 * s, 0.928 * s],
                ],
            ),
            FilterStep::HueRotate(deg) => {
                let (sin, cos) = deg.to_radians().sin_cos();
                luma_matrix(
                    [0.213, 0.715, 0.072],
                    [
                        [
                            cos * 0.787 - sin * 0.213,
                            -cos * 0.715 - sin * 0.715,
                            -cos * 0.072 + sin * 0.928,
                        ],
                        [
                            -cos * 0.213 + sin * 0.143,
                            cos * 0.285 + sin * 0.140,
                            -cos * 0.072 - sin * 0.283,
                        ],
                        [
                            -cos * 0.213 - sin * 0.787,
                            -cos * 0.715 + sin * 0.715,
                            cos * 0.928 + sin * 0.072,
                        ],
                    ],
                )
            }
            FilterStep::Invert(a) => scale_rgb(1.0 - 2.0 * a, a),
            FilterStep::Opacity(a) => {
                let mut m = IDENTITY;
                m[18] = a;
                m
            }
        })
    }
}

impl std::fmt::Display for FilterStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterStep::Blur(s) => write!(f, "blur({s}px)"),
            FilterStep::Brightness(v) => write!(f, "brightness({v})"),
            FilterStep::Contrast(v) => write!(f, "contrast({v})"),
            FilterStep::Grayscale(v) => write!(f, "grayscale({v})"),
            FilterStep::Sepia(v) => write!(f, "sepia({v})"),
            FilterStep::Saturate(v) => write!(f, "saturate({v})"),
            FilterStep::HueRotate(v) => write!(f, "hue-rotate({v}deg)"),
            FilterStep::Invert(v) => write!(f, "invert({v})"),
            FilterStep::Opacity(v) => write!(f, "opacity({v})"),
        }
    }
}

/// Ordered filter steps applied together in one pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterExpr {
    steps: Vec<FilterStep>,
}

/// Result of folding a [`FilterExpr`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoldedFilter {
    /// Composed color matrix, `None` when the color steps cancel out or there are none.
    pub matrix: Option<ColorMatrix>,
    /// Combined blur sigma, `0` when there is no blur.
    pub blur_sigma: f32,
}

impl FilterExpr {
    /// Empty expression (`none`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a blur step.
    pub fn push_blur(&mut self, opts: BlurOpts) {
        let sigma = opts.sanitized_sigma();
        if sigma > 0.0 {
            self.steps.push(FilterStep::Blur(sigma));
        }
    }

    /// Append the steps of one filter request, in field order.
    pub fn push_filter(&mut self, opts: &FilterOpts) {
        let mut push = |v: Option<f32>, lo: f32, hi: f32, step: fn(f32) -> FilterStep| {
            if let Some(v) = v.filter(|v| v.is_finite()) {
                self.steps.push(step(v.clamp(lo, hi)));
            }
        };
        push(opts.brightness, 0.0, f32::MAX, FilterStep::Brightness);
        push(opts.contrast, 0.0, f32::MAX, FilterStep::Contrast);
        push(opts.grayscale, 0.0, 1.0, FilterStep::Grayscale);
        push(opts.sepia, 0.0, 1.0, FilterStep::Sepia);
        push(opts.saturate, 0.0, f32::MAX, FilterStep::Saturate);
        push(opts.hue_rotate, f32::MIN, f32::MAX, FilterStep::HueRotate);
        push(opts.invert, 0.0, 1.0, FilterStep::Invert);
        push(opts.opacity, 0.0, 1.0, FilterStep::Opacity);
    }

    /// Steps in accumulation order.
    pub fn steps(&self) -> &[FilterStep] {
        &self.steps
    }

    /// `true` when there are no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Drop every step.
    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Compose all color steps into one matrix and all blurs into one sigma.
    pub fn fold(&self) -> FoldedFilter {
        let mut matrix = IDENTITY;
        let mut sigma_sq = 0.0f64;
        for step in &self.steps {
            match (step, step.matrix()) {
                (FilterStep::Blur(s), _) => sigma_sq += f64::from(*s).powi(2),
                (_, Some(m)) => matrix = compose(&m, &matrix),
                (_, None) => {}
            }
        }
        FoldedFilter {
            matrix: (matrix != IDENTITY).then_some(matrix),
            blur_sigma: sigma_sq.sqrt().min(f64::from(f32::MAX)) as f32,
        }
    }

    /// Apply the folded expression to a premultiplied RGBA8 buffer in place.
    pub fn apply_rgba8_premul(&self, buf: &mut [u8], width: u32, height: u32) -> RasterfitResult<()> {
        self.fold().apply_rgba8_premul(buf, width, height)
    }
}

impl FoldedFilter {
    /// Run the matrix, then the blur, over a premultiplied RGBA8 `width x height` buffer.
    ///
    /// The blur reach never exceeds the longer side of the buffer.
    pub fn apply_rgba8_premul(&self, buf: &mut [u8], width: u32, height: u32) -> RasterfitResult<()> {
        if let Some(m) = &self.matrix {
            color_matrix_rgba8_premul_in_place(buf, m);
        }
        match GaussianKernel::for_surface(self.blur_sigma, width, height) {
            Some(kernel) => blur_rgba8_premul_in_place(buf, width, height, &kernel),
            None => Ok(()),
        }
    }
}

impl std::fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.steps.is_empty() {
            return f.write_str("none");
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

fn scale_rgb(k: f32, offset: f32) -> ColorMatrix {
    [
        k, 0.0, 0.0, 0.0, offset, //
        0.0, k, 0.0, 0.0, offset, //
        0.0, 0.0, k, 0.0, offset, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

/// RGB rows of the form `luma + delta`, alpha untouched.
fn luma_matrix(luma: [f32; 3], delta: [[f32; 3]; 3]) -> ColorMatrix {
    let mut m = IDENTITY;
    for (row, d) in delta.iter().enumerate() {
        for col in 0..3 {
            m[row * 5 + col] = luma[col] + d[col];
        }
    }
    m
}

/// `outer ∘ inner`: the result applies `inner` first.
fn compose(outer: &ColorMatrix, inner: &ColorMatrix) -> ColorMatrix {
    let mut out = [0.0f32; 20];
    for row in 0..4 {
        for col in 0..4 {
            out[row * 5 + col] = (0..4)
                .map(|k| outer[row * 5 + k] * inner[k * 5 + col])
                .sum();
        }
        out[row * 5 + 4] = (0..4)
            .map(|k| outer[row * 5 + k] * inner[k * 5 + 4])
            .sum::<f32>()
            + outer[row * 5 + 4];
    }
    out
}

fn color_matrix_rgba8_premul_in_place(buf: &mut [u8], m: &ColorMatrix) {
    for d in buf.chunks_exact_mut(4) {
        let pa = f32::from(d[3]) / 255.0;

        // Convert premul -> straight for matrix application.
        let inv_a = if pa > 0.0 { 1.0 / pa } else { 0.0 };
        let r = f32::from(d[0]) / 255.0 * inv_a;
        let g = f32::from(d[1]) / 255.0 * inv_a;
        let b = f32::from(d[2]) / 255.0 * inv_a;
        let a = pa;

        let out_r = (m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4]).clamp(0.0, 1.0);
        let out_g = (m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9]).clamp(0.0, 1.0);
        let out_b = (m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14]).clamp(0.0, 1.0);
        let out_a = (m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19]).clamp(0.0, 1.0);

        d[0] = (out_r * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        d[1] = (out_g * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        d[2] = (out_b * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        d[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filter.rs"]
mod tests;
