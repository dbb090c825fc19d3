use crate::foundation::error::{RasterfitError, RasterfitResult};
use crate::foundation::math::round_px;

/// Output margin around the positioned image.
///
/// Either one value for all four edges or a per-edge record whose missing edges default to `0`.
/// Values are plain numbers so that fractional or negative input can be parsed and reported;
/// configs reject negative and non-finite values at construction. Fractional edges round half away
/// from zero when normalized.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Padding {
    /// Same padding on every edge.
    Uniform(f64),
    /// Independently optional edges.
    Edges(PaddingEdges),
}

/// Per-edge padding input.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaddingEdges {
    /// Top edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    /// Right edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    /// Bottom edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    /// Left edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
}

/// Four explicit, non-negative edge widths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Edges {
    /// Top edge.
    pub top: u32,
    /// Right edge.
    pub right: u32,
    /// Bottom edge.
    pub bottom: u32,
    /// Left edge.
    pub left: u32,
}

impl Edges {
    /// Same width on all four edges.
    pub const fn uniform(v: u32) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    /// `left + right`.
    pub fn horizontal(self) -> u32 {
        self.left.saturating_add(self.right)
    }

    /// `top + bottom`.
    pub fn vertical(self) -> u32 {
        self.top.saturating_add(self.bottom)
    }
}

impl Padding {
    /// Padding with explicit edges in CSS order.
    pub fn edges(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self::Edges(PaddingEdges {
            top: Some(top),
            right: Some(right),
            bottom: Some(bottom),
            left: Some(left),
        })
    }

    /// Normalize optional padding into four explicit edges.
    ///
    /// Absent padding is all-zero. Negative values clamp to `0`; configs already rejected them.
    pub fn normalize(padding: Option<&Padding>) -> Edges {
        fn px(v: Option<f64>) -> u32 {
            u32::try_from(round_px(v.unwrap_or(0.0).max(0.0))).unwrap_or(u32::MAX)
        }

        match padding {
            None => Edges::default(),
            Some(Padding::Uniform(v)) => Edges::uniform(px(Some(*v))),
            Some(Padding::Edges(e)) => Edges {
                top: px(e.top),
                right: px(e.right),
                bottom: px(e.bottom),
                left: px(e.left),
            },
        }
    }

    /// Reject negative, non-finite or out-of-range values.
    pub fn validate(&self) -> RasterfitResult<()> {
        let check = |edge: &str, v: Option<f64>| -> RasterfitResult<()> {
            match v {
                Some(v) if !v.is_finite() => Err(RasterfitError::config(format!(
                    "padding {edge} must be finite, got {v}"
                ))),
                Some(v) if v < 0.0 => Err(RasterfitError::config(format!(
                    "padding {edge} must be >= 0, got {v}"
                ))),
                Some(v) if round_px(v) > i64::from(u32::MAX) => Err(RasterfitError::config(
                    format!("padding {edge} is too large: {v}"),
                )),
                _ => Ok(()),
            }
        };
        match self {
            Padding::Uniform(v) => check("value", Some(*v)),
            Padding::Edges(e) => {
                check("top", e.top)?;
                check("right", e.right)?;
                check("bottom", e.bottom)?;
                check("left", e.left)
            }
        }
    }
}

impl From<u32> for Padding {
    fn from(v: u32) -> Self {
        Self::Uniform(f64::from(v))
    }
}

impl From<f64> for Padding {
    fn from(v: f64) -> Self {
        Self::Uniform(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/padding.rs"]
mod tests;
