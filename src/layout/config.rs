use crate::foundation::color::Color;
use crate::foundation::error::{RasterfitError, RasterfitResult};
use crate::layout::padding::{Edges, Padding};

/// Declarative sizing strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    /// Scale to cover the target box; the overflowing axis is clipped at draw time.
    Cover,
    /// Scale to fit inside the target box; the shorter axis is letterboxed.
    Contain,
    /// Stretch to the exact target box.
    Fill,
    /// Shrink to fit the given bound(s); never enlarges.
    MaxFit,
    /// Grow to reach the given minimum(s); never shrinks.
    MinFit,
}

impl FitMode {
    /// Stable lowercase name, matching the JSON tag.
    pub fn as_str(self) -> &'static str {
        match self {
            FitMode::Cover => "cover",
            FitMode::Contain => "contain",
            FitMode::Fill => "fill",
            FitMode::MaxFit => "max_fit",
            FitMode::MinFit => "min_fit",
        }
    }

    /// `true` when the caller fixes the output size (cover/contain/fill).
    pub fn has_fixed_output(self) -> bool {
        matches!(self, FitMode::Cover | FitMode::Contain | FitMode::Fill)
    }
}

impl std::fmt::Display for FitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated target box for cover/contain/fill. Both axes are positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Target {
    width: u32,
    height: u32,
}

impl Target {
    /// Validate a target box for `mode`.
    pub fn new(mode: FitMode, width: u32, height: u32) -> RasterfitResult<Self> {
        Ok(Self {
            width: check_dim(mode, "width", i64::from(width))?,
            height: check_dim(mode, "height", i64::from(height))?,
        })
    }

    /// Target width.
    pub fn width(self) -> u32 {
        self.width
    }

    /// Target height.
    pub fn height(self) -> u32 {
        self.height
    }
}

/// Validated bound(s) for max-fit/min-fit. At least one axis is set; set axes are positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    width: Option<u32>,
    height: Option<u32>,
}

impl Bounds {
    /// Validate bounds for `mode`.
    pub fn new(mode: FitMode, width: Option<u32>, height: Option<u32>) -> RasterfitResult<Self> {
        if width.is_none() && height.is_none() {
            return Err(RasterfitError::config(format!(
                "{mode}: at least one of width or height is required"
            )));
        }
        Ok(Self {
            width: width
                .map(|w| check_dim(mode, "width", i64::from(w)))
                .transpose()?,
            height: height
                .map(|h| check_dim(mode, "height", i64::from(h)))
                .transpose()?,
        })
    }

    /// Width bound, if constrained.
    pub fn width(self) -> Option<u32> {
        self.width
    }

    /// Height bound, if constrained.
    pub fn height(self) -> Option<u32> {
        self.height
    }
}

/// Fit-mode specific part of a [`ResizeConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fit {
    /// See [`FitMode::Cover`].
    Cover(Target),
    /// See [`FitMode::Contain`].
    Contain {
        /// Target box.
        target: Target,
        /// Crop uniform background borders after compositing.
        trim_empty: bool,
        /// Never scale above the source size.
        without_enlargement: bool,
    },
    /// See [`FitMode::Fill`].
    Fill(Target),
    /// See [`FitMode::MaxFit`].
    MaxFit(Bounds),
    /// See [`FitMode::MinFit`].
    MinFit(Bounds),
}

impl Fit {
    /// Mode tag of this fit.
    pub fn mode(&self) -> FitMode {
        match self {
            Fit::Cover(_) => FitMode::Cover,
            Fit::Contain { .. } => FitMode::Contain,
            Fit::Fill(_) => FitMode::Fill,
            Fit::MaxFit(_) => FitMode::MaxFit,
            Fit::MinFit(_) => FitMode::MinFit,
        }
    }
}

/// A validated resize request: fit geometry plus optional padding and background.
///
/// Every constructor validates eagerly, so a `ResizeConfig` value never carries zero dimensions or
/// negative padding. JSON uses an internal `"fit"` tag:
///
/// ```json
/// {"fit": "contain", "width": 800, "height": 800, "padding": 10, "background": "#ffffff"}
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "ResizeConfigDef", into = "ResizeConfigDef")]
pub struct ResizeConfig {
    fit: Fit,
    padding: Option<Padding>,
    background: Option<Color>,
}

impl ResizeConfig {
    /// Wrap an already validated fit.
    pub fn new(fit: Fit) -> Self {
        Self {
            fit,
            padding: None,
            background: None,
        }
    }

    /// Cover `width x height`.
    pub fn cover(width: u32, height: u32) -> RasterfitResult<Self> {
        Ok(Self::new(Fit::Cover(Target::new(FitMode::Cover, width, height)?)))
    }

    /// Contain inside `width x height`.
    pub fn contain(width: u32, height: u32) -> RasterfitResult<Self> {
        Ok(Self::new(Fit::Contain {
            target: Target::new(FitMode::Contain, width, height)?,
            trim_empty: false,
            without_enlargement: false,
        }))
    }

    /// Stretch to exactly `width x height`.
    pub fn fill(width: u32, height: u32) -> RasterfitResult<Self> {
        Ok(Self::new(Fit::Fill(Target::new(FitMode::Fill, width, height)?)))
    }

    /// Shrink to fit the given bound(s).
    pub fn max_fit(width: Option<u32>, height: Option<u32>) -> RasterfitResult<Self> {
        Ok(Self::new(Fit::MaxFit(Bounds::new(
            FitMode::MaxFit,
            width,
            height,
        )?)))
    }

    /// Grow to reach the given minimum(s).
    pub fn min_fit(width: Option<u32>, height: Option<u32>) -> RasterfitResult<Self> {
        Ok(Self::new(Fit::MinFit(Bounds::new(
            FitMode::MinFit,
            width,
            height,
        )?)))
    }

    /// Set padding, rejecting negative edges.
    pub fn with_padding(mut self, padding: impl Into<Padding>) -> RasterfitResult<Self> {
        let padding = padding.into();
        padding.validate().map_err(|e| {
            RasterfitError::config(format!("{}: {}", self.mode(), strip_prefix(&e)))
        })?;
        self.padding = Some(padding);
        Ok(self)
    }

    /// Set the background painted under the image and into padding/letterbox regions.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = Some(background);
        self
    }

    /// Enable or disable trimming of uniform borders. Contain only.
    ///
    /// After the draw, border rows and columns that are uniformly the background (transparent
    /// without one) are cropped and the padding is kept. The fit engine and `Pipeline::realize`
    /// trim the same way.
    pub fn trim_empty(mut self, on: bool) -> RasterfitResult<Self> {
        match &mut self.fit {
            Fit::Contain { trim_empty, .. } => {
                *trim_empty = on;
                Ok(self)
            }
            other => Err(RasterfitError::config(format!(
                "{}: trim_empty is only supported by contain",
                other.mode()
            ))),
        }
    }

    /// Enable or disable the no-enlargement clamp. Contain only.
    pub fn without_enlargement(mut self, on: bool) -> RasterfitResult<Self> {
        match &mut self.fit {
            Fit::Contain {
                without_enlargement,
                ..
            } => {
                *without_enlargement = on;
                Ok(self)
            }
            other => Err(RasterfitError::config(format!(
                "{}: without_enlargement is only supported by contain",
                other.mode()
            ))),
        }
    }

    /// Fit geometry.
    pub fn fit(&self) -> &Fit {
        &self.fit
    }

    /// Mode tag.
    pub fn mode(&self) -> FitMode {
        self.fit.mode()
    }

    /// Padding as configured.
    pub fn padding(&self) -> Option<&Padding> {
        self.padding.as_ref()
    }

    /// Normalized padding edges.
    pub fn edges(&self) -> Edges {
        Padding::normalize(self.padding.as_ref())
    }

    /// Background color, if any.
    pub fn background(&self) -> Option<Color> {
        self.background
    }

    /// `true` for contain with `trim_empty` set.
    pub fn is_trim_empty(&self) -> bool {
        matches!(
            self.fit,
            Fit::Contain {
                trim_empty: true,
                ..
            }
        )
    }
}

fn check_dim(mode: FitMode, axis: &str, v: i64) -> RasterfitResult<u32> {
    if v <= 0 {
        return Err(RasterfitError::config(format!(
            "{mode}: {axis} must be > 0, got {v}"
        )));
    }
    u32::try_from(v)
        .map_err(|_| RasterfitError::config(format!("{mode}: {axis} is too large: {v}")))
}

fn strip_prefix(e: &RasterfitError) -> String {
    match e {
        RasterfitError::Config(msg) => msg.clone(),
        other => other.to_string(),
    }
}

/// JSON-facing shape of [`ResizeConfig`], validated through `TryFrom`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "fit", rename_all = "snake_case")]
enum ResizeConfigDef {
    Cover(BoxDef),
    Contain(ContainDef),
    Fill(BoxDef),
    MaxFit(BoxDef),
    MinFit(BoxDef),
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct BoxDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    padding: Option<Padding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    background: Option<Color>,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ContainDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    padding: Option<Padding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    background: Option<Color>,
    #[serde(default)]
    trim_empty: bool,
    #[serde(default)]
    without_enlargement: bool,
}

impl ContainDef {
    fn common(&self) -> BoxDef {
        BoxDef {
            width: self.width,
            height: self.height,
            padding: self.padding,
            background: self.background,
        }
    }
}

impl BoxDef {
    fn target(&self, mode: FitMode) -> RasterfitResult<Target> {
        let w = self.width.ok_or_else(|| {
            RasterfitError::config(format!("{mode}: width is required"))
        })?;
        let h = self.height.ok_or_else(|| {
            RasterfitError::config(format!("{mode}: height is required"))
        })?;
        let width = check_dim(mode, "width", w)?;
        let height = check_dim(mode, "height", h)?;
        Ok(Target { width, height })
    }

    fn bounds(&self, mode: FitMode) -> RasterfitResult<Bounds> {
        let width = self
            .width
            .map(|w| check_dim(mode, "width", w))
            .transpose()?;
        let height = self
            .height
            .map(|h| check_dim(mode, "height", h))
            .transpose()?;
        Bounds::new(mode, width, height)
    }

    fn finish(self, fit: Fit) -> RasterfitResult<ResizeConfig> {
        let mut cfg = ResizeConfig::new(fit);
        if let Some(p) = self.padding {
            cfg = cfg.with_padding(p)?;
        }
        cfg.background = self.background;
        Ok(cfg)
    }
}

impl TryFrom<ResizeConfigDef> for ResizeConfig {
    type Error = RasterfitError;

    fn try_from(def: ResizeConfigDef) -> Result<Self, Self::Error> {
        match def {
            ResizeConfigDef::Cover(b) => {
                let fit = Fit::Cover(b.target(FitMode::Cover)?);
                b.finish(fit)
            }
            ResizeConfigDef::Fill(b) => {
                let fit = Fit::Fill(b.target(FitMode::Fill)?);
                b.finish(fit)
            }
            ResizeConfigDef::MaxFit(b) => {
                let fit = Fit::MaxFit(b.bounds(FitMode::MaxFit)?);
                b.finish(fit)
            }
            ResizeConfigDef::MinFit(b) => {
                let fit = Fit::MinFit(b.bounds(FitMode::MinFit)?);
                b.finish(fit)
            }
            ResizeConfigDef::Contain(c) => {
                let common = c.common();
                let fit = Fit::Contain {
                    target: common.target(FitMode::Contain)?,
                    trim_empty: c.trim_empty,
                    without_enlargement: c.without_enlargement,
                };
                common.finish(fit)
            }
        }
    }
}

impl From<ResizeConfig> for ResizeConfigDef {
    fn from(cfg: ResizeConfig) -> Self {
        let boxed = |w: Option<u32>, h: Option<u32>| BoxDef {
            width: w.map(i64::from),
            height: h.map(i64::from),
            padding: cfg.padding,
            background: cfg.background,
        };
        match cfg.fit {
            Fit::Cover(t) => Self::Cover(boxed(Some(t.width), Some(t.height))),
            Fit::Fill(t) => Self::Fill(boxed(Some(t.width), Some(t.height))),
            Fit::MaxFit(b) => Self::MaxFit(boxed(b.width, b.height)),
            Fit::MinFit(b) => Self::MinFit(boxed(b.width, b.height)),
            Fit::Contain {
                target,
                trim_empty,
                without_enlargement,
            } => Self::Contain(ContainDef {
                width: Some(i64::from(target.width)),
                height: Some(i64::from(target.height)),
                padding: cfg.padding,
                background: cfg.background,
                trim_empty,
                without_enlargement,
            }),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/config.rs"]
mod tests;
