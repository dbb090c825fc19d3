//! Fit-mode engines.
//!
//! Each engine turns an already rasterized source surface into a pooled result surface of the
//! size [`calculate_final_layout`] computes. They all go through the same compose routine and
//! differ only in the geometry their mode selects; Contain additionally trims empty borders when
//! asked to.

use crate::effects::filter::FilterExpr;
use crate::foundation::error::{RasterfitError, RasterfitResult};
use crate::layout::calc::{LayoutResult, calculate_final_layout};
use crate::layout::config::{FitMode, ResizeConfig};
use crate::render::compose::{compose, trim_empty};
use crate::render::surface::Surface;
use crate::render::surface_pool::SurfacePool;

/// Strategy that sizes and composites one source surface for a fit mode.
pub trait FitModeEngine: Send + Sync {
    /// Mode this engine handles.
    fn mode(&self) -> FitMode;

    /// Produce the result surface for `source` under `config`.
    ///
    /// The result comes from `pool`; on error every surface acquired here has been released.
    fn execute(
        &self,
        pool: &mut SurfacePool,
        source: &Surface,
        config: &ResizeConfig,
    ) -> RasterfitResult<Surface> {
        if config.mode() != self.mode() {
            return Err(RasterfitError::config(format!(
                "{} engine cannot execute a {} config",
                self.mode(),
                config.mode()
            )));
        }
        let _span = tracing::debug_span!("fit_execute", mode = %self.mode()).entered();
        let layout = calculate_final_layout(source.width(), source.height(), config)?;
        let mut out = pool.acquire(layout.output_size.width, layout.output_size.height)?;
        if let Err(e) = compose(&mut out, source, &layout, config.background(), &FilterExpr::new()) {
            pool.release(out);
            return Err(e);
        }
        self.finish(pool, out, &layout, config)
    }

    /// Post-process the composited surface. The default keeps it as is.
    fn finish(
        &self,
        pool: &mut SurfacePool,
        out: Surface,
        layout: &LayoutResult,
        config: &ResizeConfig,
    ) -> RasterfitResult<Surface> {
        let _ = (pool, layout, config);
        Ok(out)
    }
}

/// Scale to cover the target, cropping overflow.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoverEngine;

/// Scale to fit inside the target, letterboxing; optionally trims empty borders.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainEngine;

/// Stretch to the target.
#[derive(Debug, Default, Clone, Copy)]
pub struct FillEngine;

/// Shrink to fit within bounds, never enlarge.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaxFitEngine;

/// Grow to at least the bounds, never shrink.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinFitEngine;

impl FitModeEngine for CoverEngine {
    fn mode(&self) -> FitMode {
        FitMode::Cover
    }
}

impl FitModeEngine for FillEngine {
    fn mode(&self) -> FitMode {
        FitMode::Fill
    }
}

impl FitModeEngine for MaxFitEngine {
    fn mode(&self) -> FitMode {
        FitMode::MaxFit
    }
}

impl FitModeEngine for MinFitEngine {
    fn mode(&self) -> FitMode {
        FitMode::MinFit
    }
}

impl FitModeEngine for ContainEngine {
    fn mode(&self) -> FitMode {
        FitMode::Contain
    }

    fn finish(
        &self,
        pool: &mut SurfacePool,
        mut out: Surface,
        layout: &LayoutResult,
        config: &ResizeConfig,
    ) -> RasterfitResult<Surface> {
        if !config.is_trim_empty() {
            return Ok(out);
        }
        match trim_empty(&mut out, layout, config.background(), config.edges()) {
            Ok(_) => Ok(out),
            Err(e) => {
                pool.release(out);
                Err(e)
            }
        }
    }
}

static COVER: CoverEngine = CoverEngine;
static CONTAIN: ContainEngine = ContainEngine;
static FILL: FillEngine = FillEngine;
static MAX_FIT: MaxFitEngine = MaxFitEngine;
static MIN_FIT: MinFitEngine = MinFitEngine;

/// Engine for `mode`.
pub fn engine_for(mode: FitMode) -> &'static dyn FitModeEngine {
    match mode {
        FitMode::Cover => &COVER,
        FitMode::Contain => &CONTAIN,
        FitMode::Fill => &FILL,
        FitMode::MaxFit => &MAX_FIT,
        FitMode::MinFit => &MIN_FIT,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fit/engines.rs"]
mod tests;
