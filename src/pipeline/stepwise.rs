//! Step-at-a-time execution over pooled surfaces.
//!
//! The source is rasterized once at its intrinsic size, then every operation reads the current
//! surface and writes a new one. Each intermediate goes back to the pool exactly once, on success
//! and on error; the final surface is handed to the caller and never released.

use crate::assets::Source;
use crate::effects::filter::FilterExpr;
use crate::fit::engines::engine_for;
use crate::foundation::color::Color;
use crate::foundation::error::{RasterfitError, RasterfitResult};
use crate::pipeline::deferred::Operation;
use crate::render::surface::Surface;
use crate::render::surface_pool::{PoolOpts, SurfacePool};

/// Options for a [`StepwisePipeline`].
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StepwiseOpts {
    /// Limits of the owned surface pool.
    pub pool: PoolOpts,
    /// Color painted under the source when it is first rasterized.
    pub clear_color: Option<Color>,
}

/// Executes operations one by one against surfaces from its pool.
#[derive(Debug)]
pub struct StepwisePipeline {
    opts: StepwiseOpts,
    pool: SurfacePool,
}

impl Default for StepwisePipeline {
    fn default() -> Self {
        Self::new(StepwiseOpts::default())
    }
}

impl StepwisePipeline {
    /// Pipeline with a fresh pool.
    pub fn new(opts: StepwiseOpts) -> Self {
        Self {
            opts,
            pool: SurfacePool::new(opts.pool),
        }
    }

    /// Pipeline reusing an existing pool.
    pub fn with_pool(opts: StepwiseOpts, pool: SurfacePool) -> Self {
        Self { opts, pool }
    }

    /// The pool surfaces come from.
    pub fn pool(&self) -> &SurfacePool {
        &self.pool
    }

    /// Give the pool back.
    pub fn into_pool(self) -> SurfacePool {
        self.pool
    }

    /// Run `ops` in order against `source`.
    ///
    /// A second resize is rejected before any surface is acquired.
    #[tracing::instrument(level = "debug", skip_all, fields(ops = ops.len()))]
    pub fn run<S: Source + ?Sized>(
        &mut self,
        source: &S,
        ops: &[Operation],
    ) -> RasterfitResult<Surface> {
        let resizes = ops
            .iter()
            .filter(|op| matches!(op, Operation::Resize(_)))
            .count();
        if resizes > 1 {
            return Err(RasterfitError::MultipleResizeNotAllowed { attempts: resizes });
        }

        let pool = &mut self.pool;
        let mut current = rasterize(pool, source, self.opts.clear_color)?;
        for (i, op) in ops.iter().enumerate() {
            let next = match op {
                Operation::Resize(cfg) => engine_for(cfg.mode()).execute(pool, &current, cfg),
                Operation::Blur(b) => {
                    let mut expr = FilterExpr::new();
                    expr.push_blur(*b);
                    filtered(pool, &current, &expr)
                }
                Operation::Filter(f) => {
                    let mut expr = FilterExpr::new();
                    expr.push_filter(f);
                    filtered(pool, &current, &expr)
                }
            };
            pool.release(current);
            current = next.inspect_err(|e| tracing::debug!(step = i, error = %e, "step failed"))?;
            tracing::trace!(step = i, w = current.width(), h = current.height(), "step done");
        }
        Ok(current)
    }
}

fn rasterize<S: Source + ?Sized>(
    pool: &mut SurfacePool,
    source: &S,
    clear: Option<Color>,
) -> RasterfitResult<Surface> {
    let size = source.intrinsic_size();
    let mut s = pool.acquire(size.width, size.height)?;
    if let Some(c) = clear {
        s.fill_rect(size.to_rect(), c.to_premul());
    }
    let rect = size.to_rect();
    match source.draw_into(&mut s, rect, rect, &FilterExpr::new()) {
        Ok(()) => Ok(s),
        Err(e) => {
            pool.release(s);
            Err(e)
        }
    }
}

fn filtered(pool: &mut SurfacePool, current: &Surface, expr: &FilterExpr) -> RasterfitResult<Surface> {
    let mut next = pool.acquire(current.width(), current.height())?;
    let rect = current.size().to_rect();
    match current.draw_into(&mut next, rect, rect, expr) {
        Ok(()) => Ok(next),
        Err(e) => {
            pool.release(next);
            Err(e)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/stepwise.rs"]
mod tests;
