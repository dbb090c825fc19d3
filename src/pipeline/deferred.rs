//! Deferred "realize once" pipeline.
//!
//! Operations only accumulate until [`Pipeline::realize`], which computes the geometry once, folds
//! every blur and color filter into one [`FilterExpr`], allocates one surface and draws the source
//! into it exactly once. A vector source is therefore rasterized a single time, at its final size.
//! Contain with `trim_empty` crops that same surface in place afterwards.

use std::marker::PhantomData;

use crate::assets::Source;
use crate::effects::filter::{BlurOpts, FilterExpr, FilterOpts};
use crate::foundation::error::{RasterfitError, RasterfitResult};
use crate::layout::calc::{LayoutResult, calculate_final_layout};
use crate::layout::config::ResizeConfig;
use crate::render::compose::{compose, trim_empty};
use crate::render::surface::Surface;

/// One accumulated request.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// Fit the source into new geometry. At most one per pipeline.
    Resize(ResizeConfig),
    /// Gaussian blur.
    Blur(BlurOpts),
    /// Color filter.
    Filter(FilterOpts),
}

/// Output of a successful realize.
#[derive(Debug)]
pub struct Realized {
    /// The single surface that was drawn.
    pub surface: Surface,
    /// Geometry used for the draw.
    pub layout: LayoutResult,
    /// CSS-like text of the folded filter, `none` when there was none.
    pub filter: String,
    /// Number of accumulated operations.
    pub ops: usize,
}

/// Operation accumulator over one source, with runtime protocol checks.
///
/// Lifecycle is `Accumulating -> Realized`. A second resize fails with
/// [`RasterfitError::MultipleResizeNotAllowed`]; once `realize` has been called (successfully or
/// not) every further call fails with [`RasterfitError::AlreadyRealized`].
#[derive(Debug)]
pub struct Pipeline<S> {
    source: S,
    ops: Vec<Operation>,
    resize_attempts: usize,
    realized: bool,
    filter: FilterExpr,
}

impl<S: Source> Pipeline<S> {
    /// Start accumulating against `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            ops: Vec::new(),
            resize_attempts: 0,
            realized: false,
            filter: FilterExpr::new(),
        }
    }

    /// Borrow the source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Accumulated operations in append order.
    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    /// `true` after `realize` was called.
    pub fn is_realized(&self) -> bool {
        self.realized
    }

    /// Record the single resize.
    pub fn append_resize(&mut self, config: ResizeConfig) -> RasterfitResult<&mut Self> {
        self.ensure_accumulating()?;
        self.resize_attempts += 1;
        if self.resize_attempts > 1 {
            return Err(RasterfitError::MultipleResizeNotAllowed {
                attempts: self.resize_attempts,
            });
        }
        self.ops.push(Operation::Resize(config));
        Ok(self)
    }

    /// Record a blur. Only fails once the pipeline is realized.
    pub fn append_blur(&mut self, opts: BlurOpts) -> RasterfitResult<&mut Self> {
        self.ensure_accumulating()?;
        self.ops.push(Operation::Blur(opts));
        Ok(self)
    }

    /// Record a color filter. Only fails once the pipeline is realized.
    pub fn append_filter(&mut self, opts: FilterOpts) -> RasterfitResult<&mut Self> {
        self.ensure_accumulating()?;
        self.ops.push(Operation::Filter(opts));
        Ok(self)
    }

    /// Record any operation through the matching `append_*` call.
    pub fn append(&mut self, op: Operation) -> RasterfitResult<&mut Self> {
        match op {
            Operation::Resize(c) => self.append_resize(c),
            Operation::Blur(b) => self.append_blur(b),
            Operation::Filter(f) => self.append_filter(f),
        }
    }

    /// Geometry `realize` draws with, without drawing.
    ///
    /// With contain and `trim_empty` the realized output can be smaller: borders that come out
    /// uniformly background are only known after the draw.
    pub fn layout(&self) -> RasterfitResult<LayoutResult> {
        let size = self.source.intrinsic_size();
        match self.resize_config() {
            Some(config) => calculate_final_layout(size.width, size.height, config),
            None => Ok(LayoutResult::intrinsic(size)),
        }
    }

    /// Draw everything in one pass into one new surface.
    #[tracing::instrument(level = "debug", skip(self), fields(ops = self.ops.len()))]
    pub fn realize(&mut self) -> RasterfitResult<Realized> {
        self.ensure_accumulating()?;
        self.realized = true;

        let layout = self.layout()?;

        self.filter.clear();
        for op in &self.ops {
            match op {
                Operation::Resize(_) => {}
                Operation::Blur(b) => self.filter.push_blur(*b),
                Operation::Filter(f) => self.filter.push_filter(f),
            }
        }
        let filter_text = self.filter.to_string();
        tracing::debug!(filter = %filter_text, "folded filter");

        let out = layout.output_size;
        let mut surface = Surface::new(out.width, out.height)?;
        let background = self.resize_config().and_then(ResizeConfig::background);
        let drawn = compose(&mut surface, &self.source, &layout, background, &self.filter);
        self.filter.clear();
        drawn.map_err(|e| RasterfitError::Draw {
            width: out.width,
            height: out.height,
            ops: self.ops.len(),
            source: Box::new(e),
        })?;

        let layout = match self.resize_config() {
            Some(config) if config.is_trim_empty() => {
                trim_empty(&mut surface, &layout, background, config.edges())?
            }
            _ => layout,
        };

        tracing::debug!(
            width = out.width,
            height = out.height,
            x = layout.position.x,
            y = layout.position.y,
            "realized"
        );
        Ok(Realized {
            surface,
            layout,
            filter: filter_text,
            ops: self.ops.len(),
        })
    }

    fn resize_config(&self) -> Option<&ResizeConfig> {
        self.ops.iter().find_map(|op| match op {
            Operation::Resize(c) => Some(c),
            _ => None,
        })
    }

    fn ensure_accumulating(&self) -> RasterfitResult<()> {
        if self.realized {
            Err(RasterfitError::AlreadyRealized)
        } else {
            Ok(())
        }
    }
}

/// Typestate marker: no resize recorded yet.
#[derive(Debug, Clone, Copy)]
pub struct Unresized;

/// Typestate marker: the resize is recorded.
#[derive(Debug, Clone, Copy)]
pub struct Resized;

/// Builder that rules out a second resize at compile time.
///
/// ```
/// use rasterfit::{BlurOpts, ResizeConfig, Surface, TypedPipeline};
///
/// let source = Surface::new(40, 20)?;
/// let realized = TypedPipeline::new(source)
///     .blur(BlurOpts::new(1.0))
///     .resize(ResizeConfig::contain(10, 10)?)
///     .realize()?;
/// assert_eq!(realized.surface.width(), 10);
/// # Ok::<(), rasterfit::RasterfitError>(())
/// ```
///
/// A resized pipeline has no `resize` method:
///
/// ```compile_fail
/// use rasterfit::{ResizeConfig, Surface, TypedPipeline};
///
/// let p = TypedPipeline::new(Surface::new(4, 4).unwrap())
///     .resize(ResizeConfig::fill(2, 2).unwrap())
///     .resize(ResizeConfig::fill(1, 1).unwrap());
/// ```
#[derive(Debug)]
pub struct TypedPipeline<S, State = Unresized> {
    inner: Pipeline<S>,
    _state: PhantomData<State>,
}

impl<S: Source> TypedPipeline<S, Unresized> {
    /// Start a builder over `source`.
    pub fn new(source: S) -> Self {
        Self {
            inner: Pipeline::new(source),
            _state: PhantomData,
        }
    }

    /// Record the one resize.
    pub fn resize(mut self, config: ResizeConfig) -> TypedPipeline<S, Resized> {
        self.inner.resize_attempts += 1;
        self.inner.ops.push(Operation::Resize(config));
        TypedPipeline {
            inner: self.inner,
            _state: PhantomData,
        }
    }
}

impl<S: Source, State> TypedPipeline<S, State> {
    /// Record a blur.
    pub fn blur(mut self, opts: BlurOpts) -> Self {
        self.inner.ops.push(Operation::Blur(opts));
        self
    }

    /// Record a color filter.
    pub fn filter(mut self, opts: FilterOpts) -> Self {
        self.inner.ops.push(Operation::Filter(opts));
        self
    }

    /// Accumulated operations in append order.
    pub fn operations(&self) -> &[Operation] {
        self.inner.operations()
    }

    /// Consume the builder and draw once.
    pub fn realize(mut self) -> RasterfitResult<Realized> {
        self.inner.realize()
    }

    /// Hand over to the runtime-checked pipeline.
    pub fn into_pipeline(self) -> Pipeline<S> {
        self.inner
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/deferred.rs"]
mod tests;
