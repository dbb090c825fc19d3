//! rasterfit sizes and composites images.
//!
//! It has two cores:
//!
//! - [`calculate_final_layout`]: pure fit-mode geometry (cover, contain, fill, max_fit, min_fit)
//!   giving the scaled image size, the output size and the placement offset in exact pixels.
//! - [`Pipeline`]: a deferred pipeline that accumulates one resize plus any number of blurs and
//!   color filters, then draws the source exactly once in [`Pipeline::realize`].
//!
//! Around them sit a size-keyed [`SurfacePool`], one [`FitModeEngine`] per mode sharing a single
//! compose routine, a [`StepwisePipeline`] that runs operations one at a time over pooled
//! surfaces, JSON [`Recipe`]s, and the [`encode`] boundary.
//!
//! ```
//! use rasterfit::{ResizeConfig, calculate_final_layout};
//!
//! let cfg = ResizeConfig::cover(800, 800)?;
//! let layout = calculate_final_layout(1920, 1080, &cfg)?;
//! assert_eq!((layout.image_size.width, layout.image_size.height), (1422, 800));
//! assert_eq!((layout.position.x, layout.position.y), (-311, 0));
//! # Ok::<(), rasterfit::RasterfitError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod effects;
/// Encoders turning finished surfaces into bytes.
pub mod encode;
pub(crate) mod fit;
pub(crate) mod layout;
pub(crate) mod pipeline;
pub(crate) mod render;

pub use crate::foundation::color::Color;
pub use crate::foundation::core::{Affine, Position, Rect, Rgba8Premul, Size};
pub use crate::foundation::error::{ErrorKind, RasterfitError, RasterfitResult};

pub use crate::layout::calc::{LayoutResult, calculate_final_layout};
pub use crate::layout::config::{Bounds, Fit, FitMode, ResizeConfig, Target};
pub use crate::layout::padding::{Edges, Padding, PaddingEdges};

pub use crate::effects::filter::{BlurOpts, ColorMatrix, FilterExpr, FilterOpts, FilterStep, FoldedFilter};

pub use crate::render::surface::Surface;
pub use crate::render::surface_pool::{PoolOpts, PoolStats, SurfacePool};

pub use crate::assets::Source;
pub use crate::assets::raster::RasterSource;
pub use crate::assets::vector::VectorSource;

pub use crate::fit::engines::{
    ContainEngine, CoverEngine, FillEngine, FitModeEngine, MaxFitEngine, MinFitEngine, engine_for,
};

pub use crate::pipeline::batch::realize_batch;
pub use crate::pipeline::deferred::{Operation, Pipeline, Realized, Resized, TypedPipeline, Unresized};
pub use crate::pipeline::recipe::{Recipe, RecipeOp};
pub use crate::pipeline::stepwise::{StepwiseOpts, StepwisePipeline};

pub use crate::encode::{EncodeError, EncodedImage, Encoder, ImageFormat, JpegEncoder, PngEncoder};
