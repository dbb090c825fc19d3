use rayon::prelude::*;

use crate::assets::Source;
use crate::foundation::error::RasterfitResult;
use crate::pipeline::deferred::{Pipeline, Realized};

/// Realize independent pipelines in parallel.
///
/// Results keep input order. Each pipeline owns its state, so a failure in one does not affect
/// the others.
#[tracing::instrument(level = "debug", skip_all, fields(count = pipelines.len()))]
pub fn realize_batch<S>(pipelines: &mut [Pipeline<S>]) -> Vec<RasterfitResult<Realized>>
where
    S: Source + Send,
{
    pipelines.par_iter_mut().map(Pipeline::realize).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/batch.rs"]
mod tests;
