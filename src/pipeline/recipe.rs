use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::assets::Source;
use crate::effects::filter::{BlurOpts, FilterOpts};
use crate::foundation::error::{RasterfitError, RasterfitResult};
use crate::layout::config::ResizeConfig;
use crate::pipeline::deferred::{Operation, Pipeline};

/// JSON description of one composition: an optional resize plus ordered filters.
///
/// ```json
/// {"resize": {"fit": "cover", "width": 800, "height": 800},
///  "ops": [{"blur": {"sigma": 2}}, {"filter": {"brightness": 1.2}}]}
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    /// Fit applied before the filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resize: Option<ResizeConfig>,
    /// Filters in application order.
    #[serde(default)]
    pub ops: Vec<RecipeOp>,
}

/// One filter entry of a [`Recipe`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeOp {
    /// Gaussian blur.
    Blur(BlurOpts),
    /// Color filter.
    Filter(FilterOpts),
}

impl Recipe {
    /// Parse a recipe from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> RasterfitResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| RasterfitError::config(format!("parse recipe JSON: {e}")))
    }

    /// Parse a recipe from a JSON string.
    pub fn from_json_str(s: &str) -> RasterfitResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a recipe from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> RasterfitResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            RasterfitError::config(format!("open recipe JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Pipeline operations, resize first.
    pub fn operations(&self) -> Vec<Operation> {
        self.resize
            .iter()
            .cloned()
            .map(Operation::Resize)
            .chain(self.ops.iter().map(|op| match *op {
                RecipeOp::Blur(b) => Operation::Blur(b),
                RecipeOp::Filter(f) => Operation::Filter(f),
            }))
            .collect()
    }

    /// Append every operation to `pipeline`.
    pub fn apply_to<S: Source>(&self, pipeline: &mut Pipeline<S>) -> RasterfitResult<()> {
        for op in self.operations() {
            pipeline.append(op)?;
        }
        Ok(())
    }

    /// New pipeline over `source` with this recipe applied.
    pub fn pipeline<S: Source>(&self, source: S) -> RasterfitResult<Pipeline<S>> {
        let mut p = Pipeline::new(source);
        self.apply_to(&mut p)?;
        Ok(p)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/recipe.rs"]
mod tests;
