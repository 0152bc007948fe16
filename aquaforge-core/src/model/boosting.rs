//! Gradient boosted regression trees.
//!
//! Each output owns a sequential ensemble. The prediction for output `o` is
//! `base_score[o] + learning_rate * Σ tree(x)` over that output's trees.

use super::tree::RegressionTree;
use crate::error::ArtifactLoadError;
use aquaforge_schemas::model::TreeSpec;

#[derive(Debug, Clone)]
pub struct GradientBoostingRegressor {
    trees: Vec<Vec<RegressionTree>>,
    learning_rate: f64,
    base_score: Vec<f64>,
    n_features: usize,
}

impl GradientBoostingRegressor {
    /// Builds the ensemble from serialized trees, one tree list per output.
    ///
    /// # Errors
    ///
    /// Returns `InvalidModel` if there are no outputs, `base_score` does not
    /// match the number of outputs, or any tree is malformed.
    pub fn from_spec(
        n_features: usize,
        learning_rate: f64,
        base_score: Vec<f64>,
        trees: &[Vec<TreeSpec>],
    ) -> Result<Self, ArtifactLoadError> {
        if trees.is_empty() {
            return Err(ArtifactLoadError::InvalidModel(
                "gradient boosting model without outputs".into(),
            ));
        }
        if base_score.len() != trees.len() {
            return Err(ArtifactLoadError::InvalidModel(format!(
                "{} base scores for {} outputs",
                base_score.len(),
                trees.len()
            )));
        }
        if n_features == 0 {
            return Err(ArtifactLoadError::InvalidModel(
                "gradient boosting model declares no features".into(),
            ));
        }
        if !learning_rate.is_finite() {
            return Err(ArtifactLoadError::InvalidModel(
                "learning rate is not finite".into(),
            ));
        }

        let trees = trees
            .iter()
            .map(|per_output| {
                per_output
                    .iter()
                    .map(|spec| RegressionTree::from_spec(spec, n_features))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            trees,
            learning_rate,
            base_score,
            n_features,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_outputs(&self) -> usize {
        self.trees.len()
    }

    /// Number of boosting rounds summed over all outputs.
    pub fn n_estimators(&self) -> usize {
        self.trees.iter().map(Vec::len).sum()
    }

    pub fn predict(&self, features: &[f64]) -> Vec<f64> {
        self.trees
            .iter()
            .zip(&self.base_score)
            .map(|(per_output, base)| {
                let residual: f64 = per_output.iter().map(|tree| tree.predict(features)).sum();
                base + self.learning_rate * residual
            })
            .collect()
    }
}
