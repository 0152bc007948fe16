//! Fitted regressors reconstructed from their serialized specs.

pub mod boosting;
pub mod ensemble;
pub mod linear;
pub mod tree;

use crate::error::{ArtifactLoadError, PredictionError};
use aquaforge_schemas::model::RegressorSpec;
use boosting::GradientBoostingRegressor;
use ensemble::{MultiOutputRegressor, StackingRegressor};
use linear::LinearRegressor;

/// A fitted, immutable regression model.
///
/// Construction validates internal consistency (nested input and output
/// widths), so a model that loads can always be evaluated on rows of
/// [`Model::n_features`] columns.
#[derive(Debug, Clone)]
pub enum Model {
    Linear(LinearRegressor),
    GradientBoosting(GradientBoostingRegressor),
    Stacking(StackingRegressor),
    MultiOutput(MultiOutputRegressor),
}

impl Model {
    pub fn from_spec(spec: &RegressorSpec) -> Result<Self, ArtifactLoadError> {
        let model = match spec {
            RegressorSpec::Linear { coef, intercept } => {
                Model::Linear(LinearRegressor::new(coef.clone(), intercept.clone())?)
            }
            RegressorSpec::GradientBoosting {
                n_features,
                learning_rate,
                base_score,
                trees,
            } => Model::GradientBoosting(GradientBoostingRegressor::from_spec(
                *n_features,
                *learning_rate,
                base_score.clone(),
                trees,
            )?),
            RegressorSpec::Stacking {
                estimators,
                final_estimator,
                passthrough,
            } => {
                let estimators = estimators
                    .iter()
                    .map(|named| Ok((named.name.clone(), Model::from_spec(&named.estimator)?)))
                    .collect::<Result<Vec<_>, ArtifactLoadError>>()?;
                let final_estimator = Model::from_spec(final_estimator)?;
                Model::Stacking(StackingRegressor::new(
                    estimators,
                    final_estimator,
                    *passthrough,
                )?)
            }
            RegressorSpec::MultiOutput { estimators } => {
                let estimators = estimators
                    .iter()
                    .map(Model::from_spec)
                    .collect::<Result<Vec<_>, _>>()?;
                Model::MultiOutput(MultiOutputRegressor::new(estimators)?)
            }
        };
        Ok(model)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Model::Linear(_) => "linear",
            Model::GradientBoosting(_) => "gradient_boosting",
            Model::Stacking(_) => "stacking",
            Model::MultiOutput(_) => "multi_output",
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            Model::Linear(m) => m.n_features(),
            Model::GradientBoosting(m) => m.n_features(),
            Model::Stacking(m) => m.n_features(),
            Model::MultiOutput(m) => m.n_features(),
        }
    }

    pub fn n_outputs(&self) -> usize {
        match self {
            Model::Linear(m) => m.n_outputs(),
            Model::GradientBoosting(m) => m.n_outputs(),
            Model::Stacking(m) => m.n_outputs(),
            Model::MultiOutput(m) => m.n_outputs(),
        }
    }

    /// Predicts one output row for one input row.
    ///
    /// # Errors
    ///
    /// Returns `ModelInput` if `features` does not have exactly
    /// [`Model::n_features`] columns.
    pub fn predict(&self, features: &[f64]) -> Result<Vec<f64>, PredictionError> {
        if features.len() != self.n_features() {
            return Err(PredictionError::ModelInput {
                expected: self.n_features(),
                found: features.len(),
            });
        }
        Ok(self.predict_unchecked(features))
    }

    pub(crate) fn predict_unchecked(&self, features: &[f64]) -> Vec<f64> {
        match self {
            Model::Linear(m) => m.predict(features),
            Model::GradientBoosting(m) => m.predict(features),
            Model::Stacking(m) => m.predict(features),
            Model::MultiOutput(m) => m.predict(features),
        }
    }
}
