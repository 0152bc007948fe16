//! Composite regressors built from other regressors.

use super::Model;
use crate::error::ArtifactLoadError;

/// Stacked generalization: base estimator outputs become the final estimator's inputs.
#[derive(Debug, Clone)]
pub struct StackingRegressor {
    estimators: Vec<(String, Model)>,
    final_estimator: Box<Model>,
    passthrough: bool,
}

impl StackingRegressor {
    pub fn new(
        estimators: Vec<(String, Model)>,
        final_estimator: Model,
        passthrough: bool,
    ) -> Result<Self, ArtifactLoadError> {
        let n_features = shared_input_width(estimators.iter().map(|(_, m)| m), "stacking")?;

        let stacked: usize = estimators.iter().map(|(_, m)| m.n_outputs()).sum();
        let expected = if passthrough {
            stacked + n_features
        } else {
            stacked
        };
        if final_estimator.n_features() != expected {
            return Err(ArtifactLoadError::InvalidModel(format!(
                "final estimator takes {} inputs but the base estimators provide {}",
                final_estimator.n_features(),
                expected
            )));
        }

        Ok(Self {
            estimators,
            final_estimator: Box::new(final_estimator),
            passthrough,
        })
    }

    pub fn n_features(&self) -> usize {
        self.estimators[0].1.n_features()
    }

    pub fn n_outputs(&self) -> usize {
        self.final_estimator.n_outputs()
    }

    pub fn estimator_names(&self) -> impl Iterator<Item = &str> {
        self.estimators.iter().map(|(name, _)| name.as_str())
    }

    pub fn predict(&self, features: &[f64]) -> Vec<f64> {
        let mut stacked: Vec<f64> = self
            .estimators
            .iter()
            .flat_map(|(_, model)| model.predict_unchecked(features))
            .collect();
        if self.passthrough {
            stacked.extend_from_slice(features);
        }
        self.final_estimator.predict_unchecked(&stacked)
    }
}

/// One regressor per output, concatenated in declaration order.
#[derive(Debug, Clone)]
pub struct MultiOutputRegressor {
    estimators: Vec<Model>,
}

impl MultiOutputRegressor {
    pub fn new(estimators: Vec<Model>) -> Result<Self, ArtifactLoadError> {
        shared_input_width(estimators.iter(), "multi-output")?;
        Ok(Self { estimators })
    }

    pub fn n_features(&self) -> usize {
        self.estimators[0].n_features()
    }

    pub fn n_outputs(&self) -> usize {
        self.estimators.iter().map(Model::n_outputs).sum()
    }

    pub fn predict(&self, features: &[f64]) -> Vec<f64> {
        self.estimators
            .iter()
            .flat_map(|model| model.predict_unchecked(features))
            .collect()
    }
}

/// Input width shared by every member, or an error when members disagree or none exist.
fn shared_input_width<'a>(
    mut members: impl Iterator<Item = &'a Model>,
    kind: &str,
) -> Result<usize, ArtifactLoadError> {
    let first = members.next().ok_or_else(|| {
        ArtifactLoadError::InvalidModel(format!("{} model without estimators", kind))
    })?;
    let width = first.n_features();
    if let Some(other) = members.find(|m| m.n_features() != width) {
        return Err(ArtifactLoadError::InvalidModel(format!(
            "{} estimators disagree on input width ({} vs {})",
            kind,
            width,
            other.n_features()
        )));
    }
    Ok(width)
}
