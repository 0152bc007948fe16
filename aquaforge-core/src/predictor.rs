//! The load-then-predict path: one measurement record in, three labeled values out.

use crate::{artifacts::Artifacts, error::PredictionError, model::Model, scaler::Scaler};
use aquaforge_schemas::{
    measurement::MeasurementRecord,
    target::{PredictionResult, Target},
};
use std::sync::Arc;

/// Runs measurement records through the shared scaler and model.
///
/// Holds only read-only state; cloning shares the same artifacts.
#[derive(Debug, Clone)]
pub struct Predictor {
    artifacts: Arc<Artifacts>,
}

impl Predictor {
    pub fn new(scaler: Scaler, model: Model) -> Self {
        Self {
            artifacts: Arc::new(Artifacts {
                scaler,
                model,
                description: None,
            }),
        }
    }

    pub fn from_artifacts(artifacts: Arc<Artifacts>) -> Self {
        Self { artifacts }
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    /// Predicts the three pollutant levels for one sample.
    ///
    /// # Errors
    ///
    /// Any shape disagreement between the record, the scaler and the model, or
    /// a non-finite model output, is returned as a `PredictionError`. No
    /// partial result is produced.
    pub fn predict(&self, record: &MeasurementRecord) -> Result<PredictionResult, PredictionError> {
        let row = record.to_row();
        let scaled = self.artifacts.scaler.transform(&row)?;
        let output = self.artifacts.model.predict(&scaled)?;

        let values: [f64; Target::COUNT] =
            output
                .as_slice()
                .try_into()
                .map_err(|_| PredictionError::ModelOutput {
                    expected: Target::COUNT,
                    found: output.len(),
                })?;

        if let Some((target, value)) = Target::ALL
            .into_iter()
            .zip(values)
            .find(|(_, v)| !v.is_finite())
        {
            return Err(PredictionError::NonFinite {
                target: target.label(),
                value,
            });
        }

        Ok(PredictionResult::new(values))
    }

    /// Predicts every record independently; one failure does not affect the others.
    pub fn predict_batch(
        &self,
        records: &[MeasurementRecord],
    ) -> Vec<Result<PredictionResult, PredictionError>> {
        records.iter().map(|record| self.predict(record)).collect()
    }
}
