use crate::error::{ArtifactLoadError, PredictionError};
use aquaforge_schemas::scaler::{ScalerKind, ScalerSpec};

/// A fitted, immutable feature scaler.
#[derive(Debug, Clone)]
pub struct Scaler {
    feature_names: Option<Vec<String>>,
    transform: Transform,
}

#[derive(Debug, Clone)]
enum Transform {
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    MinMax { min: Vec<f64>, scale: Vec<f64> },
    Identity { n_features: usize },
}

impl Scaler {
    pub fn from_spec(spec: ScalerSpec) -> Result<Self, ArtifactLoadError> {
        let transform = match spec.kind {
            ScalerKind::Standard { mean, scale } => {
                check_same_len("mean", &mean, "scale", &scale)?;
                check_finite("mean", &mean)?;
                check_finite("scale", &scale)?;
                // Constant columns were fitted with a zero scale; they pass through unscaled.
                let scale = scale
                    .into_iter()
                    .map(|s| if s == 0.0 { 1.0 } else { s })
                    .collect();
                Transform::Standard { mean, scale }
            }
            ScalerKind::MinMax { min, scale } => {
                check_same_len("min", &min, "scale", &scale)?;
                check_finite("min", &min)?;
                check_finite("scale", &scale)?;
                Transform::MinMax { min, scale }
            }
            ScalerKind::Identity { n_features } => Transform::Identity { n_features },
        };

        let scaler = Self {
            feature_names: spec.feature_names,
            transform,
        };
        if let Some(names) = &scaler.feature_names {
            if names.len() != scaler.n_features() {
                return Err(ArtifactLoadError::InvalidScaler(format!(
                    "{} feature names for {} fitted columns",
                    names.len(),
                    scaler.n_features()
                )));
            }
        }
        Ok(scaler)
    }

    pub fn n_features(&self) -> usize {
        match &self.transform {
            Transform::Standard { mean, .. } => mean.len(),
            Transform::MinMax { min, .. } => min.len(),
            Transform::Identity { n_features } => *n_features,
        }
    }

    /// Column names recorded at fit time, in fitted order.
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    pub fn kind(&self) -> &'static str {
        match self.transform {
            Transform::Standard { .. } => "standard",
            Transform::MinMax { .. } => "min_max",
            Transform::Identity { .. } => "identity",
        }
    }

    /// Normalizes a single row.
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, PredictionError> {
        if row.len() != self.n_features() {
            return Err(PredictionError::ScalerShape {
                expected: self.n_features(),
                found: row.len(),
            });
        }

        let out = match &self.transform {
            Transform::Standard { mean, scale } => row
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect(),
            Transform::MinMax { min, scale } => row
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (m, s))| x * s + m)
                .collect(),
            Transform::Identity { .. } => row.to_vec(),
        };
        Ok(out)
    }
}

fn check_same_len(
    a_name: &str,
    a: &[f64],
    b_name: &str,
    b: &[f64],
) -> Result<(), ArtifactLoadError> {
    if a.len() != b.len() {
        return Err(ArtifactLoadError::InvalidScaler(format!(
            "'{}' has {} entries but '{}' has {}",
            a_name,
            a.len(),
            b_name,
            b.len()
        )));
    }
    Ok(())
}

fn check_finite(name: &str, values: &[f64]) -> Result<(), ArtifactLoadError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ArtifactLoadError::InvalidScaler(format!(
            "'{}' contains non-finite values",
            name
        )));
    }
    Ok(())
}
