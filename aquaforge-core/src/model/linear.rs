use crate::error::ArtifactLoadError;

/// Multi-output linear regressor, `y[o] = intercept[o] + coef[o] · x`.
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

impl LinearRegressor {
    pub fn new(coef: Vec<Vec<f64>>, intercept: Vec<f64>) -> Result<Self, ArtifactLoadError> {
        let n_features = coef.first().map_or(0, Vec::len);
        if coef.is_empty() || n_features == 0 {
            return Err(ArtifactLoadError::InvalidModel(
                "linear regressor without coefficients".into(),
            ));
        }
        if coef.iter().any(|row| row.len() != n_features) {
            return Err(ArtifactLoadError::InvalidModel(
                "linear coefficient rows differ in length".into(),
            ));
        }
        if intercept.len() != coef.len() {
            return Err(ArtifactLoadError::InvalidModel(format!(
                "{} intercepts for {} coefficient rows",
                intercept.len(),
                coef.len()
            )));
        }
        Ok(Self { coef, intercept })
    }

    pub fn n_features(&self) -> usize {
        self.coef[0].len()
    }

    pub fn n_outputs(&self) -> usize {
        self.coef.len()
    }

    pub fn predict(&self, features: &[f64]) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| b + row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>())
            .collect()
    }
}
