use serde::{Deserialize, Serialize};

/// Fitted parameters of a feature scaler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerSpec {
    /// Column names in the order the scaler was fitted on, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(flatten)]
    pub kind: ScalerKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerKind {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
    Identity { n_features: usize },
}

impl ScalerKind {
    pub fn name(&self) -> &'static str {
        match self {
            ScalerKind::Standard { .. } => "standard",
            ScalerKind::MinMax { .. } => "min_max",
            ScalerKind::Identity { .. } => "identity",
        }
    }
}
