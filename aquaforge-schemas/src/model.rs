use serde::{Deserialize, Serialize};

/// Serialized form of a fitted regressor.
///
/// Composite regressors nest, so a stacking ensemble is a tree of specs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorSpec {
    /// `y[o] = intercept[o] + coef[o] · x`
    Linear {
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
    /// One sequential tree ensemble per output, `trees[o]`.
    GradientBoosting {
        n_features: usize,
        learning_rate: f64,
        base_score: Vec<f64>,
        trees: Vec<Vec<TreeSpec>>,
    },
    /// Base estimator outputs, optionally followed by the raw features, feed the final estimator.
    Stacking {
        estimators: Vec<NamedEstimator>,
        final_estimator: Box<RegressorSpec>,
        #[serde(default)]
        passthrough: bool,
    },
    /// One regressor per output, results concatenated in order.
    MultiOutput { estimators: Vec<RegressorSpec> },
}

impl RegressorSpec {
    pub fn name(&self) -> &'static str {
        match self {
            RegressorSpec::Linear { .. } => "linear",
            RegressorSpec::GradientBoosting { .. } => "gradient_boosting",
            RegressorSpec::Stacking { .. } => "stacking",
            RegressorSpec::MultiOutput { .. } => "multi_output",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEstimator {
    pub name: String,
    pub estimator: RegressorSpec,
}

/// A regression tree stored as parallel node arrays.
///
/// A negative `feature` marks a leaf. Samples with `x[feature] <= threshold`
/// descend to `left`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSpec {
    pub feature: Vec<i32>,
    pub threshold: Vec<f64>,
    pub left: Vec<i32>,
    pub right: Vec<i32>,
    pub value: Vec<f64>,
}
