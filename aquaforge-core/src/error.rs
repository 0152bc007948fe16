use thiserror::Error;

/// Failure to bring the scaler or model into memory.
///
/// Fatal for the process: nothing may be predicted without both artifacts.
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("I/O error for artifact '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse artifact '{0}': {1}")]
    JsonParsing(String, #[source] serde_json::Error),

    #[error("Artifact '{path}' has schema version '{found}', expected '{expected}'")]
    SchemaVersion {
        path: String,
        found: String,
        expected: &'static str,
    },

    #[error("Scaler was fitted on columns {found:?}, expected {expected:?}")]
    FeatureOrder {
        found: Vec<String>,
        expected: Vec<String>,
    },

    #[error("{component} has {found} {dimension}, expected {expected}")]
    Arity {
        component: &'static str,
        dimension: &'static str,
        found: usize,
        expected: usize,
    },

    #[error("Invalid scaler: {0}")]
    InvalidScaler(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),
}

/// Failure of a single prediction request. The loaded artifacts stay usable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("scaler expects {expected} features, got {found}")]
    ScalerShape { expected: usize, found: usize },

    #[error("model expects {expected} input features, got {found}")]
    ModelInput { expected: usize, found: usize },

    #[error("model produced {found} outputs, expected {expected}")]
    ModelOutput { expected: usize, found: usize },

    #[error("model produced a non-finite value ({value}) for {target}")]
    NonFinite { target: &'static str, value: f64 },
}

/// Failure of a whole batch run. Per-row failures are written to the output instead.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),
}
