use crate::{model::RegressorSpec, scaler::ScalerSpec};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerFile {
    pub schema_version: String,
    pub scaler: ScalerSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub model: RegressorSpec,
}
