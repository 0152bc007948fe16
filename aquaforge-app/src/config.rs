use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fs, path::{Path, PathBuf}};

pub const CONFIG_SCHEMA_VERSION: &str = "1.0";

/// Everything the application reads from `config.yaml`.
///
/// Every section is optional in the file; missing values fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub schema_version: String,
    pub artifacts: ArtifactConfig,
    pub server: ServerConfig,
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub scaler_path: PathBuf,
    pub model_path: PathBuf,
    /// Check column order and model widths against the six measurements when loading.
    pub validate_on_load: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION.to_string(),
            artifacts: ArtifactConfig::default(),
            server: ServerConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            scaler_path: PathBuf::from("data/artifacts/scaler.json"),
            model_path: PathBuf::from("data/artifacts/stacking_model.json"),
            validate_on_load: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            output_dir: PathBuf::from("data/charts"),
        }
    }
}

impl AppConfig {
    /// Loads the configuration file, or the defaults if the file does not exist.
    ///
    /// Environment overrides (`AQUAFORGE_BIND`, `AQUAFORGE_SCALER`,
    /// `AQUAFORGE_MODEL`) are applied on top.
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            Self::from_yaml(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };
        Ok(config.with_env_overrides())
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(content)?;
        if config.schema_version != CONFIG_SCHEMA_VERSION {
            bail!(
                "unsupported config schema version '{}', expected '{}'",
                config.schema_version,
                CONFIG_SCHEMA_VERSION
            );
        }
        if config.chart.width == 0 || config.chart.height == 0 {
            bail!("chart dimensions must be non-zero");
        }
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(bind) = std::env::var("AQUAFORGE_BIND") {
            self.server.bind = bind;
        }
        if let Ok(path) = std::env::var("AQUAFORGE_SCALER") {
            self.artifacts.scaler_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("AQUAFORGE_MODEL") {
            self.artifacts.model_path = PathBuf::from(path);
        }
        self
    }
}
