//! One-time loading of the fitted scaler and model from disk.

use crate::{error::ArtifactLoadError, model::Model, scaler::Scaler};
use aquaforge_schemas::{
    feature::Feature,
    file_formats::{ModelFile, ScalerFile, SCHEMA_VERSION},
    target::Target,
};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

/// The scaler and model pair every prediction runs through.
#[derive(Debug)]
pub struct Artifacts {
    pub scaler: Scaler,
    pub model: Model,
    pub description: Option<String>,
}

impl Artifacts {
    /// Checks that the artifacts agree with the six measurement columns and
    /// the three predicted targets.
    ///
    /// # Errors
    ///
    /// Returns `FeatureOrder` if the scaler recorded different column names or
    /// a different order, and `Arity` if the scaler or model widths differ from
    /// the measurement record or the target list.
    pub fn validate(&self) -> Result<(), ArtifactLoadError> {
        let expected: Vec<String> = Feature::ALL.iter().map(|f| f.column().to_string()).collect();
        if let Some(names) = self.scaler.feature_names() {
            if names != expected.as_slice() {
                return Err(ArtifactLoadError::FeatureOrder {
                    found: names.to_vec(),
                    expected,
                });
            }
        }
        check_arity("scaler", "input features", self.scaler.n_features(), Feature::COUNT)?;
        check_arity("model", "input features", self.model.n_features(), Feature::COUNT)?;
        check_arity("model", "outputs", self.model.n_outputs(), Target::COUNT)?;
        Ok(())
    }
}

fn check_arity(
    component: &'static str,
    dimension: &'static str,
    found: usize,
    expected: usize,
) -> Result<(), ArtifactLoadError> {
    if found != expected {
        return Err(ArtifactLoadError::Arity {
            component,
            dimension,
            found,
            expected,
        });
    }
    Ok(())
}

/// Lazily loads the artifacts on first use and hands out the same instance afterwards.
///
/// A failed load leaves the store empty; callers are expected to treat the
/// error as fatal rather than retry.
#[derive(Debug)]
pub struct ArtifactStore {
    scaler_path: PathBuf,
    model_path: PathBuf,
    validate: bool,
    loaded: OnceCell<Arc<Artifacts>>,
}

impl ArtifactStore {
    pub fn new(scaler_path: impl Into<PathBuf>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            scaler_path: scaler_path.into(),
            model_path: model_path.into(),
            validate: true,
            loaded: OnceCell::new(),
        }
    }

    /// Enables or disables the column order and arity checks run at load time.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn scaler_path(&self) -> &Path {
        &self.scaler_path
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// Returns the cached artifacts, reading them from disk on the first call.
    pub fn load(&self) -> Result<Arc<Artifacts>, ArtifactLoadError> {
        self.loaded
            .get_or_try_init(|| {
                let artifacts = read_artifacts(&self.scaler_path, &self.model_path)?;
                if self.validate {
                    artifacts.validate()?;
                }
                Ok(Arc::new(artifacts))
            })
            .cloned()
    }
}

/// Reads and reconstructs both artifacts without any width checks.
pub fn read_artifacts(scaler_path: &Path, model_path: &Path) -> Result<Artifacts, ArtifactLoadError> {
    let scaler_file: ScalerFile = read_json(scaler_path)?;
    check_schema_version(scaler_path, &scaler_file.schema_version)?;
    let scaler = Scaler::from_spec(scaler_file.scaler)?;

    let model_file: ModelFile = read_json(model_path)?;
    check_schema_version(model_path, &model_file.schema_version)?;
    let model = Model::from_spec(&model_file.model)?;

    Ok(Artifacts {
        scaler,
        model,
        description: model_file.description,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactLoadError> {
    let display = path.display().to_string();
    let content =
        fs::read_to_string(path).map_err(|e| ArtifactLoadError::FileIO(display.clone(), e))?;
    serde_json::from_str(&content).map_err(|e| ArtifactLoadError::JsonParsing(display, e))
}

fn check_schema_version(path: &Path, found: &str) -> Result<(), ArtifactLoadError> {
    if found != SCHEMA_VERSION {
        return Err(ArtifactLoadError::SchemaVersion {
            path: path.display().to_string(),
            found: found.to_string(),
            expected: SCHEMA_VERSION,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquaforge_schemas::{
        model::RegressorSpec,
        scaler::{ScalerKind, ScalerSpec},
    };
    use tempfile::TempDir;

    fn scaler_file(names: Option<Vec<&str>>, width: usize) -> ScalerFile {
        ScalerFile {
            schema_version: SCHEMA_VERSION.to_string(),
            scaler: ScalerSpec {
                feature_names: names.map(|n| n.into_iter().map(String::from).collect()),
                kind: ScalerKind::Standard {
                    mean: vec![0.0; width],
                    scale: vec![1.0; width],
                },
            },
        }
    }

    fn model_file(n_features: usize, n_outputs: usize) -> ModelFile {
        ModelFile {
            schema_version: SCHEMA_VERSION.to_string(),
            description: Some("test model".into()),
            model: RegressorSpec::Linear {
                coef: vec![vec![0.5; n_features]; n_outputs],
                intercept: vec![1.0; n_outputs],
            },
        }
    }

    fn write_pair(dir: &Path, scaler: &ScalerFile, model: &ModelFile) -> (PathBuf, PathBuf) {
        let scaler_path = dir.join("scaler.json");
        let model_path = dir.join("model.json");
        fs::write(&scaler_path, serde_json::to_string(scaler).unwrap()).unwrap();
        fs::write(&model_path, serde_json::to_string(model).unwrap()).unwrap();
        (scaler_path, model_path)
    }

    const COLUMNS: [&str; 6] = ["NH4", "NO3", "NO2", "SO4", "PO4", "CL"];

    #[test]
    fn loads_once_and_caches() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        let (scaler_path, model_path) =
            write_pair(&dir, &scaler_file(Some(COLUMNS.to_vec()), 6), &model_file(6, 3));
        let store = ArtifactStore::new(&scaler_path, &model_path);
        assert!(!store.is_loaded());

        let first = store.load().unwrap();
        assert!(store.is_loaded());
        assert_eq!(first.description.as_deref(), Some("test model"));

        // The second call must not touch the disk again.
        fs::remove_file(&scaler_path).unwrap();
        let second = store.load().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        let store = ArtifactStore::new(dir.join("nope.json"), dir.join("model.json"));
        assert!(matches!(store.load(), Err(ArtifactLoadError::FileIO(_, _))));
        assert!(!store.is_loaded());
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        let (scaler_path, model_path) =
            write_pair(&dir, &scaler_file(None, 6), &model_file(6, 3));
        fs::write(&model_path, "{ not json").unwrap();
        let store = ArtifactStore::new(&scaler_path, &model_path);
        assert!(matches!(store.load(), Err(ArtifactLoadError::JsonParsing(_, _))));
    }

    #[test]
    fn rejects_unknown_schema_version() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        let mut scaler = scaler_file(None, 6);
        scaler.schema_version = "0.3".into();
        let (scaler_path, model_path) = write_pair(&dir, &scaler, &model_file(6, 3));
        let err = ArtifactStore::new(&scaler_path, &model_path).load().unwrap_err();
        assert!(matches!(err, ArtifactLoadError::SchemaVersion { .. }));
    }

    #[test]
    fn rejects_reordered_scaler_columns() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        let swapped = vec!["NO3", "NH4", "NO2", "SO4", "PO4", "CL"];
        let (scaler_path, model_path) =
            write_pair(&dir, &scaler_file(Some(swapped), 6), &model_file(6, 3));
        let err = ArtifactStore::new(&scaler_path, &model_path).load().unwrap_err();
        assert!(matches!(err, ArtifactLoadError::FeatureOrder { .. }));
    }

    #[test]
    fn arity_checks_can_be_disabled() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        let (scaler_path, model_path) =
            write_pair(&dir, &scaler_file(None, 6), &model_file(8, 3));

        let err = ArtifactStore::new(&scaler_path, &model_path).load().unwrap_err();
        assert!(matches!(
            err,
            ArtifactLoadError::Arity {
                component: "model",
                found: 8,
                expected: 6,
                ..
            }
        ));

        let lenient = ArtifactStore::new(&scaler_path, &model_path).with_validation(false);
        assert_eq!(lenient.load().unwrap().model.n_features(), 8);
    }

    #[test]
    fn rejects_wrong_output_count() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        let (scaler_path, model_path) =
            write_pair(&dir, &scaler_file(None, 6), &model_file(6, 2));
        let err = ArtifactStore::new(&scaler_path, &model_path).load().unwrap_err();
        assert!(matches!(
            err,
            ArtifactLoadError::Arity {
                dimension: "outputs",
                ..
            }
        ));
    }
}
