use aquaforge_core::{
    artifacts::ArtifactStore,
    error::{ArtifactLoadError, PredictionError},
    predictor::Predictor,
};
use aquaforge_schemas::{
    file_formats::{ModelFile, SCHEMA_VERSION},
    measurement::MeasurementRecord,
    model::RegressorSpec,
    target::Target,
};
use std::{fs, path::PathBuf};
use tempfile::TempDir;

fn artifact_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../data/artifacts")
}

fn demo_predictor() -> Predictor {
    let dir = artifact_dir();
    let store = ArtifactStore::new(dir.join("scaler.json"), dir.join("stacking_model.json"));
    Predictor::from_artifacts(store.load().expect("demo artifacts should load"))
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn demo_artifacts_pass_validation() {
    let predictor = demo_predictor();
    let artifacts = predictor.artifacts();
    assert_eq!(artifacts.model.kind(), "stacking");
    assert_eq!(artifacts.scaler.kind(), "standard");
    assert_eq!(artifacts.model.n_features(), 6);
    assert_eq!(artifacts.model.n_outputs(), 3);
}

#[test]
fn default_form_values_predict_three_finite_levels() {
    let result = demo_predictor()
        .predict(&MeasurementRecord::default())
        .unwrap();
    assert_eq!(result.iter().count(), 3);
    assert!(result.values.iter().all(|v| v.is_finite()));
    assert_close(result.get(Target::DissolvedOxygen), 7.7037);
    assert_close(result.get(Target::Bsk5), 3.5208);
    assert_close(result.get(Target::SuspendedSolids), 11.27);
}

#[test]
fn boundary_inputs_complete() {
    let predictor = demo_predictor();
    for value in [0.0, 100.0] {
        let result = predictor
            .predict(&MeasurementRecord::uniform(value))
            .unwrap();
        assert!(result.values.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn feeding_values_in_the_wrong_positions_changes_the_prediction() {
    let predictor = demo_predictor();
    let ordered = MeasurementRecord::from_row([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let reversed = MeasurementRecord::from_row([6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
    assert_ne!(
        predictor.predict(&ordered).unwrap(),
        predictor.predict(&reversed).unwrap()
    );
}

#[test]
fn repeated_predictions_are_identical() {
    let predictor = demo_predictor();
    let record = MeasurementRecord::from_row([0.4, 12.0, 0.1, 80.0, 0.9, 55.0]);
    assert_eq!(
        predictor.predict(&record).unwrap(),
        predictor.predict(&record).unwrap()
    );
}

#[test]
fn missing_model_file_stops_before_any_prediction() {
    let dir = artifact_dir();
    let store = ArtifactStore::new(dir.join("scaler.json"), dir.join("no_such_model.json"));
    let err = store.load().unwrap_err();
    assert!(matches!(err, ArtifactLoadError::FileIO(ref path, _) if path.ends_with("no_such_model.json")));
    assert!(!store.is_loaded());
}

#[test]
fn eight_feature_model_surfaces_as_prediction_failure() {
    let scratch = TempDir::new().unwrap();
    let model_path = scratch.path().join("stacking_model.json");
    let model = ModelFile {
        schema_version: SCHEMA_VERSION.to_string(),
        description: None,
        model: RegressorSpec::Linear {
            coef: vec![vec![0.1; 8]; 3],
            intercept: vec![0.0; 3],
        },
    };
    fs::write(&model_path, serde_json::to_string(&model).unwrap()).unwrap();

    let store = ArtifactStore::new(artifact_dir().join("scaler.json"), &model_path)
        .with_validation(false);
    let predictor = Predictor::from_artifacts(store.load().unwrap());
    let err = predictor
        .predict(&MeasurementRecord::default())
        .unwrap_err();
    assert_eq!(
        err,
        PredictionError::ModelInput {
            expected: 8,
            found: 6
        }
    );

    // Still usable for the next request.
    assert!(predictor.predict(&MeasurementRecord::uniform(2.0)).is_err());
}
