use crate::config::{AppConfig, ArtifactConfig, ChartConfig};
use crate::logging::*;
use crate::{plotting, render, web};
use anyhow::{anyhow, Context, Result};
use aquaforge_core::{
    artifacts::ArtifactStore,
    batch::{self, BatchSummary},
    model::Model,
    predictor::Predictor,
};
use aquaforge_schemas::measurement::MeasurementRecord;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Loads the scaler and model once. Any failure here is fatal for the process.
pub fn load_predictor(config: &ArtifactConfig) -> Result<Predictor> {
    let log = DEFAULT.new(o!("function" => "load_predictor"));
    let store = ArtifactStore::new(&config.scaler_path, &config.model_path)
        .with_validation(config.validate_on_load);

    let artifacts = match store.load() {
        Ok(artifacts) => artifacts,
        Err(e) => {
            crit!(log, "failed to load model or scaler";
                "scaler" => %store.scaler_path().display(),
                "model" => %store.model_path().display(),
                "error" => %e);
            return Err(anyhow!(e).context("Failed to load model or scaler. Please check your files."));
        }
    };

    info!(log, "artifacts loaded";
        "scaler" => artifacts.scaler.kind(),
        "model" => artifacts.model.kind(),
        "description" => artifacts.description.as_deref().unwrap_or("-"));
    if let Model::Stacking(stacking) = &artifacts.model {
        let names: Vec<&str> = stacking.estimator_names().collect();
        debug!(log, "stacking ensemble"; "estimators" => names.join(","));
    }
    Ok(Predictor::from_artifacts(artifacts))
}

/// Predicts one record, prints the labelled values and optionally saves the chart.
pub fn run_predict(
    predictor: &Predictor,
    record: &MeasurementRecord,
    chart_path: Option<&Path>,
    chart: &ChartConfig,
) -> Result<()> {
    let log = DEFAULT.new(o!("function" => "run_predict"));

    let result = predictor.predict(record).map_err(|e| {
        warn!(log, "prediction failed"; "error" => %e);
        anyhow!("Prediction failed: {}", e)
    })?;
    debug!(log, "prediction complete";
        "inputs" => ?record.to_row(),
        "outputs" => ?result.values);

    println!("Prediction Complete!");
    println!("Predicted Pollutant Levels:");
    for line in render::result_lines(&result) {
        println!("  {}", line);
    }

    if let Some(path) = chart_path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create chart directory: {:?}", parent))?;
        }
        plotting::bar_chart_png(&result, path, (chart.width, chart.height))
            .with_context(|| format!("Failed to write chart: {:?}", path))?;
        println!("Chart saved to '{}'", path.display());
    }
    Ok(())
}

/// Timestamped chart file name under the configured chart directory.
pub fn default_chart_path(chart: &ChartConfig) -> PathBuf {
    chart.output_dir.join(format!(
        "prediction_{}.png",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    ))
}

pub fn run_batch(predictor: &Predictor, input: &Path, output: &Path) -> Result<BatchSummary> {
    let log = DEFAULT.new(o!("function" => "run_batch"));
    let summary = batch::score_csv_file(predictor, input, output)
        .with_context(|| format!("Batch scoring of {:?} failed", input))?;
    info!(log, "batch complete";
        "rows" => summary.rows,
        "predicted" => summary.predicted,
        "failed" => summary.failed);
    println!(
        "Scored {} rows ({} predicted, {} failed). Results are in '{}'",
        summary.rows,
        summary.predicted,
        summary.failed,
        output.display()
    );
    Ok(summary)
}

pub async fn run_serve(predictor: Predictor, config: &AppConfig) -> Result<()> {
    let state = Arc::new(web::AppState {
        predictor,
        chart: config.chart.clone(),
    });
    web::run(state, &config.server.bind).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquaforge_schemas::{
        file_formats::{ModelFile, SCHEMA_VERSION},
        model::RegressorSpec,
        target::Target,
    };
    use tempfile::TempDir;

    fn demo_config() -> ArtifactConfig {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../data/artifacts");
        ArtifactConfig {
            scaler_path: dir.join("scaler.json"),
            model_path: dir.join("stacking_model.json"),
            validate_on_load: true,
        }
    }

    #[test]
    fn loads_demo_artifacts() {
        let predictor = load_predictor(&demo_config()).unwrap();
        let result = predictor.predict(&MeasurementRecord::default()).unwrap();
        assert!(result.get(Target::DissolvedOxygen).is_finite());
    }

    #[test]
    fn missing_scaler_is_fatal() {
        let mut config = demo_config();
        config.scaler_path = PathBuf::from("missing/scaler.json");
        let err = load_predictor(&config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to load model or scaler. Please check your files."
        );
        assert!(format!("{:#}", err).contains("missing/scaler.json"));
    }

    #[test]
    fn mismatched_model_fails_per_prediction_when_validation_is_off() {
        let dir = TempDir::new().unwrap();
        let model_path = dir.path().join("stacking_model.json");
        let model = ModelFile {
            schema_version: SCHEMA_VERSION.to_string(),
            description: None,
            model: RegressorSpec::Linear {
                coef: vec![vec![0.1; 8]; 3],
                intercept: vec![0.0; 3],
            },
        };
        fs::write(&model_path, serde_json::to_string(&model).unwrap()).unwrap();

        let mut config = demo_config();
        config.model_path = model_path;
        assert!(load_predictor(&config).is_err());

        config.validate_on_load = false;
        let predictor = load_predictor(&config).unwrap();
        let err = run_predict(
            &predictor,
            &MeasurementRecord::default(),
            None,
            &ChartConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Prediction failed: model expects 8 input features, got 6"
        );
    }

    #[test]
    fn predict_without_chart_succeeds() {
        let predictor = load_predictor(&demo_config()).unwrap();
        run_predict(
            &predictor,
            &MeasurementRecord::uniform(0.0),
            None,
            &ChartConfig::default(),
        )
        .unwrap();
    }

    #[test]
    fn batch_writes_one_row_per_input() {
        let predictor = load_predictor(&demo_config()).unwrap();
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("samples.csv");
        let output = dir.path().join("scored.csv");
        fs::write(
            &input,
            "NH4,NO3,NO2,SO4,PO4,CL\n1,1,1,1,1,1\n0,0,0,0,0,0\n100,100,100,100,100,100\n",
        )
        .unwrap();

        let summary = run_batch(&predictor, &input, &output).unwrap();
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.predicted, 3);
        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written.lines().count(), 4);
    }

    #[test]
    fn chart_path_is_timestamped_under_output_dir() {
        let path = default_chart_path(&ChartConfig::default());
        assert!(path.starts_with("data/charts"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("prediction_") && name.ends_with(".png"));
    }
}
