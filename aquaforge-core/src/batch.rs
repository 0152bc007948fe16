//! Scoring a CSV file of measurement records in one pass.

use crate::{error::BatchError, predictor::Predictor};
use aquaforge_schemas::{
    measurement::MeasurementRecord,
    target::{PredictionResult, Target},
};
use serde::Serialize;
use std::{
    io::{Read, Write},
    path::Path,
};

/// One output line: the input columns, the three predictions and an optional error.
#[derive(Debug, Serialize)]
struct ScoredRow {
    #[serde(rename = "NH4")]
    nh4: f64,
    #[serde(rename = "NO3")]
    no3: f64,
    #[serde(rename = "NO2")]
    no2: f64,
    #[serde(rename = "SO4")]
    so4: f64,
    #[serde(rename = "PO4")]
    po4: f64,
    #[serde(rename = "CL")]
    cl: f64,
    #[serde(rename = "O2")]
    o2: Option<f64>,
    #[serde(rename = "BSK5")]
    bsk5: Option<f64>,
    #[serde(rename = "SuspendedSolids")]
    suspended_solids: Option<f64>,
    error: Option<String>,
}

impl ScoredRow {
    fn new(record: &MeasurementRecord, outcome: Result<PredictionResult, String>) -> Self {
        let (prediction, error) = match outcome {
            Ok(result) => (Some(result), None),
            Err(e) => (None, Some(e)),
        };
        let value = |target| prediction.map(|p: PredictionResult| p.get(target));
        Self {
            nh4: record.nh4,
            no3: record.no3,
            no2: record.no2,
            so4: record.so4,
            po4: record.po4,
            cl: record.cl,
            o2: value(Target::DissolvedOxygen),
            bsk5: value(Target::Bsk5),
            suspended_solids: value(Target::SuspendedSolids),
            error,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub rows: usize,
    pub predicted: usize,
    pub failed: usize,
}

/// Scores every row of `input` and writes one output row per input row.
///
/// Rows outside the measurement bounds and rows whose prediction fails are
/// kept in the output with an `error` message. A row that cannot be parsed
/// at all aborts the batch.
pub fn score_csv<R: Read, W: Write>(
    predictor: &Predictor,
    input: R,
    output: W,
    source: &str,
) -> Result<BatchSummary, BatchError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut writer = csv::Writer::from_writer(output);
    let mut summary = BatchSummary::default();

    for result in reader.deserialize() {
        let record: MeasurementRecord =
            result.map_err(|e| BatchError::CsvError(source.to_string(), e))?;
        summary.rows += 1;

        let outcome = match record.out_of_bounds() {
            Some((feature, value)) => Err(format!(
                "{} value {} outside [{}, {}]",
                feature,
                value,
                feature.bounds().min,
                feature.bounds().max
            )),
            None => predictor.predict(&record).map_err(|e| e.to_string()),
        };
        if outcome.is_ok() {
            summary.predicted += 1;
        } else {
            summary.failed += 1;
        }

        writer
            .serialize(ScoredRow::new(&record, outcome))
            .map_err(|e| BatchError::CsvError(source.to_string(), e))?;
    }

    writer
        .flush()
        .map_err(|e| BatchError::FileIO(source.to_string(), e))?;
    Ok(summary)
}

/// File based wrapper around [`score_csv`].
pub fn score_csv_file(
    predictor: &Predictor,
    input_path: &Path,
    output_path: &Path,
) -> Result<BatchSummary, BatchError> {
    let input_name = input_path.display().to_string();
    let output_name = output_path.display().to_string();
    let input = std::fs::File::open(input_path)
        .map_err(|e| BatchError::FileIO(input_name.clone(), e))?;
    let output = std::fs::File::create(output_path)
        .map_err(|e| BatchError::FileIO(output_name, e))?;
    score_csv(predictor, input, output, &input_name)
}
