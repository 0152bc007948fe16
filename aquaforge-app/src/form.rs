//! Input form: turns raw operator input into a bounded measurement record.

use aquaforge_schemas::{feature::Feature, measurement::MeasurementRecord};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{field} must be a number, got '{raw}'")]
    NotANumber { field: &'static str, raw: String },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Parses and bounds-checks one field value.
pub fn parse_field(feature: Feature, raw: &str) -> Result<f64, FormError> {
    let value: f64 = raw.trim().parse().map_err(|_| FormError::NotANumber {
        field: feature.label(),
        raw: raw.to_string(),
    })?;
    let bounds = feature.bounds();
    if !bounds.contains(value) {
        return Err(FormError::OutOfRange {
            field: feature.label(),
            value,
            min: bounds.min,
            max: bounds.max,
        });
    }
    Ok(value)
}

/// Builds a record from submitted form fields keyed by `Feature::key`.
///
/// Fields that were not submitted keep their default value.
pub fn record_from_fields(fields: &HashMap<String, String>) -> Result<MeasurementRecord, FormError> {
    let mut record = MeasurementRecord::default();
    for feature in Feature::ALL {
        if let Some(raw) = fields.get(feature.key()) {
            record.set(feature, parse_field(feature, raw)?);
        }
    }
    Ok(record)
}

/// Best-effort copy of the submitted values, so a rejected form can be shown again as typed.
pub fn echo_fields(fields: &HashMap<String, String>) -> HashMap<Feature, String> {
    Feature::ALL
        .into_iter()
        .map(|feature| {
            let value = fields
                .get(feature.key())
                .cloned()
                .unwrap_or_else(|| feature.bounds().default.to_string());
            (feature, value)
        })
        .collect()
}

macro_rules! measurement_parser {
    ($name:ident, $feature:expr) => {
        pub fn $name(raw: &str) -> Result<f64, String> {
            parse_field($feature, raw).map_err(|e| e.to_string())
        }
    };
}

// `clap` value parsers, one per flag so the error names the right field.
measurement_parser!(parse_nh4, Feature::Nh4);
measurement_parser!(parse_no3, Feature::No3);
measurement_parser!(parse_no2, Feature::No2);
measurement_parser!(parse_so4, Feature::So4);
measurement_parser!(parse_po4, Feature::Po4);
measurement_parser!(parse_cl, Feature::Cl);
