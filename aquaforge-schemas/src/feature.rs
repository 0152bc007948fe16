use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six water chemistry measurements fed to the scaler.
///
/// The declaration order is the column order the scaler and model were fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "NH4")]
    Nh4,
    #[serde(rename = "NO3")]
    No3,
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "SO4")]
    So4,
    #[serde(rename = "PO4")]
    Po4,
    #[serde(rename = "CL")]
    Cl,
}

impl Feature {
    pub const COUNT: usize = 6;

    /// Canonical column order.
    pub const ALL: [Feature; Feature::COUNT] = [
        Feature::Nh4,
        Feature::No3,
        Feature::No2,
        Feature::So4,
        Feature::Po4,
        Feature::Cl,
    ];

    /// Column name as it appears in artifact files and CSV headers.
    pub fn column(&self) -> &'static str {
        match self {
            Feature::Nh4 => "NH4",
            Feature::No3 => "NO3",
            Feature::No2 => "NO2",
            Feature::So4 => "SO4",
            Feature::Po4 => "PO4",
            Feature::Cl => "CL",
        }
    }

    /// Human facing label for form fields.
    pub fn label(&self) -> &'static str {
        match self {
            Feature::Nh4 => "NH4 (mg/L)",
            Feature::No3 => "NO3 (mg/L)",
            Feature::No2 => "NO2 (mg/L)",
            Feature::So4 => "SO4 (mg/L)",
            Feature::Po4 => "PO4 (mg/L)",
            Feature::Cl => "CL (mg/L)",
        }
    }

    /// Lowercase key used for form fields and command line flags.
    pub fn key(&self) -> &'static str {
        match self {
            Feature::Nh4 => "nh4",
            Feature::No3 => "no3",
            Feature::No2 => "no2",
            Feature::So4 => "so4",
            Feature::Po4 => "po4",
            Feature::Cl => "cl",
        }
    }

    pub fn bounds(&self) -> FieldBounds {
        FieldBounds::MEASUREMENT
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Inclusive range and default value of an input field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl FieldBounds {
    /// Every measurement is a concentration in mg/L within [0, 100].
    pub const MEASUREMENT: FieldBounds = FieldBounds {
        min: 0.0,
        max: 100.0,
        default: 1.0,
    };

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}
