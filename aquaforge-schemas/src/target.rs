use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three pollutant levels produced by the model, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    DissolvedOxygen,
    Bsk5,
    SuspendedSolids,
}

impl Target {
    pub const COUNT: usize = 3;

    pub const ALL: [Target; Target::COUNT] = [
        Target::DissolvedOxygen,
        Target::Bsk5,
        Target::SuspendedSolids,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Target::DissolvedOxygen => "O₂ (mg/L)",
            Target::Bsk5 => "BSK5 (mg/L)",
            Target::SuspendedSolids => "Suspended Solids (mg/L)",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Model output for one measurement record, positionally matching `Target::ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub values: [f64; Target::COUNT],
}

impl PredictionResult {
    pub fn new(values: [f64; Target::COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, target: Target) -> f64 {
        match target {
            Target::DissolvedOxygen => self.values[0],
            Target::Bsk5 => self.values[1],
            Target::SuspendedSolids => self.values[2],
        }
    }

    /// Labeled values in output order.
    pub fn iter(&self) -> impl Iterator<Item = (Target, f64)> + '_ {
        Target::ALL.into_iter().zip(self.values.iter().copied())
    }
}
