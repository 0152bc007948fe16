use crate::feature::{Feature, FieldBounds};
use serde::{Deserialize, Serialize};

/// A single water sample as entered by the operator.
///
/// Fields are bound by name here and turned into a positional row only by
/// [`MeasurementRecord::to_row`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    #[serde(rename = "NH4")]
    pub nh4: f64,
    #[serde(rename = "NO3")]
    pub no3: f64,
    #[serde(rename = "NO2")]
    pub no2: f64,
    #[serde(rename = "SO4")]
    pub so4: f64,
    #[serde(rename = "PO4")]
    pub po4: f64,
    #[serde(rename = "CL")]
    pub cl: f64,
}

impl MeasurementRecord {
    /// Builds a record where every field holds `value`.
    pub fn uniform(value: f64) -> Self {
        Self {
            nh4: value,
            no3: value,
            no2: value,
            so4: value,
            po4: value,
            cl: value,
        }
    }

    /// Builds a record from a row already in `Feature::ALL` order.
    pub fn from_row(row: [f64; Feature::COUNT]) -> Self {
        let [nh4, no3, no2, so4, po4, cl] = row;
        Self {
            nh4,
            no3,
            no2,
            so4,
            po4,
            cl,
        }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Nh4 => self.nh4,
            Feature::No3 => self.no3,
            Feature::No2 => self.no2,
            Feature::So4 => self.so4,
            Feature::Po4 => self.po4,
            Feature::Cl => self.cl,
        }
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        match feature {
            Feature::Nh4 => self.nh4 = value,
            Feature::No3 => self.no3 = value,
            Feature::No2 => self.no2 = value,
            Feature::So4 => self.so4 = value,
            Feature::Po4 => self.po4 = value,
            Feature::Cl => self.cl = value,
        }
    }

    /// The single-row table handed to the scaler, in fitted column order.
    pub fn to_row(&self) -> [f64; Feature::COUNT] {
        Feature::ALL.map(|feature| self.get(feature))
    }

    /// First feature whose value falls outside its field bounds.
    pub fn out_of_bounds(&self) -> Option<(Feature, f64)> {
        Feature::ALL
            .into_iter()
            .map(|feature| (feature, self.get(feature)))
            .find(|(feature, value)| !feature.bounds().contains(*value))
    }
}

impl Default for MeasurementRecord {
    fn default() -> Self {
        Self::uniform(FieldBounds::MEASUREMENT.default)
    }
}
