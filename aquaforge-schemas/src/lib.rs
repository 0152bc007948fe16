pub mod feature;
pub mod file_formats;
pub mod measurement;
pub mod model;
pub mod scaler;
pub mod target;
