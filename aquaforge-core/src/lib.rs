pub mod artifacts;
pub mod batch;
pub mod error;
pub mod model;
pub mod predictor;
pub mod scaler;
