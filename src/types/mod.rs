//! Public types for the Eir API.

mod prediction;

pub use prediction::{PredictionResult, TopPrediction};
