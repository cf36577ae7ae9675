mod client;
pub mod error;
pub mod inference;
pub mod provider;
mod retry;

pub use client::HuggingFaceClient;
pub use error::InferenceError;
pub use inference::ZeroShotPrediction;
pub use provider::{TextGenerator, ZeroShotClassifier};
