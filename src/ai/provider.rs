use async_trait::async_trait;

use super::{error::InferenceError, inference::ZeroShotPrediction};

#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<ZeroShotPrediction, InferenceError>;
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError>;
}
