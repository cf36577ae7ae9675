use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::HuggingFaceConfig;

use super::{
    error::InferenceError,
    inference::{
        build_chat_request, build_zero_shot_request, parse_chat, parse_zero_shot,
        ZeroShotPrediction,
    },
    provider::{TextGenerator, ZeroShotClassifier},
    retry::with_retry,
};

const ERROR_BODY_PREVIEW: usize = 300;

#[derive(Clone)]
pub struct HuggingFaceClient {
    http: Client,
    config: HuggingFaceConfig,
}

impl HuggingFaceClient {
    pub fn new(http: Client, config: HuggingFaceConfig) -> Self {
        Self { http, config }
    }

    async fn post_json<T: Serialize + ?Sized + Sync>(
        &self,
        url: &str,
        payload: &T,
    ) -> Result<String, InferenceError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.api_token)
            .json(payload)
            .send()
            .await
            .map_err(InferenceError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(InferenceError::Transport)?;
        if !status.is_success() {
            return Err(InferenceError::Status {
                status,
                body: body.chars().take(ERROR_BODY_PREVIEW).collect(),
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl ZeroShotClassifier for HuggingFaceClient {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<ZeroShotPrediction, InferenceError> {
        let request = build_zero_shot_request(text, candidate_labels);
        let request = &request;
        with_retry("zero-shot", &self.config.retry, move |attempt| async move {
            let body = self.post_json(&self.config.zero_shot_url, request).await?;
            let prediction = parse_zero_shot(&body)?;
            for (label, score) in prediction.labels.iter().zip(&prediction.scores) {
                tracing::debug!(target: "inference", attempt, label = %label, score, "zero-shot score");
            }
            Ok(prediction)
        })
        .await
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceClient {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        let request = build_chat_request(self.config.generation_model.clone(), prompt);
        let request = &request;
        with_retry("chat", &self.config.retry, move |attempt| async move {
            let body = self.post_json(&self.config.chat_url, request).await?;
            let content = parse_chat(&body)?;
            tracing::debug!(target: "inference", attempt, chars = content.len(), "chat completion received");
            Ok(content)
        })
        .await
    }
}
