use serde::{Deserialize, Serialize};

use super::error::InferenceError;

pub fn build_zero_shot_request<'a>(text: &'a str, labels: &'a [&'a str]) -> ZeroShotRequest<'a> {
    ZeroShotRequest {
        inputs: text,
        parameters: ZeroShotParameters {
            candidate_labels: labels,
            multi_label: false,
        },
        options: InferenceOptions {
            wait_for_model: true,
        },
    }
}

pub fn parse_zero_shot(body: &str) -> Result<ZeroShotPrediction, InferenceError> {
    let response: ZeroShotResponse = serde_json::from_str(body)
        .map_err(|err| InferenceError::Malformed(format!("zero-shot body: {err}")))?;

    let prediction = match response {
        ZeroShotResponse::Columns { labels, scores } => {
            if labels.len() != scores.len() {
                return Err(InferenceError::Malformed(format!(
                    "{} labels but {} scores",
                    labels.len(),
                    scores.len()
                )));
            }
            ZeroShotPrediction { labels, scores }
        }
        ZeroShotResponse::Pairs(pairs) => {
            let (labels, scores) = pairs.into_iter().map(|p| (p.label, p.score)).unzip();
            ZeroShotPrediction { labels, scores }
        }
    };

    if prediction.labels.is_empty() {
        return Err(InferenceError::Malformed("no labels returned".into()));
    }
    if let Some(bad) = prediction
        .scores
        .iter()
        .find(|score| !score.is_finite() || !(0.0..=1.0).contains(*score))
    {
        return Err(InferenceError::Malformed(format!("score {bad} outside [0, 1]")));
    }
    Ok(prediction)
}

pub fn build_chat_request(model: String, prompt: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model,
        messages: vec![ChatMessage {
            role: "user".into(),
            content: prompt.to_string(),
        }],
        temperature: 0.3,
        top_p: 0.9,
        max_tokens: 512,
    }
}

pub fn parse_chat(body: &str) -> Result<String, InferenceError> {
    let completion: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|err| InferenceError::Malformed(format!("chat body: {err}")))?;
    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| InferenceError::Malformed("response did not contain any choices".into()))?;

    choice
        .message
        .and_then(|msg| msg.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| InferenceError::Malformed("response missing message content".into()))
}

#[derive(Debug, Clone, Serialize)]
pub struct ZeroShotRequest<'a> {
    pub inputs: &'a str,
    pub parameters: ZeroShotParameters<'a>,
    pub options: InferenceOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZeroShotParameters<'a> {
    pub candidate_labels: &'a [&'a str],
    pub multi_label: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InferenceOptions {
    pub wait_for_model: bool,
}

/// The inference API has answered in both layouts over time.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    Columns { labels: Vec<String>, scores: Vec<f64> },
    Pairs(Vec<LabelScore>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZeroShotPrediction {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl ZeroShotPrediction {
    pub fn ranked(&self) -> Vec<LabelScore> {
        let mut pairs: Vec<LabelScore> = self
            .labels
            .iter()
            .zip(&self.scores)
            .map(|(label, score)| LabelScore {
                label: label.clone(),
                score: *score,
            })
            .collect();
        pairs.sort_by(|a, b| b.score.total_cmp(&a.score));
        pairs
    }
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: i32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ChatCompletionMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionMessage {
    pub content: Option<String>,
}
