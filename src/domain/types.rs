use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Produtivo,
    Improdutivo,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Produtivo => "Produtivo",
            Category::Improdutivo => "Improdutivo",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationSource {
    Heuristic,
    RemoteModel,
    Fallback,
}

impl ClassificationSource {
    pub fn label(&self) -> &'static str {
        match self {
            ClassificationSource::Heuristic => "heuristic",
            ClassificationSource::RemoteModel => "remote-model",
            ClassificationSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordKind {
    Scam,
    Marketing,
    ProductiveSignal,
}

impl KeywordKind {
    pub fn bias(&self) -> Category {
        match self {
            KeywordKind::Scam | KeywordKind::Marketing => Category::Improdutivo,
            KeywordKind::ProductiveSignal => Category::Produtivo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeywordMatch {
    pub kind: KeywordKind,
    pub keyword: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub label: Category,
    pub score: f64,
    pub source: ClassificationSource,
    pub matched_keyword: Option<KeywordMatch>,
}

impl ClassificationResult {
    pub fn heuristic(label: Category, matched_keyword: Option<KeywordMatch>) -> Self {
        Self {
            label,
            score: 1.0,
            source: ClassificationSource::Heuristic,
            matched_keyword,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailOutcome {
    pub categoria: Category,
    pub resposta: String,
    #[serde(skip)]
    pub classification: ClassificationResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResult {
    pub original_content: String,
    pub classification: Category,
    pub response: String,
    pub processed_at: DateTime<Utc>,
}

impl SessionResult {
    pub const PREVIEW_LIMIT: usize = 1000;

    pub fn new(content: &str, outcome: &EmailOutcome) -> Self {
        Self {
            original_content: preview(content, Self::PREVIEW_LIMIT),
            classification: outcome.categoria,
            response: outcome.resposta.clone(),
            processed_at: Utc::now(),
        }
    }
}

/// Truncates to `limit` characters, marking the cut with `...`.
pub fn preview(content: &str, limit: usize) -> String {
    match content.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}...", &content[..byte_idx]),
        None => content.to_string(),
    }
}
