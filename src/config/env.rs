use std::{net::SocketAddr, time::Duration};

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub huggingface: HuggingFaceConfig,
    pub classifier: ClassifierConfig,
    pub reply: ReplyConfig,
    pub server: ServerConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    pub api_token: String,
    pub zero_shot_url: String,
    pub chat_url: String,
    pub generation_model: String,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub timeout: Duration,
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_attempts: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClassifierConfig {
    pub confidence_threshold: f64,
    pub confidence_margin: f64,
    pub deadline: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.75,
            confidence_margin: 0.15,
            deadline: Duration::from_secs(200),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyFallback {
    #[default]
    Static,
    Templates,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReplyConfig {
    pub fallback: ReplyFallback,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
