use std::{env, net::SocketAddr, str::FromStr, time::Duration};

use url::Url;

use super::env::{
    AppConfig, ClassifierConfig, ConfigError, DirectoryConfig, HuggingFaceConfig, LoggingConfig,
    ReplyConfig, ReplyFallback, RetryConfig, ServerConfig,
};

const DEFAULT_ZERO_SHOT_URL: &str =
    "https://router.huggingface.co/hf-inference/models/facebook/bart-large-mnli";
const DEFAULT_CHAT_URL: &str = "https://router.huggingface.co/v1/chat/completions";
const DEFAULT_GENERATION_MODEL: &str = "HuggingFaceTB/SmolLM3-3B";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_token = get("HF_API_TOKEN")
            .or_else(|| get("HF_TOKEN"))
            .ok_or(ConfigError::Missing("HF_API_TOKEN"))?;

        let retry_defaults = RetryConfig::default();
        let retry = RetryConfig {
            timeout: get("HF_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(retry_defaults.timeout),
            max_attempts: get("HF_MAX_ATTEMPTS")
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|attempts| *attempts > 0)
                .unwrap_or(retry_defaults.max_attempts),
            backoff: get("HF_RETRY_BACKOFF_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(retry_defaults.backoff),
        };

        let huggingface = HuggingFaceConfig {
            api_token,
            zero_shot_url: parse_url(
                "HF_ZERO_SHOT_URL",
                get("HF_ZERO_SHOT_URL").as_deref().unwrap_or(DEFAULT_ZERO_SHOT_URL),
            )?,
            chat_url: parse_url(
                "HF_CHAT_URL",
                get("HF_CHAT_URL").as_deref().unwrap_or(DEFAULT_CHAT_URL),
            )?,
            generation_model: get("HF_GENERATION_MODEL")
                .unwrap_or_else(|| DEFAULT_GENERATION_MODEL.to_string()),
            retry,
        };

        let classifier_defaults = ClassifierConfig::default();
        let classifier = ClassifierConfig {
            confidence_threshold: parse_unit_interval(
                "CONFIDENCE_THRESHOLD",
                get("CONFIDENCE_THRESHOLD"),
                classifier_defaults.confidence_threshold,
            )?,
            confidence_margin: parse_unit_interval(
                "CONFIDENCE_MARGIN",
                get("CONFIDENCE_MARGIN"),
                classifier_defaults.confidence_margin,
            )?,
            deadline: get("CLASSIFY_DEADLINE_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(classifier_defaults.deadline),
        };

        let reply = ReplyConfig {
            fallback: match get("REPLY_FALLBACK") {
                None => ReplyFallback::default(),
                Some(value) => ReplyFallback::from_str(&value)?,
            },
        };

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = get("PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(5000);
        let listen_addr = format!("{bind_addr}:{port}")
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::Invalid {
                key: "BIND_ADDR",
                reason: err.to_string(),
            })?;

        let server = ServerConfig {
            listen_addr,
            max_upload_bytes: get("MAX_UPLOAD_BYTES")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        };

        let directories = DirectoryConfig {
            logs_dir: get("LOGS_DIR").unwrap_or_else(|| "logs".to_string()),
        };

        let logging = LoggingConfig {
            level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        Ok(Self {
            huggingface,
            classifier,
            reply,
            server,
            directories,
            logging,
        })
    }
}

impl FromStr for ReplyFallback {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "templates" => Ok(Self::Templates),
            other => Err(ConfigError::Invalid {
                key: "REPLY_FALLBACK",
                reason: format!("expected `static` or `templates`, got `{other}`"),
            }),
        }
    }
}

fn parse_url(key: &'static str, raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw).map_err(|err| ConfigError::Invalid {
        key,
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("unsupported scheme `{}`", url.scheme()),
        });
    }
    Ok(url.to_string())
}

fn parse_unit_interval(
    key: &'static str,
    raw: Option<String>,
    default: f64,
) -> Result<f64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value = raw.trim().parse::<f64>().map_err(|err| ConfigError::Invalid {
        key,
        reason: err.to_string(),
    })?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("{value} is outside [0, 1]"),
        });
    }
    Ok(value)
}
