pub mod env;
mod loader;

pub use env::{
    AppConfig, ClassifierConfig, DirectoryConfig, HuggingFaceConfig, LoggingConfig, ReplyFallback,
    RetryConfig,
};
pub use loader::load_config;
