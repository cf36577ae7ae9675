use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::net::TcpListener;

use crate::{
    ai::HuggingFaceClient,
    classifier::EmailClassifier,
    config::AppConfig,
    infrastructure::signal::shutdown_signal,
    reply::ResponseSelector,
    triage::EmailTriage,
    web::{self, WebState},
};

pub struct EmailTriageApp {
    logs_dir: PathBuf,
    config: Arc<AppConfig>,
    triage: Arc<EmailTriage>,
}

impl EmailTriageApp {
    pub fn initialize(config: AppConfig, logs_dir: PathBuf) -> Result<Self> {
        let config = Arc::new(config);

        let http_client = Client::builder()
            .user_agent(format!("email-triage-rs/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let huggingface = Arc::new(HuggingFaceClient::new(
            http_client,
            config.huggingface.clone(),
        ));

        let classifier = EmailClassifier::new(huggingface.clone(), &config.classifier);
        let selector = ResponseSelector::new(
            huggingface,
            config.reply.fallback,
            config.classifier.deadline,
        );

        Ok(Self {
            logs_dir,
            config,
            triage: Arc::new(EmailTriage::new(classifier, selector)),
        })
    }

    pub async fn run(self) -> Result<()> {
        let addr = self.config.server.listen_addr;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;

        tracing::info!(
            target: "http",
            %addr,
            model = %self.config.huggingface.generation_model,
            threshold = self.config.classifier.confidence_threshold,
            logs = %self.logs_dir.display(),
            "email triage service listening"
        );

        let state = WebState {
            triage: self.triage,
            max_upload_bytes: self.config.server.max_upload_bytes,
        };
        axum::serve(listener, web::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!(target: "http", "server stopped");
        Ok(())
    }
}
