mod ai;
mod app;
mod classifier;
mod config;
mod domain;
mod infrastructure;
mod reply;
mod triage;
mod web;

use anyhow::Result;
use infrastructure::{directories, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let logs_dir = directories::ensure_logs_dir(&config.directories)?;
    logging::init_tracing(&config.logging, &logs_dir)?;

    let app = app::EmailTriageApp::initialize(config, logs_dir)?;
    app.run().await
}
