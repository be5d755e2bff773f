pub mod actions;
pub mod app;
pub mod chat_client;
pub mod cli;
pub mod managers;
pub mod markup;
pub mod settings;
pub mod ui_page;
pub mod ui_server;

use anyhow::Result;
use app::ChatApp;
use chat_client::ChatClient;
use clap::Parser;
use cli::Args;
use log::{info, warn};
use std::sync::Arc;

/// Load `.env`, set up logging, then serve the chat page until it fails.
pub async fn run() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let client = ChatClient::new(&args.server_url)?;
    info!("Using chat backend at {}", client.base_url());

    let probe = client.clone();
    tokio::spawn(async move {
        match probe.health().await {
            Ok(status) if status.is_success() => info!("Chat backend is reachable"),
            Ok(status) => warn!("Chat backend health check returned {}", status),
            Err(e) => warn!("Chat backend is not reachable yet: {:#}", e),
        }
    });

    let app = Arc::new(ChatApp::new(client));
    ui_server::serve(app, args.ui_bind).await
}
