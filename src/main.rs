//! Wordrush - capacity-gated timed word-guessing game server.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wordrush::{
    AppState, DisabledSink, ServerConfig, SessionRegistry, SessionStore, Vocabulary, WebhookSink,
    WinnerSink, router,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port, config } => run_server(host, port, config).await,
        Command::Vocab => {
            print_vocab();
            Ok(())
        }
    }
}

/// Run the HTTP game server
async fn run_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<std::path::PathBuf>,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = match &config_path {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    config = config.apply_env();
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }

    let sink: Arc<dyn WinnerSink> = match config.winner_sink_url() {
        Some(url) => Arc::new(WebhookSink::new(url.clone())),
        None => {
            info!("No winner sink configured; submissions will be reported as unavailable");
            Arc::new(DisabledSink)
        }
    };

    let state = AppState::new(
        SessionRegistry::new(),
        SessionStore::new(),
        Vocabulary::standard(),
        sink,
    );
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(host = %config.host(), port = config.port(), "Server ready");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Print the active vocabulary with word lengths
fn print_vocab() {
    let vocab = Vocabulary::standard();
    for word in vocab.words() {
        println!("{} ({} letters)", word, word.chars().count());
    }
}
