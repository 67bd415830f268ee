//! diarist - a reflective journaling companion for the terminal.
//!
//! Every line you type is forwarded to a hosted assistant persona and its
//! reply printed back. Typing `exit` turns the whole conversation into a
//! dated Markdown diary entry on disk.

mod api;
mod chat;
mod companion;
mod config;
mod diary;

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use api::AssistantsClient;
use companion::DiaryCompanion;
use config::Config;

#[derive(Parser)]
#[command(name = "diarist")]
#[command(author, version, about = "A reflective journaling companion for the terminal")]
#[command(
    long_about = "Chat about your day, one line at a time. Type 'exit' to finish: the\nconversation is summarized and saved as a dated Markdown diary entry."
)]
struct Cli {}

#[tokio::main]
async fn main() -> Result<()> {
    Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("diarist=info".parse().unwrap())
                .add_directive("reqwest=warn".parse().unwrap()),
        )
        .init();

    let config = Config::load().context("Failed to load configuration")?;
    let api_key = config.api_key()?;

    let client = AssistantsClient::new(
        config.api.base_url.clone(),
        api_key,
        config.poll_interval(),
    );
    let mut companion = DiaryCompanion::new(
        client,
        config.api.model.clone(),
        config.assistant.name.clone(),
        config.assistant.instructions.clone(),
    );

    // A failed startup leaves the session unusable but the loop still runs;
    // each turn reports the initialization error instead.
    if let Err(err) = companion.initialize().await {
        error!("Error initializing assistant session: {err}");
    }

    println!("Starting a conversation with your journal companion. Type 'exit' to finish.");

    let stdin = io::stdin();
    let stdout = io::stdout();
    chat::run(&companion, stdin.lock(), stdout.lock(), &config.diary.dir)
        .await
        .context("Conversation loop failed")?;

    Ok(())
}
