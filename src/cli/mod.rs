//! CLI module
//!
//! - `serve`: HTTP server (default)
//! - `ask`: answer one question on the terminal

pub mod ask;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::observability::init_tracing;

pub use ask::AskArgs;

/// Corrective RAG - knowledge base answers with graded web search fallback
#[derive(Parser)]
#[command(name = "corrective-rag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Answer a single question and print the visited nodes
    Ask(AskArgs),
}

/// Load `.env` and layered configuration, then install logging
fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.logging, &config.observability.tracing);

    Ok(config)
}
