//! ragchat CLI
//!
//! Entry point for the company knowledge chatbot.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, KnowledgeCommand};
use ragchat_core::{config::AppConfig, logging, CliOverrides};
use std::path::PathBuf;

/// ragchat - answer questions about a company from its own documents
#[derive(Parser, Debug)]
#[command(name = "ragchat")]
#[command(about = "Retrieval-augmented chatbot over a company knowledge base", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "RAGCHAT_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "RAGCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace). Falls back to the config
    /// file, then RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Generation provider (ollama, gemini)
    #[arg(short, long, global = true, env = "RAGCHAT_PROVIDER")]
    provider: Option<String>,

    /// Generation model identifier
    #[arg(short, long, global = true, env = "RAGCHAT_MODEL")]
    model: Option<String>,

    /// Responder mode (templated, generative)
    #[arg(long, global = true, env = "RAGCHAT_RESPONDER")]
    responder: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Knowledge base management
    Knowledge(KnowledgeCommand),

    /// Ask a single question
    Ask(AskCommand),

    /// Interactive chat session
    Chat(ChatCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        workspace: cli.workspace,
        config_file: cli.config,
        log_level: cli.log_level,
        verbose: cli.verbose,
        no_color: cli.no_color,
        log_json: cli.log_json,
        provider: cli.provider,
        model: cli.model,
        responder: cli.responder,
    };

    let config = AppConfig::load_with(&overrides)?;
    config.validate()?;

    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_json)?;

    tracing::info!("ragchat starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Responder: {}", config.responder.as_str());
    tracing::debug!(
        "Embedding: {} ({}, {} dims)",
        config.embedding.provider,
        config.embedding.model,
        config.embedding.dimensions
    );

    config.ensure_ragchat_dir()?;

    let command_name = match &cli.command {
        Commands::Knowledge(_) => "knowledge",
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Knowledge(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {:#}", e),
    }

    result
}
