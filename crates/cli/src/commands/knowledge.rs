//! Knowledge command handler.
//!
//! Builds, ensures and inspects the knowledge snapshot.

use super::session;
use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use ragchat_core::config::AppConfig;
use ragchat_knowledge::store::snapshot;
use ragchat_knowledge::{build_from_document, ensure_store, KnowledgeStore};
use std::path::{Path, PathBuf};

/// Knowledge base management
#[derive(Args, Debug)]
pub struct KnowledgeCommand {
    #[command(subcommand)]
    pub action: KnowledgeAction,
}

#[derive(Subcommand, Debug)]
pub enum KnowledgeAction {
    /// Build the snapshot from the company document
    Build(KnowledgeBuildCommand),
    /// Create the snapshot if it does not exist yet
    Ensure(KnowledgeEnsureCommand),
    /// Show knowledge base statistics
    Stats(KnowledgeStatsCommand),
}

impl KnowledgeCommand {
    pub async fn execute(&self, config: &AppConfig) -> Result<()> {
        match &self.action {
            KnowledgeAction::Build(cmd) => cmd.execute(config).await,
            KnowledgeAction::Ensure(cmd) => cmd.execute(config).await,
            KnowledgeAction::Stats(cmd) => cmd.execute(config),
        }
    }
}

/// Build the snapshot from a document
#[derive(Args, Debug)]
pub struct KnowledgeBuildCommand {
    /// Source document (default: knowledge.document from config)
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Overwrite an existing snapshot
    #[arg(long)]
    pub force: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl KnowledgeBuildCommand {
    pub async fn execute(&self, config: &AppConfig) -> Result<()> {
        let snapshot_path = config.snapshot_path();
        let document = self
            .document
            .clone()
            .unwrap_or_else(|| config.document_path());

        tracing::info!("Executing knowledge build from {:?}", document);

        if snapshot_path.exists() && !self.force {
            bail!(
                "Knowledge snapshot already exists at {:?}. Use --force to rebuild it.",
                snapshot_path
            );
        }

        let embedder = session::embedder(config)?;
        let store = build_from_document(
            &document,
            session::company(config),
            &session::chunk_options(config),
            embedder.as_ref(),
        )
        .await?;

        snapshot::save(&store, &snapshot_path)?;

        print_summary("built", &store, &snapshot_path, self.json)
    }
}

/// Create the snapshot if missing
#[derive(Args, Debug)]
pub struct KnowledgeEnsureCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl KnowledgeEnsureCommand {
    pub async fn execute(&self, config: &AppConfig) -> Result<()> {
        let snapshot_path = config.snapshot_path();
        tracing::info!("Executing knowledge ensure for {:?}", snapshot_path);

        let embedder = session::embedder(config)?;
        let (store, outcome) = ensure_store(
            &snapshot_path,
            &config.document_path(),
            session::company(config),
            &session::chunk_options(config),
            embedder.as_ref(),
        )
        .await?;

        print_summary(outcome.as_str(), &store, &snapshot_path, self.json)
    }
}

/// Show knowledge base statistics
#[derive(Args, Debug)]
pub struct KnowledgeStatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl KnowledgeStatsCommand {
    pub fn execute(&self, config: &AppConfig) -> Result<()> {
        tracing::info!("Executing knowledge stats command");

        let store = session::load_store(config)?;
        let stats = store.stats();

        if self.json {
            let categories: serde_json::Map<String, serde_json::Value> = stats
                .categories
                .iter()
                .map(|(category, count)| (category.to_string(), serde_json::json!(count)))
                .collect();

            let output = serde_json::json!({
                "companyName": stats.company_name,
                "website": stats.website,
                "totalEntries": stats.total_entries,
                "dimension": stats.dimension,
                "categories": categories,
                "metadata": stats.metadata,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("Company:    {} ({})", stats.company_name, stats.website);
            println!("Entries:    {}", stats.total_entries);
            match stats.dimension {
                Some(dimension) => println!("Dimension:  {}", dimension),
                None => println!("Dimension:  (empty store)"),
            }
            println!("Categories:");
            for (category, count) in &stats.categories {
                println!("  {:<14} {}", category.as_str(), count);
            }
            if let Some(metadata) = &stats.metadata {
                println!("Source:     {}", metadata.source_document);
                println!("Created:    {}", metadata.created_at.to_rfc3339());
                if let Some(provider) = &metadata.embedding_provider {
                    println!(
                        "Embedder:   {} ({})",
                        provider,
                        metadata.embedding_model.as_deref().unwrap_or("unknown")
                    );
                }
            }
        }

        Ok(())
    }
}

fn print_summary(outcome: &str, store: &KnowledgeStore, path: &Path, json: bool) -> Result<()> {
    if json {
        let output = serde_json::json!({
            "outcome": outcome,
            "snapshot": path.display().to_string(),
            "totalEntries": store.len(),
            "dimension": store.dimension(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "Knowledge store {}: {} entries at {}",
            outcome,
            store.len(),
            path.display()
        );
    }
    Ok(())
}
