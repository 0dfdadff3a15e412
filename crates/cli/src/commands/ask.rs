//! Ask command handler.
//!
//! Answers one question from the knowledge snapshot.

use super::session;
use anyhow::{bail, Result};
use clap::Args;
use ragchat_core::config::AppConfig;
use ragchat_knowledge::{ChatOptions, ChatResponse};

/// Ask a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Maximum number of entries to retrieve
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Minimum similarity for a retrieved entry
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> Result<()> {
        tracing::info!("Executing ask command");

        let options = self.chat_options(config)?;
        let chatbot = session::open_chatbot(config, options)?;
        let reply = chatbot.chat(&self.question).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&reply)?);
        } else {
            println!("{}", reply.response);
            print_scores(&reply);
        }

        Ok(())
    }

    fn chat_options(&self, config: &AppConfig) -> Result<ChatOptions> {
        let mut options = ChatOptions::from(&config.knowledge);

        if let Some(top_k) = self.top_k {
            options.retrieval.top_k = top_k;
        }
        if let Some(threshold) = self.threshold {
            if !(-1.0..=1.0).contains(&threshold) {
                bail!("--threshold must be between -1.0 and 1.0, got {}", threshold);
            }
            options.retrieval.threshold = threshold;
        }

        Ok(options)
    }
}

/// Print the similarity of each context entry to stderr.
pub(crate) fn print_scores(reply: &ChatResponse) {
    if reply.similarity_scores.is_empty() {
        return;
    }

    let scores: Vec<String> = reply
        .similarity_scores
        .iter()
        .map(|s| format!("{:.3}", s))
        .collect();
    eprintln!(
        "\n[{} context entries, similarity: {}]",
        reply.context_used.len(),
        scores.join(", ")
    );
}
