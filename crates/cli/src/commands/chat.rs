//! Chat command handler.
//!
//! Reads questions from stdin until the user says goodbye. `:reload` swaps
//! in the snapshot currently on disk without restarting the session.

use super::ask::print_scores;
use super::session;
use anyhow::Result;
use clap::Args;
use ragchat_core::config::AppConfig;
use ragchat_knowledge::{ChatOptions, Chatbot};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const EXIT_WORDS: [&str; 3] = ["quit", "exit", "bye"];
const RELOAD_COMMAND: &str = ":reload";

/// Interactive chat session
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Hide similarity scores after each answer
    #[arg(long)]
    pub quiet: bool,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> Result<()> {
        tracing::info!("Executing chat command");

        let chatbot = session::open_chatbot(config, ChatOptions::from(&config.knowledge))?;
        let company = chatbot.store().current().company_name().to_string();

        println!("Chatting with the {} knowledge base.", company);
        println!(
            "Type '{}' to reread the snapshot, or '{}' to leave.",
            RELOAD_COMMAND,
            EXIT_WORDS.join("', '")
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            prompt()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let message = line.trim();

            if message.is_empty() {
                continue;
            }
            if EXIT_WORDS.contains(&message.to_lowercase().as_str()) {
                break;
            }
            if message == RELOAD_COMMAND {
                reload(config, &chatbot);
                continue;
            }

            match chatbot.chat(message).await {
                Ok(reply) => {
                    println!("\n{}\n", reply.response);
                    if !self.quiet {
                        print_scores(&reply);
                    }
                }
                Err(e) => {
                    tracing::warn!("Chat turn failed: {}", e);
                    eprintln!("Error: {}", e);
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

fn reload(config: &AppConfig, chatbot: &Chatbot) {
    let result = session::load_store(config).and_then(|store| {
        let entries = store.len();
        chatbot.reload(store)?;
        Ok(entries)
    });

    match result {
        Ok(entries) => {
            tracing::info!("Reloaded knowledge store with {} entries", entries);
            println!("Reloaded {} entries.", entries);
        }
        Err(e) => {
            tracing::warn!("Reload failed, keeping current store: {:#}", e);
            eprintln!("Reload failed: {:#}", e);
        }
    }
}
