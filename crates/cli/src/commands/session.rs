//! Wiring shared by the commands: embedder, store, responder, chatbot.

use anyhow::{Context, Result};
use ragchat_core::config::{AppConfig, ResponderMode};
use ragchat_knowledge::rag::generative::GenerationSettings;
use ragchat_knowledge::store::snapshot;
use ragchat_knowledge::{
    create_provider, ChatOptions, Chatbot, ChunkOptions, Company, EmbeddingProvider,
    GenerativeResponder, KnowledgeStore, Responder, StoreHandle, TemplatedResponder,
};
use ragchat_llm::create_client;
use ragchat_prompt::load_answer_prompt;
use std::sync::Arc;
use std::time::Duration;

pub fn company(config: &AppConfig) -> Company<'_> {
    Company {
        name: &config.company.name,
        website: &config.company.website,
    }
}

pub fn chunk_options(config: &AppConfig) -> ChunkOptions {
    ChunkOptions {
        max_chars: config.knowledge.chunk_size,
        min_chars: config.knowledge.min_chunk_chars,
    }
}

pub fn embedder(config: &AppConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    create_provider(&config.embedding).context("Failed to create embedding provider")
}

pub fn load_store(config: &AppConfig) -> Result<KnowledgeStore> {
    let path = config.snapshot_path();
    snapshot::load(&path).with_context(|| format!("Failed to load knowledge store {:?}", path))
}

/// Build the responder selected by configuration.
pub fn responder(config: &AppConfig, company: &str) -> Result<Arc<dyn Responder>> {
    match config.responder {
        ResponderMode::Templated => Ok(Arc::new(TemplatedResponder::new(company))),
        ResponderMode::Generative => {
            let generation = &config.generation;
            let api_key = config.resolve_api_key();
            let client = create_client(
                &generation.provider,
                generation.endpoint.as_deref(),
                api_key.as_deref(),
                Duration::from_secs(generation.timeout_secs),
            )
            .context("Failed to create generation client")?;

            let prompt = load_answer_prompt(&config.workspace)
                .context("Failed to load answer prompt")?;

            tracing::info!(
                "Using generative responder: {} ({})",
                generation.provider,
                generation.model
            );

            let responder =
                GenerativeResponder::new(client, company, GenerationSettings::from(generation))
                    .with_prompt(prompt);
            Ok(Arc::new(responder))
        }
    }
}

/// Load the snapshot and assemble a chatbot around it.
pub fn open_chatbot(config: &AppConfig, options: ChatOptions) -> Result<Chatbot> {
    let store = load_store(config)?;
    let responder = responder(config, store.company_name())?;
    let embedder = embedder(config)?;

    let chatbot = Chatbot::new(StoreHandle::new(store), embedder, responder, options)
        .context("Knowledge store does not match the configured embedder; rebuild it with 'ragchat knowledge build --force'")?;
    Ok(chatbot)
}
