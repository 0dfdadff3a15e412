//! Query handling: embed, retrieve, respond.

use super::responder::Responder;
use crate::embeddings::EmbeddingProvider;
use crate::retriever::retrieve;
use crate::store::{KnowledgeStore, StoreHandle};
use crate::types::{ChatResponse, RetrievalOptions};
use ragchat_core::config::KnowledgeConfig;
use ragchat_core::{AppError, AppResult};
use std::sync::Arc;

/// Retrieval and presentation settings for a [`Chatbot`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatOptions {
    pub retrieval: RetrievalOptions,

    /// Maximum characters of each context preview
    pub preview_chars: usize,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            retrieval: RetrievalOptions::default(),
            preview_chars: 200,
        }
    }
}

impl From<&KnowledgeConfig> for ChatOptions {
    fn from(config: &KnowledgeConfig) -> Self {
        Self {
            retrieval: RetrievalOptions {
                top_k: config.top_k,
                threshold: config.similarity_threshold,
            },
            preview_chars: config.preview_chars,
        }
    }
}

/// Answers questions against the current knowledge store.
pub struct Chatbot {
    store: StoreHandle,
    embedder: Arc<dyn EmbeddingProvider>,
    responder: Arc<dyn Responder>,
    options: ChatOptions,
}

impl Chatbot {
    /// Assemble a chatbot. Fails if the store's embedding dimension differs
    /// from the embedder's.
    pub fn new(
        store: StoreHandle,
        embedder: Arc<dyn EmbeddingProvider>,
        responder: Arc<dyn Responder>,
        options: ChatOptions,
    ) -> AppResult<Self> {
        if let Some(dimension) = store.current().dimension() {
            check_dimension(dimension, embedder.dimensions())?;
        }

        tracing::debug!(
            "Chatbot ready: embedder={} ({}), responder={}, top_k={}, threshold={}",
            embedder.provider_name(),
            embedder.model_name(),
            responder.name(),
            options.retrieval.top_k,
            options.retrieval.threshold
        );

        Ok(Self {
            store,
            embedder,
            responder,
            options,
        })
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn options(&self) -> &ChatOptions {
        &self.options
    }

    /// Swap in a new store, returning the previous one. The new store must
    /// match the embedder's dimension; on error the current store is kept.
    pub fn reload(&self, store: KnowledgeStore) -> AppResult<Arc<KnowledgeStore>> {
        if let Some(dimension) = store.dimension() {
            check_dimension(dimension, self.embedder.dimensions())?;
        }
        Ok(self.store.replace(store))
    }

    /// Answer one message.
    ///
    /// An empty store answers without calling the embedder. Embedding
    /// failures propagate; generation failures are absorbed by the responder.
    pub async fn chat(&self, message: &str) -> AppResult<ChatResponse> {
        let store = self.store.current();

        if store.is_empty() {
            tracing::info!("Knowledge store is empty, answering without retrieval");
            return Ok(ChatResponse {
                response: self.responder.respond(message, &[]).await,
                context_used: Vec::new(),
                similarity_scores: Vec::new(),
            });
        }

        let query = self.embedder.embed(message).await?;
        if let Some(dimension) = store.dimension() {
            check_dimension(dimension, query.len())?;
        }

        let matches = retrieve(
            &query,
            &store,
            self.options.retrieval.top_k,
            self.options.retrieval.threshold,
        );

        tracing::info!(
            "Answering with {} matches via {} responder",
            matches.len(),
            self.responder.name()
        );

        let response = self.responder.respond(message, &matches).await;

        Ok(ChatResponse {
            response,
            context_used: matches
                .iter()
                .map(|m| preview(&m.entry.content, self.options.preview_chars))
                .collect(),
            similarity_scores: matches.iter().map(|m| m.similarity).collect(),
        })
    }
}

fn check_dimension(store_dimension: usize, embedder_dimension: usize) -> AppResult<()> {
    if store_dimension != embedder_dimension {
        return Err(AppError::Embedding(format!(
            "Embedding dimension {} does not match knowledge store dimension {}",
            embedder_dimension, store_dimension
        )));
    }
    Ok(())
}

/// Truncate to `max_chars` characters, appending "..." only when cut.
pub fn preview(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}
