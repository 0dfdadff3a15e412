//! Test doubles shared by unit and scenario tests.

use crate::embeddings::EmbeddingProvider;
use crate::types::{KnowledgeEntry, ScoredMatch};
use async_trait::async_trait;
use ragchat_core::{AppError, AppResult};
use ragchat_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Returns the same vector for every text.
#[derive(Debug)]
pub struct FixedEmbedder {
    dimensions: usize,
    vector: Vec<f32>,
}

impl FixedEmbedder {
    /// `dimensions` is what the embedder reports, independent of `vector`.
    pub fn new(dimensions: usize, vector: Vec<f32>) -> Self {
        Self { dimensions, vector }
    }
}

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    fn provider_name(&self) -> &str {
        "fixed"
    }

    fn model_name(&self) -> &str {
        "fixed-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| self.vector.clone()).collect())
    }
}

/// Always fails with an embedding error.
#[derive(Debug, Default)]
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    fn provider_name(&self) -> &str {
        "failing"
    }

    fn model_name(&self) -> &str {
        "none"
    }

    fn dimensions(&self) -> usize {
        4
    }

    async fn embed_batch(&self, _texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Err(AppError::Embedding("embedding service unavailable".to_string()))
    }
}

/// One dimension per keyword: 1.0 when the lowercased text contains it.
#[derive(Debug)]
pub struct KeywordEmbedder {
    keywords: Vec<&'static str>,
    calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn new(keywords: &[&'static str]) -> Self {
        Self {
            keywords: keywords.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `embed_batch` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn provider_name(&self) -> &str {
        "keyword"
    }

    fn model_name(&self) -> &str {
        "keyword-v1"
    }

    fn dimensions(&self) -> usize {
        self.keywords.len()
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                self.keywords
                    .iter()
                    .map(|k| if lower.contains(k) { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect())
    }
}

enum Script {
    Reply(String),
    Fail(String),
    Slow(Duration),
}

/// LLM client with a predetermined outcome that records its last request.
pub struct ScriptedClient {
    script: Script,
    last_request: Mutex<Option<LlmRequest>>,
}

impl ScriptedClient {
    fn with_script(script: Script) -> Self {
        Self {
            script,
            last_request: Mutex::new(None),
        }
    }

    pub fn reply(text: &str) -> Self {
        Self::with_script(Script::Reply(text.to_string()))
    }

    pub fn fail(message: &str) -> Self {
        Self::with_script(Script::Fail(message.to_string()))
    }

    pub fn slow(delay: Duration) -> Self {
        Self::with_script(Script::Slow(delay))
    }

    pub fn last_request(&self) -> Option<LlmRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        *self.last_request.lock().unwrap() = Some(request.clone());

        let content = match &self.script {
            Script::Reply(text) => text.clone(),
            Script::Fail(message) => return Err(AppError::Generation(message.clone())),
            Script::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                "too late".to_string()
            }
        };

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }
}

/// Wrap entries as matches with descending similarities.
pub fn scored(entries: &[KnowledgeEntry]) -> Vec<ScoredMatch<'_>> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| ScoredMatch {
            entry,
            similarity: 0.9 - i as f32 * 0.1,
        })
        .collect()
}
