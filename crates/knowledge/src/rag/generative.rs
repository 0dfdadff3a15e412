//! LLM-backed answers grounded in retrieved entries.

use super::responder::{no_information_message, Responder};
use crate::types::ScoredMatch;
use async_trait::async_trait;
use ragchat_core::config::GenerationConfig;
use ragchat_core::AppResult;
use ragchat_llm::{complete_with_timeout, LlmClient, LlmRequest};
use ragchat_prompt::{build_prompt, default_answer_prompt, PromptDefinition};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const EMPTY_GENERATION: &str =
    "I apologize, but I couldn't generate a proper response. Please try rephrasing your question.";

/// Generation parameters for one responder.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl From<&GenerationConfig> for GenerationSettings {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::from(&GenerationConfig::default())
    }
}

/// Forwards retrieved context and the question to an LLM.
///
/// Generation failures, timeouts and template errors are logged and turned
/// into a fallback answer; nothing is retried.
pub struct GenerativeResponder {
    client: Arc<dyn LlmClient>,
    prompt: PromptDefinition,
    company: String,
    settings: GenerationSettings,
}

impl GenerativeResponder {
    pub fn new(
        client: Arc<dyn LlmClient>,
        company: impl Into<String>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            client,
            prompt: default_answer_prompt(),
            company: company.into(),
            settings,
        }
    }

    /// Use a custom answer prompt instead of the built-in one.
    pub fn with_prompt(mut self, prompt: PromptDefinition) -> Self {
        self.prompt = prompt;
        self
    }

    async fn generate(&self, query: &str, matches: &[ScoredMatch<'_>]) -> AppResult<String> {
        let context = matches
            .iter()
            .map(|m| m.entry.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut variables = HashMap::new();
        variables.insert("company".to_string(), self.company.clone());
        variables.insert("context".to_string(), context);
        variables.insert("query".to_string(), query.to_string());

        let built = build_prompt(&self.prompt, variables)?;

        let mut request = LlmRequest::new(built.user, &self.settings.model)
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens);
        if let Some(system) = built.system {
            request = request.with_system(system);
        }

        tracing::debug!(
            "Generating answer with {} ({}) from {} matches",
            self.client.provider_name(),
            self.settings.model,
            matches.len()
        );

        let response =
            complete_with_timeout(self.client.as_ref(), &request, self.settings.timeout).await?;
        Ok(response.content)
    }
}

#[async_trait]
impl Responder for GenerativeResponder {
    fn name(&self) -> &str {
        "generative"
    }

    async fn respond(&self, query: &str, matches: &[ScoredMatch<'_>]) -> String {
        if matches.is_empty() {
            return no_information_message(&self.company);
        }

        match self.generate(query, matches).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!("{} returned an empty answer", self.client.provider_name());
                EMPTY_GENERATION.to_string()
            }
            Err(e) => {
                tracing::warn!("Answer generation failed: {}", e);
                format!(
                    "I apologize, but I encountered an error while generating a response: {}. \
                     Please try rephrasing your question.",
                    e
                )
            }
        }
    }
}
