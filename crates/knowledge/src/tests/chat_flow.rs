//! End-to-end chat scenarios over small in-memory stores.

use super::support::{FailingEmbedder, KeywordEmbedder, ScriptedClient};
use crate::rag::generative::GenerationSettings;
use crate::rag::{no_information_message, ChatOptions, Chatbot, GenerativeResponder, TemplatedResponder};
use crate::store::{KnowledgeStore, StoreHandle};
use crate::types::{Category, ChunkOptions, KnowledgeEntry};
use ragchat_core::AppError;
use std::sync::Arc;

const COMPANY: &str = "MachDatum";
const WEBSITE: &str = "https://www.machdatum.com/";
const KEYWORDS: [&str; 5] = ["contact", "service", "team", "technology", "machdatum"];

const PARAGRAPHS: [&str; 3] = [
    "MachDatum offers data engineering services and analytics solutions.",
    "Contact MachDatum at hello@machdatum.com for project enquiries.",
    "Our team brings together seasoned data engineers.",
];

async fn company_store(embedder: &KeywordEmbedder) -> KnowledgeStore {
    // Every paragraph is longer than max_chars, so each becomes one entry
    let options = ChunkOptions {
        max_chars: 40,
        min_chars: 20,
    };
    KnowledgeStore::build(COMPANY, WEBSITE, &PARAGRAPHS, &options, embedder)
        .await
        .unwrap()
}

async fn templated_chatbot() -> (Chatbot, Arc<KeywordEmbedder>) {
    let embedder = Arc::new(KeywordEmbedder::new(&KEYWORDS));
    let store = company_store(&embedder).await;
    let chatbot = Chatbot::new(
        StoreHandle::new(store),
        embedder.clone(),
        Arc::new(TemplatedResponder::new(COMPANY)),
        ChatOptions::default(),
    )
    .unwrap();
    (chatbot, embedder)
}

#[tokio::test]
async fn test_contact_question_gets_contact_answer() {
    let (chatbot, _) = templated_chatbot().await;

    let reply = chatbot.chat("How can I contact MachDatum?").await.unwrap();

    assert!(reply.response.starts_with("## Contact Information"));
    assert!(reply.response.contains(
        "📧 **Email:** Contact MachDatum at hello@machdatum.com for project enquiries."
    ));
    assert_eq!(reply.context_used[0], PARAGRAPHS[1]);
    assert_eq!(reply.context_used.len(), reply.similarity_scores.len());
    assert!((reply.similarity_scores[0] - 1.0).abs() < 1e-6);
    assert!((reply.similarity_scores[1] - 0.5).abs() < 1e-6);
}

#[tokio::test]
async fn test_built_store_categories() {
    let embedder = KeywordEmbedder::new(&KEYWORDS);
    let store = company_store(&embedder).await;

    let categories: Vec<Category> = store.entries().iter().map(|e| e.category).collect();
    assert_eq!(
        categories,
        vec![Category::Services, Category::Contact, Category::Technology]
    );
}

#[tokio::test]
async fn test_nothing_relevant_gives_no_information() {
    let (chatbot, _) = templated_chatbot().await;

    let reply = chatbot.chat("Where is the office?").await.unwrap();

    assert_eq!(reply.response, no_information_message(COMPANY));
    assert!(reply.context_used.is_empty());
    assert!(reply.similarity_scores.is_empty());
}

#[tokio::test]
async fn test_empty_store_skips_embedding() {
    let embedder = Arc::new(KeywordEmbedder::new(&KEYWORDS));
    let chatbot = Chatbot::new(
        StoreHandle::new(KnowledgeStore::empty(COMPANY, WEBSITE)),
        embedder.clone(),
        Arc::new(TemplatedResponder::new(COMPANY)),
        ChatOptions::default(),
    )
    .unwrap();

    for question in ["How can I contact MachDatum?", "What services do you offer?"] {
        let reply = chatbot.chat(question).await.unwrap();
        assert_eq!(reply.response, no_information_message(COMPANY));
        assert!(reply.context_used.is_empty());
        assert!(reply.similarity_scores.is_empty());
    }
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn test_embedding_failure_propagates() {
    let store = KnowledgeStore::new(
        COMPANY,
        WEBSITE,
        vec![KnowledgeEntry::new(
            1,
            "We offer consulting services.",
            Category::Services,
            vec![1.0, 0.0, 0.0, 0.0],
        )],
        None,
    )
    .unwrap();

    let chatbot = Chatbot::new(
        StoreHandle::new(store),
        Arc::new(FailingEmbedder),
        Arc::new(TemplatedResponder::new(COMPANY)),
        ChatOptions::default(),
    )
    .unwrap();

    let result = chatbot.chat("What services do you offer?").await;
    assert!(matches!(result, Err(AppError::Embedding(_))));
}

#[tokio::test]
async fn test_dimension_mismatch_rejected_at_construction() {
    let store = KnowledgeStore::new(
        COMPANY,
        WEBSITE,
        vec![KnowledgeEntry::new(
            1,
            "We offer consulting services.",
            Category::Services,
            vec![1.0; 7],
        )],
        None,
    )
    .unwrap();

    let result = Chatbot::new(
        StoreHandle::new(store),
        Arc::new(KeywordEmbedder::new(&KEYWORDS)),
        Arc::new(TemplatedResponder::new(COMPANY)),
        ChatOptions::default(),
    );
    assert!(matches!(result, Err(AppError::Embedding(_))));
}

#[tokio::test]
async fn test_generation_failure_still_reports_context() {
    let embedder = Arc::new(KeywordEmbedder::new(&KEYWORDS));
    let store = company_store(&embedder).await;
    let responder = GenerativeResponder::new(
        Arc::new(ScriptedClient::fail("model overloaded")),
        COMPANY,
        GenerationSettings::default(),
    );
    let chatbot = Chatbot::new(
        StoreHandle::new(store),
        embedder,
        Arc::new(responder),
        ChatOptions::default(),
    )
    .unwrap();

    let reply = chatbot.chat("How can I contact MachDatum?").await.unwrap();

    assert!(reply
        .response
        .starts_with("I apologize, but I encountered an error while generating a response"));
    assert!(reply.response.contains("model overloaded"));
    assert_eq!(reply.context_used.len(), 2);
}

#[tokio::test]
async fn test_reload_swaps_store() {
    let (chatbot, embedder) = templated_chatbot().await;
    assert!(!chatbot.chat("Tell me about the team").await.unwrap().context_used.is_empty());

    chatbot
        .store()
        .replace(KnowledgeStore::empty(COMPANY, WEBSITE));
    let reply = chatbot.chat("Tell me about the team").await.unwrap();
    assert!(reply.context_used.is_empty());

    let rebuilt = company_store(&embedder).await;
    chatbot.store().replace(rebuilt);
    assert!(!chatbot.chat("Tell me about the team").await.unwrap().context_used.is_empty());
}

#[tokio::test]
async fn test_reload_rejects_other_dimension() {
    let (chatbot, _) = templated_chatbot().await;
    let before = chatbot.store().current();

    let other = KnowledgeStore::new(
        COMPANY,
        WEBSITE,
        vec![KnowledgeEntry::new(
            1,
            "We offer consulting services.",
            Category::Services,
            vec![1.0; 7],
        )],
        None,
    )
    .unwrap();

    let result = chatbot.reload(other);
    assert!(matches!(result, Err(AppError::Embedding(_))));
    assert!(Arc::ptr_eq(&before, &chatbot.store().current()));

    let previous = chatbot
        .reload(KnowledgeStore::empty(COMPANY, WEBSITE))
        .unwrap();
    assert!(Arc::ptr_eq(&before, &previous));
    assert!(chatbot.store().current().is_empty());
}

#[tokio::test]
async fn test_long_context_is_previewed() {
    let embedder = Arc::new(KeywordEmbedder::new(&KEYWORDS));
    let long = format!("Contact the team {}", "x".repeat(300));
    let store = KnowledgeStore::build(
        COMPANY,
        WEBSITE,
        &[long.as_str()],
        &ChunkOptions::default(),
        embedder.as_ref(),
    )
    .await
    .unwrap();

    let chatbot = Chatbot::new(
        StoreHandle::new(store),
        embedder,
        Arc::new(TemplatedResponder::new(COMPANY)),
        ChatOptions::default(),
    )
    .unwrap();

    let reply = chatbot.chat("contact").await.unwrap();
    assert_eq!(reply.context_used.len(), 1);
    assert_eq!(reply.context_used[0].chars().count(), 203);
    assert!(reply.context_used[0].ends_with("..."));
}
