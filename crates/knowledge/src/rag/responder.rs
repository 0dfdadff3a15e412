//! Responder trait shared by the answer strategies.

use crate::types::ScoredMatch;
use async_trait::async_trait;

/// Turns a question and its retrieved matches into answer text.
///
/// Responders never fail: problems are expressed in the returned text.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Short identifier used in logs (e.g., "templated", "generative")
    fn name(&self) -> &str;

    async fn respond(&self, query: &str, matches: &[ScoredMatch<'_>]) -> String;
}

/// Answer given when nothing relevant was retrieved.
pub fn no_information_message(company: &str) -> String {
    format!(
        "I don't have specific information about that topic in my knowledge base. \
         Could you please rephrase your question or ask about {}'s services, \
         company information, or contact details?",
        company
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_information_message() {
        assert_eq!(
            no_information_message("MachDatum"),
            "I don't have specific information about that topic in my knowledge base. Could you please rephrase your question or ask about MachDatum's services, company information, or contact details?"
        );
    }
}
