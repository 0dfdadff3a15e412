//! Prompt types for ragchat.

use ragchat_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A prompt definition loaded from YAML or built in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDefinition {
    pub id: String,

    pub title: String,

    /// Schema version of the YAML file
    pub api_version: String,

    /// Optional system message sent alongside the rendered template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Variables the caller must supply. An empty list disables the check.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<String>,

    /// Handlebars template for the user message
    pub template: String,
}

impl PromptDefinition {
    /// Fail if any declared variable is absent from `values`.
    pub fn check_variables(&self, values: &HashMap<String, String>) -> AppResult<()> {
        let missing: Vec<&str> = self
            .variables
            .iter()
            .filter(|name| !values.contains_key(name.as_str()))
            .map(String::as_str)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Prompt(format!(
                "Prompt '{}' is missing variables: {}",
                self.id,
                missing.join(", ")
            )))
        }
    }
}

/// A rendered prompt ready to send to an LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltPrompt {
    pub system: Option<String>,

    pub user: String,

    /// Id of the definition it was rendered from
    pub prompt_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer_definition() -> PromptDefinition {
        serde_yaml::from_str(
            r#"
id: answer
title: Grounded answer
apiVersion: "1.0"
variables: [context, query]
template: "{{context}} / {{query}}"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_prompt_definition_deserialization() {
        let def = answer_definition();
        assert_eq!(def.id, "answer");
        assert_eq!(def.api_version, "1.0");
        assert_eq!(def.variables, vec!["context", "query"]);
        assert!(def.system.is_none());
    }

    #[test]
    fn test_variables_default_to_unchecked() {
        let def: PromptDefinition = serde_yaml::from_str(
            "id: plain\ntitle: Plain\napiVersion: \"1.0\"\ntemplate: hello\n",
        )
        .unwrap();
        assert!(def.variables.is_empty());
        assert!(def.check_variables(&HashMap::new()).is_ok());
    }

    #[test]
    fn test_check_variables_reports_missing() {
        let mut values = HashMap::new();
        values.insert("query".to_string(), "What do you offer?".to_string());

        let err = answer_definition().check_variables(&values).unwrap_err();
        assert!(matches!(err, AppError::Prompt(_)));
        assert!(err.to_string().contains("context"));

        values.insert("context".to_string(), String::new());
        assert!(answer_definition().check_variables(&values).is_ok());
    }
}
