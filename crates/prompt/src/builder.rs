//! Prompt builder for rendering templates.

use crate::types::{BuiltPrompt, PromptDefinition};
use handlebars::Handlebars;
use ragchat_core::{AppError, AppResult};
use std::collections::HashMap;

/// Build a prompt from a definition and input variables.
///
/// Variables are substituted verbatim: no HTML escaping, and handlebars
/// syntax inside a variable's value is not interpreted.
///
/// # Example
/// ```no_run
/// use ragchat_prompt::{build_prompt, default_answer_prompt};
/// use std::collections::HashMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut vars = HashMap::new();
/// vars.insert("company".to_string(), "MachDatum".to_string());
/// vars.insert("context".to_string(), "We build data platforms.".to_string());
/// vars.insert("query".to_string(), "What do you offer?".to_string());
///
/// let built = build_prompt(&default_answer_prompt(), vars)?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    definition.check_variables(&variables)?;
    let user = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt {
        system: definition.system.clone(),
        user,
        prompt_id: definition.id.clone(),
    })
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::default_answer_prompt;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_simple_template() {
        let result = render_template("Question: {{query}}", &vars(&[("query", "Hello, world!")]));
        assert_eq!(result.unwrap(), "Question: Hello, world!");
    }

    #[test]
    fn test_no_html_escaping() {
        let result = render_template("{{context}}", &vars(&[("context", "R&D <team> \"quoted\"")]));
        assert_eq!(result.unwrap(), "R&D <team> \"quoted\"");
    }

    #[test]
    fn test_values_are_not_reinterpreted() {
        let result = render_template("{{context}}", &vars(&[("context", "{{query}}")]));
        assert_eq!(result.unwrap(), "{{query}}");
    }

    #[test]
    fn test_build_answer_prompt() {
        let built = build_prompt(
            &default_answer_prompt(),
            vars(&[
                ("company", "MachDatum"),
                ("context", "We build data platforms.\n\nEmail: hello@machdatum.com"),
                ("query", "What do you build?"),
            ]),
        )
        .unwrap();

        assert!(built
            .user
            .starts_with("You are a helpful assistant for MachDatum company."));
        assert!(built
            .user
            .contains("Context Information:\nWe build data platforms.\n\nEmail: hello@machdatum.com\n"));
        assert!(built.user.contains("User Question: What do you build?"));
        assert_eq!(built.prompt_id, "answer");
        assert!(built.system.is_none());
    }

    #[test]
    fn test_build_rejects_missing_declared_variable() {
        let result = build_prompt(&default_answer_prompt(), vars(&[("query", "Hi")]));
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_render_template_missing_variable() {
        // Handlebars renders missing variables as empty string
        let result = render_template("Question: {{missing}}", &HashMap::new());
        assert_eq!(result.unwrap(), "Question: ");
    }

    #[test]
    fn test_render_malformed_template() {
        let result = render_template("Question: {{#if}}", &HashMap::new());
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }
}
