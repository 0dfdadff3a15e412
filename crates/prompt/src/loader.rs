//! Prompt loader for YAML prompt definitions.

use crate::types::PromptDefinition;
use ragchat_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Identifier of the grounded answer prompt used by the generative responder.
pub const ANSWER_PROMPT_ID: &str = "answer";

const ANSWER_TEMPLATE: &str = "You are a helpful assistant for {{company}} company. \
Use the following context information to answer the user's question. \
If the context doesn't contain relevant information, politely say so and provide general guidance.

Context Information:
{{context}}

User Question: {{query}}

Please provide a helpful, accurate, and professional response based on the context. \
If you're referencing specific information from the context, make sure it's accurate.";

/// The built-in grounded answer prompt.
///
/// Variables: `company`, `context`, `query`.
pub fn default_answer_prompt() -> PromptDefinition {
    PromptDefinition {
        id: ANSWER_PROMPT_ID.to_string(),
        title: "Grounded company answer".to_string(),
        api_version: "1.0".to_string(),
        system: None,
        variables: ["company", "context", "query"]
            .iter()
            .map(|v| v.to_string())
            .collect(),
        template: ANSWER_TEMPLATE.to_string(),
    }
}

/// Path of a prompt override file: `.ragchat/prompts/<id>.yml`.
pub fn prompt_path(workspace_path: &Path, prompt_id: &str) -> PathBuf {
    workspace_path
        .join(".ragchat/prompts")
        .join(format!("{}.yml", prompt_id))
}

/// Load a prompt definition by ID from the workspace.
///
/// # Example
/// ```no_run
/// use ragchat_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "answer")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompt_path(workspace_path, prompt_id);

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Load the answer prompt, falling back to the built-in one when the
/// workspace has no override. A present but invalid override is an error.
pub fn load_answer_prompt(workspace_path: &Path) -> AppResult<PromptDefinition> {
    if prompt_path(workspace_path, ANSWER_PROMPT_ID).exists() {
        load_prompt(workspace_path, ANSWER_PROMPT_ID)
    } else {
        Ok(default_answer_prompt())
    }
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}
