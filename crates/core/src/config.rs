//! Configuration management for ragchat.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - Config file (.ragchat/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! The configuration is workspace-centric, with the snapshot and prompt
//! overrides stored in `.ragchat/`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Known embedding providers.
pub const EMBEDDING_PROVIDERS: [&str; 2] = ["trigram", "ollama"];

/// Known generation providers.
pub const GENERATION_PROVIDERS: [&str; 2] = ["ollama", "gemini"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .ragchat/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Emit logs as JSON lines
    pub log_json: bool,

    pub company: CompanyConfig,
    pub knowledge: KnowledgeConfig,
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,

    /// Which responder answers queries
    pub responder: ResponderMode,
}

/// Identity of the company the knowledge base describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyConfig {
    #[serde(default = "default_company_name")]
    pub name: String,

    #[serde(default = "default_website")]
    pub website: String,
}

/// Chunking, retrieval and snapshot settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeConfig {
    /// Source document, relative to the workspace unless absolute
    #[serde(default = "default_document")]
    pub document: PathBuf,

    /// Snapshot file, relative to the workspace unless absolute
    #[serde(default = "default_snapshot")]
    pub snapshot: PathBuf,

    /// Maximum characters per chunk before a flush
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Chunks shorter than this are dropped at build time
    #[serde(default = "default_min_chunk_chars")]
    pub min_chunk_chars: usize,

    /// Maximum matches returned per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum cosine similarity for a match (range -1.0 to 1.0)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Length of context previews in chat responses
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

/// Embedding provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingConfig {
    /// Provider name: "trigram" or "ollama"
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Embedding vector dimensions
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Provider endpoint (provider default when unset)
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Text generation settings for the generative responder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Provider name: "ollama" or "gemini"
    #[serde(default = "default_generation_provider")]
    pub provider: String,

    #[serde(default = "default_generation_model")]
    pub model: String,

    #[serde(default)]
    pub endpoint: Option<String>,

    /// Environment variable holding the API key (Gemini)
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Upper bound on a single generation call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Responder variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponderMode {
    /// Deterministic formatting of retrieved text
    Templated,
    /// Retrieved text forwarded to an LLM
    Generative,
}

impl ResponderMode {
    /// Parse a responder mode from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "templated" | "template" | "simple" => Some(Self::Templated),
            "generative" | "llm" => Some(Self::Generative),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Templated => "templated",
            Self::Generative => "generative",
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    company: Option<CompanyConfig>,
    knowledge: Option<KnowledgeConfig>,
    embedding: Option<EmbeddingConfig>,
    generation: Option<GenerationConfig>,
    responder: Option<ResponderMode>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
    json: Option<bool>,
}

fn default_company_name() -> String {
    "MachDatum".to_string()
}

fn default_website() -> String {
    "https://www.machdatum.com/".to_string()
}

fn default_document() -> PathBuf {
    PathBuf::from("company.md")
}

fn default_snapshot() -> PathBuf {
    PathBuf::from(".ragchat/knowledge.json")
}

fn default_chunk_size() -> usize {
    300
}

fn default_min_chunk_chars() -> usize {
    20
}

fn default_top_k() -> usize {
    3
}

fn default_similarity_threshold() -> f32 {
    0.3
}

fn default_preview_chars() -> usize {
    200
}

fn default_embedding_provider() -> String {
    "trigram".to_string()
}

fn default_embedding_model() -> String {
    "trigram-v1".to_string()
}

fn default_dimensions() -> usize {
    384
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_generation_provider() -> String {
    "ollama".to_string()
}

fn default_generation_model() -> String {
    "llama3.2".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    800
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            name: default_company_name(),
            website: default_website(),
        }
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            document: default_document(),
            snapshot: default_snapshot(),
            chunk_size: default_chunk_size(),
            min_chunk_chars: default_min_chunk_chars(),
            top_k: default_top_k(),
            similarity_threshold: default_similarity_threshold(),
            preview_chars: default_preview_chars(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: default_embedding_model(),
            dimensions: default_dimensions(),
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_generation_provider(),
            model: default_generation_model(),
            endpoint: None,
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
            log_json: false,
            company: CompanyConfig::default(),
            knowledge: KnowledgeConfig::default(),
            embedding: EmbeddingConfig::default(),
            generation: GenerationConfig::default(),
            responder: ResponderMode::Templated,
        }
    }
}

/// Command-line overrides, applied last.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub workspace: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub verbose: bool,
    pub no_color: bool,
    pub log_json: bool,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub responder: Option<String>,
}

impl AppConfig {
    /// Load configuration from defaults, the workspace config file and
    /// environment variables.
    ///
    /// Environment variables:
    /// - `RAGCHAT_WORKSPACE`: Override workspace path
    /// - `RAGCHAT_CONFIG`: Path to config file
    /// - `RAGCHAT_PROVIDER`: Generation provider
    /// - `RAGCHAT_MODEL`: Generation model
    /// - `RAGCHAT_RESPONDER`: `templated` or `generative`
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use ragchat_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Snapshot: {:?}", config.snapshot_path());
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(&CliOverrides::default())
    }

    /// Load configuration, letting workspace/config-file overrides steer
    /// which file is read before the remaining overrides are applied.
    pub fn load_with(overrides: &CliOverrides) -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("RAGCHAT_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }
        if let Some(ref workspace) = overrides.workspace {
            config.workspace = workspace.clone();
        }

        if let Ok(config_file) = std::env::var("RAGCHAT_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }
        if let Some(ref config_file) = overrides.config_file {
            config.config_file = Some(config_file.clone());
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.ragchat_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        config.apply_env();

        Ok(config.with_overrides(overrides))
    }

    /// Environment variables override the YAML config.
    fn apply_env(&mut self) {
        if let Ok(provider) = std::env::var("RAGCHAT_PROVIDER") {
            self.generation.provider = provider;
        }

        if let Ok(model) = std::env::var("RAGCHAT_MODEL") {
            self.generation.model = model;
        }

        if let Ok(responder) = std::env::var("RAGCHAT_RESPONDER") {
            match ResponderMode::parse(&responder) {
                Some(mode) => self.responder = mode,
                None => tracing::warn!("Ignoring unknown RAGCHAT_RESPONDER '{}'", responder),
            }
        }

        if self.log_level.is_none() {
            self.log_level = std::env::var("RUST_LOG").ok();
        }

        if std::env::var("NO_COLOR").is_ok() {
            self.no_color = true;
        }
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        self.merge_yaml_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    fn merge_yaml_str(&self, contents: &str) -> Result<Self, serde_yaml::Error> {
        let config_file: ConfigFile = if contents.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(contents)?
        };

        let mut result = self.clone();

        if let Some(ws) = config_file.workspace {
            if let Some(path) = ws.path {
                result.workspace = PathBuf::from(path);
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(json) = logging.json {
                result.log_json = json;
            }
        }

        if let Some(company) = config_file.company {
            result.company = company;
        }
        if let Some(knowledge) = config_file.knowledge {
            result.knowledge = knowledge;
        }
        if let Some(embedding) = config_file.embedding {
            result.embedding = embedding;
        }
        if let Some(generation) = config_file.generation {
            result.generation = generation;
        }
        if let Some(responder) = config_file.responder {
            result.responder = responder;
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables
    /// and the config file.
    pub fn with_overrides(mut self, overrides: &CliOverrides) -> Self {
        if let Some(ref workspace) = overrides.workspace {
            self.workspace = workspace.clone();
        }

        if let Some(ref config_file) = overrides.config_file {
            self.config_file = Some(config_file.clone());
        }

        if let Some(ref provider) = overrides.provider {
            self.generation.provider = provider.clone();
        }

        if let Some(ref model) = overrides.model {
            self.generation.model = model.clone();
        }

        if let Some(ref responder) = overrides.responder {
            match ResponderMode::parse(responder) {
                Some(mode) => self.responder = mode,
                None => tracing::warn!("Ignoring unknown responder '{}'", responder),
            }
        }

        if let Some(ref log_level) = overrides.log_level {
            self.log_level = Some(log_level.clone());
        }

        if overrides.verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if overrides.no_color {
            self.no_color = true;
        }

        if overrides.log_json {
            self.log_json = true;
        }

        self
    }

    /// Get the path to the .ragchat directory.
    pub fn ragchat_dir(&self) -> PathBuf {
        self.workspace.join(".ragchat")
    }

    /// Ensure the .ragchat directory exists.
    pub fn ensure_ragchat_dir(&self) -> AppResult<()> {
        let dir = self.ragchat_dir();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                AppError::Config(format!("Failed to create .ragchat directory: {}", e))
            })?;
        }
        Ok(())
    }

    /// Resolved path of the source document.
    pub fn document_path(&self) -> PathBuf {
        self.resolve(&self.knowledge.document)
    }

    /// Resolved path of the knowledge snapshot.
    pub fn snapshot_path(&self) -> PathBuf {
        self.resolve(&self.knowledge.snapshot)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        }
    }

    /// Resolve the generation API key from its environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.generation.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> AppResult<()> {
        let embedding = self.embedding.provider.to_lowercase();
        if !EMBEDDING_PROVIDERS.contains(&embedding.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "Embedding dimensions must be greater than zero".to_string(),
            ));
        }

        if self.knowledge.chunk_size == 0 {
            return Err(AppError::Config(
                "Chunk size must be greater than zero".to_string(),
            ));
        }

        let threshold = self.knowledge.similarity_threshold;
        if !(-1.0..=1.0).contains(&threshold) {
            return Err(AppError::Config(format!(
                "Similarity threshold must be within [-1, 1], got {}",
                threshold
            )));
        }

        if self.responder == ResponderMode::Generative {
            let provider = self.generation.provider.to_lowercase();
            if !GENERATION_PROVIDERS.contains(&provider.as_str()) {
                return Err(AppError::Config(format!(
                    "Unknown generation provider: {}. Supported: {}",
                    self.generation.provider,
                    GENERATION_PROVIDERS.join(", ")
                )));
            }

            if provider == "gemini" && self.resolve_api_key().is_none() {
                return Err(AppError::Config(format!(
                    "API key not found in environment variable: {}",
                    self.generation.api_key_env
                )));
            }
        }

        Ok(())
    }
}
