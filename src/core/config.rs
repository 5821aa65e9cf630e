//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars (including `.env`) → CLI flags.
//!
//! Config lives at `~/.chatbox/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::inference::DEFAULT_SYSTEM_PROMPT;
use crate::inference::providers::openai::DEFAULT_OPENAI_BASE_URL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatboxConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub model: Option<String>,
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const MODEL_VAR: &str = "CHATBOX_MODEL";

// ============================================================================
// Resolved Config (concrete values, credential stays optional)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub model_name: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub system_prompt: String,
    /// `None` is recoverable: every turn answers with a "key not found" message.
    pub api_key: Option<String>,
    pub base_url: String,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.chatbox/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".chatbox").join("config.toml"))
}

/// Load config from `~/.chatbox/config.toml`.
pub fn load_config() -> Result<ChatboxConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(ChatboxConfig::default())
        }
    }
}

/// Load config from an explicit path.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ChatboxConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config_from(path: &Path) -> Result<ChatboxConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ChatboxConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ChatboxConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    // Keep the key out of the log
    debug!(
        "Config: general={:?}, openai.base_url={:?}, openai.api_key set={}",
        config.general,
        config.openai.base_url,
        config.openai.api_key.is_some()
    );
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Chatbox Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars / .env → CLI flags.

# [general]
# model = "gpt-3.5-turbo"            # Or set CHATBOX_MODEL, or pass --model
# max_output_tokens = 500
# temperature = 0.7
# system_prompt = "You are a helpful AI assistant."

# [openai]
# api_key = "sk-..."                 # Or set OPENAI_API_KEY (env or .env)
# base_url = "https://api.openai.com/v1"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Values read from the process environment. Split out so resolution is testable.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            api_key: var(API_KEY_VAR),
            base_url: var(BASE_URL_VAR),
            model: var(MODEL_VAR),
        }
    }
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ChatboxConfig, cli_model: Option<&str>) -> ResolvedConfig {
    resolve_with_env(config, &EnvOverrides::from_env(), cli_model)
}

pub fn resolve_with_env(
    config: &ChatboxConfig,
    env: &EnvOverrides,
    cli_model: Option<&str>,
) -> ResolvedConfig {
    // Model: CLI → env → config → default
    let model_name = cli_model
        .map(|s| s.to_string())
        .or_else(|| env.model.clone())
        .or_else(|| config.general.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    // API key: env → config
    let api_key = env.api_key.clone().or_else(|| config.openai.api_key.clone());

    // Base URL: env → config → default
    let base_url = env
        .base_url
        .clone()
        .or_else(|| config.openai.base_url.clone())
        .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());

    let system_prompt = config
        .general
        .system_prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_SYSTEM_PROMPT)
        .to_string();

    ResolvedConfig {
        model_name,
        max_output_tokens: config
            .general
            .max_output_tokens
            .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
        temperature: config.general.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        system_prompt,
        api_key,
        base_url,
    }
}
