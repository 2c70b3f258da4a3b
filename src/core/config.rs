//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.tutorly/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! The bearer token resolves separately: `TUTORLY_TOKEN` env var → config
//! file → `~/.tutorly/token` file (the device-keystore analogue).

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TutorlyConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub page_size: Option<u32>,
    pub suggest_debounce_ms: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "https://api.tutorly.app/v1";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_SUGGEST_DEBOUNCE_MS: u64 = 300;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    /// None means no token could be found anywhere; the TUI refuses to start.
    pub token: Option<String>,
    pub page_size: u32,
    pub suggest_debounce_ms: u64,
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

/// Returns the path to `~/.tutorly/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".tutorly").join("config.toml"))
}

/// Load config from `~/.tutorly/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `TutorlyConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<TutorlyConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(TutorlyConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(TutorlyConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: TutorlyConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Tutorly Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [api]
# base_url = "https://api.tutorly.app/v1"
# token = "eyJ..."                 # Or set TUTORLY_TOKEN, or write ~/.tutorly/token

# [general]
# page_size = 20                   # Page size for sessions/notifications
# suggest_debounce_ms = 300        # Quiet period before suggestion fetches
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

/// Reads `~/.tutorly/token`, trimming whitespace. None if absent or empty.
fn token_file() -> Option<String> {
    let path = dirs::home_dir()?.join(".tutorly").join("token");
    let contents = fs::read_to_string(&path).ok()?;
    let token = contents.trim().to_string();
    if token.is_empty() {
        warn!("Token file is empty: {}", path.display());
        return None;
    }
    info!("Loaded token from {}", path.display());
    Some(token)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars
/// → CLI. `cli_base_url` is from the `--base-url` flag (None = not given).
pub fn resolve(config: &TutorlyConfig, cli_base_url: Option<&str>) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli_base_url
        .map(|s| s.to_string())
        .or_else(|| std::env::var("TUTORLY_BASE_URL").ok())
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Token: env → config → token file
    let token = std::env::var("TUTORLY_TOKEN")
        .ok()
        .or_else(|| config.api.token.clone())
        .or_else(token_file);

    ResolvedConfig {
        base_url,
        token,
        page_size: config.general.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        suggest_debounce_ms: config
            .general
            .suggest_debounce_ms
            .unwrap_or(DEFAULT_SUGGEST_DEBOUNCE_MS),
    }
}
