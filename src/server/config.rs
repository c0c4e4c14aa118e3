//! Configuration loading for mythd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.mythweaver/config.toml` (user)
//! 3. `/etc/mythweaver/config.toml` (system)
//!
//! With no file at all the built-in defaults apply. Environment overrides
//! (`ENVIRONMENT`, `LOG_LEVEL`, `OPENAI_MODEL`, `USE_OPENAI_MODERATION`,
//! `MAX_SCENARIO_LENGTH`) are applied on top of whatever was loaded.
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.mythweaver/secrets.toml` (user, must be 0600)
//! 2. `/etc/mythweaver/secrets.toml` (system, must be 0600)
//!
//! and fall back to `OPENAI_API_KEY`.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::culture::{CultureClassifier, CultureKeywords};
use crate::generator::{DEFAULT_MODEL, GeneratorConfig};
use crate::motifs::MotifRepository;
use crate::providers::openai::DEFAULT_BASE_URL;
use crate::safety::{
    ContentValidator, DEFAULT_DISALLOWED_TERMS, DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH,
};
use crate::service::DEFAULT_ENVIRONMENT;
use crate::{MythError, Result};

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub safety: SafetyConfig,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub motifs: MotifsConfig,
    /// Ordered classifier table. Empty means the built-in table.
    #[serde(default)]
    pub culture_keywords: Vec<CultureKeywords>,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8000).
    #[serde(default = "default_address")]
    pub address: String,
    /// Environment tag reported by the health endpoint (default: production).
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Default tracing filter when `RUST_LOG` is unset (default: info).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            environment: default_environment(),
            log_level: default_log_level(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Completion API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_retry_temperature")]
    pub retry_temperature: f32,
    /// Per-request timeout in seconds (default: 60).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            retry_temperature: default_retry_temperature(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    1200
}

fn default_temperature() -> f32 {
    0.7
}

fn default_retry_temperature() -> f32 {
    0.5
}

fn default_timeout() -> u64 {
    60
}

/// Validation and moderation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SafetyConfig {
    /// Consult the moderation endpoint (default: true).
    #[serde(default = "default_true")]
    pub moderation: bool,
    #[serde(default = "default_min_length")]
    pub min_scenario_length: usize,
    #[serde(default = "default_max_length")]
    pub max_scenario_length: usize,
    #[serde(default = "default_disallowed_terms")]
    pub disallowed_terms: Vec<String>,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            moderation: true,
            min_scenario_length: default_min_length(),
            max_scenario_length: default_max_length(),
            disallowed_terms: default_disallowed_terms(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_min_length() -> usize {
    DEFAULT_MIN_LENGTH
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_disallowed_terms() -> Vec<String> {
    DEFAULT_DISALLOWED_TERMS.iter().map(|t| t.to_string()).collect()
}

/// Response cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Entry time-to-live in seconds (default: 3600).
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_ttl() -> u64 {
    3600
}

fn default_max_entries() -> u64 {
    10_000
}

/// Motif dataset location.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MotifsConfig {
    /// JSON dataset file. The embedded seed is used when unset or unreadable.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub openai: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

/// Environment variable holding the API key when no secrets file provides one.
const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

impl Config {
    /// Load configuration from the standard locations, then apply
    /// environment overrides.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided; must exist)
    /// 2. `~/.mythweaver/config.toml`
    /// 3. `/etc/mythweaver/config.toml`
    /// 4. Built-in defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a config file without applying environment overrides.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MythError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MythError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path. `None` means no file anywhere.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(MythError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".mythweaver").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/mythweaver/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(environment) = lookup("ENVIRONMENT") {
            self.server.environment = environment;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.server.log_level = level.to_lowercase();
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            self.generation.model = model;
        }
        if let Some(raw) = lookup("USE_OPENAI_MODERATION") {
            self.safety.moderation = parse_bool(&raw).ok_or_else(|| {
                MythError::Configuration(format!("USE_OPENAI_MODERATION: invalid boolean {raw:?}"))
            })?;
        }
        if let Some(raw) = lookup("MAX_SCENARIO_LENGTH") {
            self.safety.max_scenario_length = raw.trim().parse().map_err(|e| {
                MythError::Configuration(format!("MAX_SCENARIO_LENGTH: {e}"))
            })?;
        }
        Ok(())
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            model: self.generation.model.clone(),
            max_tokens: self.generation.max_tokens,
            temperature: self.generation.temperature,
            retry_temperature: self.generation.retry_temperature,
            moderation: self.safety.moderation,
        }
    }

    pub fn validator(&self) -> ContentValidator {
        ContentValidator::new(
            self.safety.min_scenario_length,
            self.safety.max_scenario_length,
            self.safety.disallowed_terms.iter().cloned(),
        )
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .ttl(Duration::from_secs(self.cache.ttl_secs))
            .max_entries(self.cache.max_entries)
    }

    pub fn classifier(&self) -> CultureClassifier {
        if self.culture_keywords.is_empty() {
            CultureClassifier::default()
        } else {
            CultureClassifier::new(self.culture_keywords.clone())
        }
    }

    pub fn motif_repository(&self) -> MotifRepository {
        MotifRepository::load(self.motifs.path.as_deref())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.generation.timeout_secs)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Resolution order:
    /// 1. `~/.mythweaver/secrets.toml` (if exists, must be 0600)
    /// 2. `/etc/mythweaver/secrets.toml` (if exists, must be 0600)
    ///
    /// Returns empty secrets if no file exists (the key may come from the environment).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".mythweaver").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/mythweaver/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Read a secrets file after checking its permissions.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            MythError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MythError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            MythError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(MythError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// API key from the secrets file, falling back to `OPENAI_API_KEY`.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_with(|key| std::env::var(key).ok())
    }

    /// [`api_key`](Self::api_key) with an explicit environment lookup.
    pub fn api_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.openai
            .as_ref()
            .map(|s| s.api_key.clone())
            .filter(|k| !k.trim().is_empty())
            .or_else(|| lookup(API_KEY_ENV_VAR).filter(|k| !k.trim().is_empty()))
    }
}
