//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag; must exist)
//! 2. `~/.membit/config.toml` (user)
//! 3. `/etc/membit/config.toml` (system)
//!
//! When neither default location exists the built-in defaults are used.
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.membit/secrets.toml` (user, must be 0600)
//! 2. `/etc/membit/secrets.toml` (system, must be 0600)
//!
//! and fall back to the `MEMBIT_API_KEY` / `GEMINI_API_KEY` environment
//! variables.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use tracing::debug;

use crate::ai::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::cache::CacheConfig;
use crate::clusters::{DEFAULT_SEARCH_URL, SearchConfig};
use crate::dispatch::{BotSettings, DEFAULT_FOOTER};
use crate::engine::EngineBuilder;
use crate::http::RequestOptions;
use crate::insight::RiskKeywords;
use crate::{MembitError, Result};

/// Bot configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub ai: AiSection,
    #[serde(default)]
    pub bot: BotSection,
    /// Keyword → weight table; replaces the built-in table when present.
    #[serde(default)]
    pub risk_keywords: RiskKeywords,
}

/// Cluster search endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSection {
    #[serde(default = "default_search_url")]
    pub url: String,
    /// Header carrying the Membit API key.
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,
    /// Extra headers sent with every search.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            url: default_search_url(),
            api_key_header: default_api_key_header(),
            headers: BTreeMap::new(),
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

fn default_search_url() -> String {
    DEFAULT_SEARCH_URL.to_string()
}

fn default_api_key_header() -> String {
    "X-Membit-Api-Key".to_string()
}

fn default_timeout_secs() -> u64 {
    8
}

fn default_retries() -> u32 {
    2
}

fn default_backoff_ms() -> u64 {
    250
}

/// Cluster cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_max_entries() -> u64 {
    256
}

fn default_ttl_secs() -> u64 {
    10
}

/// Gemini settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AiSection {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_gemini_url")]
    pub base_url: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AiSection {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_gemini_url(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_gemini_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

/// Chat front-end settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BotSection {
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    #[serde(default = "default_footer")]
    pub footer: String,
    #[serde(default = "default_rate_limited")]
    pub rate_limited_commands: Vec<String>,
}

impl Default for BotSection {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
            footer: default_footer(),
            rate_limited_commands: default_rate_limited(),
        }
    }
}

fn default_cooldown_secs() -> u64 {
    10
}

fn default_footer() -> String {
    DEFAULT_FOOTER.to_string()
}

fn default_rate_limited() -> Vec<String> {
    vec!["!hunt".into(), "!graph".into(), "!analyze".into()]
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub membit: Option<ApiKeySecret>,
    #[serde(default)]
    pub gemini: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

/// Service name → environment variable name mapping.
const SERVICE_ENV_VARS: &[(&str, &str)] = &[
    ("membit", "MEMBIT_API_KEY"),
    ("gemini", "GEMINI_API_KEY"),
];

impl Config {
    /// Load configuration from the standard locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MembitError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            MembitError::Configuration(msg) => {
                MembitError::Configuration(format!("{msg} (in {path:?})"))
            }
            other => other,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| MembitError::Configuration(format!("Failed to parse config: {e}")))
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(MembitError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".membit").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/membit/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Search settings, with the Membit API key attached when available.
    pub fn search_config(&self, membit_key: Option<&str>) -> Result<SearchConfig> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.search.headers {
            insert_header(&mut headers, name, value)?;
        }
        if let Some(key) = membit_key {
            insert_header(&mut headers, &self.search.api_key_header, key)?;
        }

        let request = RequestOptions::new()
            .timeout(Duration::from_secs(self.search.timeout_secs))
            .retries(self.search.retries)
            .backoff_step(Duration::from_millis(self.search.backoff_ms));

        Ok(SearchConfig::new(self.search.url.as_str())
            .headers(headers)
            .request(request))
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .max_entries(self.cache.max_entries)
            .ttl(Duration::from_secs(self.cache.ttl_secs))
    }

    pub fn bot_settings(&self) -> BotSettings {
        BotSettings {
            cooldown: Duration::from_secs(self.bot.cooldown_secs),
            footer: self.bot.footer.clone(),
            rate_limited: self.bot.rate_limited_commands.clone(),
            analysis_max_tokens: self.ai.max_tokens,
        }
    }

    /// Engine builder populated from this config and `secrets`.
    pub fn engine_builder(&self, secrets: &Secrets) -> Result<EngineBuilder> {
        let membit_key = secrets.api_key("membit");
        let mut builder = EngineBuilder::new()
            .search(self.search_config(membit_key.as_deref())?)
            .cache(self.cache_config())
            .keywords(self.risk_keywords.clone())
            .gemini_model(self.ai.model.as_str())
            .gemini_base_url(self.ai.base_url.as_str())
            .temperature(self.ai.temperature);
        if let Some(key) = secrets.api_key("gemini") {
            builder = builder.gemini(key);
        }
        Ok(builder)
    }
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<()> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| MembitError::Configuration(format!("invalid header name {name:?}: {e}")))?;
    let value = HeaderValue::from_str(value)
        .map_err(|e| MembitError::Configuration(format!("invalid value for header {name}: {e}")))?;
    headers.insert(name, value);
    Ok(())
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (keys may come from env vars).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".membit").join("secrets.toml");
            if user_secrets.exists() {
                Self::check_permissions(&user_secrets)?;
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/membit/secrets.toml");
        if system_secrets.exists() {
            Self::check_permissions(&system_secrets)?;
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MembitError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MembitError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    pub fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            MembitError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(MembitError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    pub fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// API key for `service` ("membit" or "gemini"), falling back to the
    /// corresponding environment variable.
    pub fn api_key(&self, service: &str) -> Option<String> {
        let from_file = match service {
            "membit" => self.membit.as_ref(),
            "gemini" => self.gemini.as_ref(),
            _ => None,
        }
        .map(|s| s.api_key.clone());

        from_file.or_else(|| {
            SERVICE_ENV_VARS
                .iter()
                .find(|(name, _)| *name == service)
                .and_then(|(_, env_var)| std::env::var(env_var).ok())
                .filter(|key| !key.is_empty())
        })
    }
}
