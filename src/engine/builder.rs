//! Builder for configuring engine instances

use std::sync::Arc;

use super::Engine;
use crate::ai::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_TEMPERATURE};
use crate::ai::{GeminiClient, Summarizer, TextGenerator};
use crate::cache::{CacheConfig, ClusterCache};
use crate::clusters::{ClusterFetcher, SearchConfig};
use crate::http::SafeHttp;
use crate::insight::RiskKeywords;
use crate::version;
use crate::{MembitError, Result};

/// Builder for [`Engine`].
///
/// ```rust
/// # use membit::{Engine, clusters::SearchConfig};
/// let engine = Engine::builder()
///     .search(SearchConfig::new("https://api.membit.ai/v1/clusters/search"))
///     .build()
///     .unwrap();
/// assert!(!engine.summarizer().is_initialized());
/// ```
pub struct EngineBuilder {
    search: SearchConfig,
    cache: CacheConfig,
    keywords: RiskKeywords,
    user_agent: String,
    gemini_key: Option<String>,
    gemini_model: String,
    gemini_base_url: String,
    generator: Option<Arc<dyn TextGenerator>>,
    temperature: f32,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            search: SearchConfig::default(),
            cache: CacheConfig::default(),
            keywords: RiskKeywords::default(),
            user_agent: version::user_agent(),
            gemini_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            generator: None,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Cluster search endpoint, headers and retry budget.
    pub fn search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    pub fn keywords(mut self, keywords: RiskKeywords) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Configure Gemini. Without a key the summarizer stays uninitialized.
    pub fn gemini(mut self, api_key: impl Into<String>) -> Self {
        self.gemini_key = Some(api_key.into());
        self
    }

    pub fn gemini_model(mut self, model: impl Into<String>) -> Self {
        self.gemini_model = model.into();
        self
    }

    pub fn gemini_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.gemini_base_url = base_url.into();
        self
    }

    /// Use a custom generator instead of Gemini. Takes precedence over
    /// [`gemini`](Self::gemini).
    pub fn text_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn build(self) -> Result<Engine> {
        reqwest::Url::parse(&self.search.url).map_err(|e| {
            MembitError::Configuration(format!("invalid search url {:?}: {e}", self.search.url))
        })?;
        if self.cache.max_entries == 0 {
            return Err(MembitError::Configuration(
                "cache max_entries must be at least 1".into(),
            ));
        }

        let generator = self.generator.or_else(|| {
            self.gemini_key
                .filter(|key| !key.is_empty())
                .map(|key| -> Arc<dyn TextGenerator> {
                    Arc::new(GeminiClient::with_base_url(
                        key,
                        self.gemini_model.as_str(),
                        self.gemini_base_url.as_str(),
                    ))
                })
        });
        let summarizer = match generator {
            Some(generator) => Summarizer::new(generator).with_temperature(self.temperature),
            None => Summarizer::uninitialized(),
        };

        let http = Arc::new(SafeHttp::with_user_agent(self.user_agent));
        let fetcher = ClusterFetcher::new(http.clone(), ClusterCache::new(&self.cache), self.search);

        Ok(Engine {
            http,
            fetcher,
            summarizer,
            keywords: self.keywords,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
