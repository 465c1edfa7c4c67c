//! The engine context object.
//!
//! [`Engine`] owns every piece of shared state the bot needs: the upstream
//! HTTP session, the cluster cache, the AI summarizer and the risk keyword
//! table. Create one at startup with [`Engine::builder`], share it behind an
//! `Arc`, and call [`Engine::shutdown`] once on exit.

mod builder;

pub use builder::EngineBuilder;

use std::sync::Arc;

use crate::Result;
use crate::ai::Summarizer;
use crate::clusters::ClusterFetcher;
use crate::http::SafeHttp;
use crate::insight::{RiskKeywords, generate_heuristic_insight};
use crate::types::{Cluster, Insight};

pub struct Engine {
    http: Arc<SafeHttp>,
    fetcher: ClusterFetcher,
    summarizer: Summarizer,
    keywords: RiskKeywords,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Cached, de-duplicated cluster search. `None` means no data.
    pub async fn fetch_clusters(&self, keyword: &str, limit: usize) -> Option<Arc<Vec<Cluster>>> {
        self.fetcher.fetch_clusters(keyword, limit).await
    }

    /// Heuristic insight for `clusters` using this engine's keyword table.
    pub fn insight(&self, clusters: &[Cluster]) -> Insight {
        generate_heuristic_insight(clusters, &self.keywords)
    }

    /// See [`Summarizer::call_gemini_safe`].
    pub async fn summarize(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        self.summarizer.call_gemini_safe(prompt, max_tokens).await
    }

    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    pub fn keywords(&self) -> &RiskKeywords {
        &self.keywords
    }

    pub fn http(&self) -> &SafeHttp {
        &self.http
    }

    /// Release the HTTP session. Returns `true` the first time a live
    /// session is released.
    pub fn shutdown(&self) -> bool {
        self.http.close()
    }
}
