//! Cluster search against the Membit API.
//!
//! [`ClusterFetcher`] combines the shared [`SafeHttp`] session with a
//! [`ClusterCache`]: a hit short-circuits the network entirely, a miss
//! issues `GET <url>?q=<keyword>&limit=<limit>`, keeps at most `limit`
//! entries of the response's `clusters` array, drops repeated labels and
//! caches the result.

use std::collections::HashSet;
use std::sync::Arc;

use reqwest::header::HeaderMap;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::cache::{ClusterCache, ClusterKey};
use crate::http::{RequestOptions, SafeHttp};
use crate::types::Cluster;

/// Default cluster search endpoint.
pub const DEFAULT_SEARCH_URL: &str = "https://api.membit.ai/v1/clusters/search";

/// Default number of clusters requested per search.
pub const DEFAULT_LIMIT: usize = 6;

/// Where and how to query for clusters.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub url: String,
    /// Sent with every search request (credentials, content negotiation).
    pub headers: HeaderMap,
    pub request: RequestOptions,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SEARCH_URL.to_string(),
            headers: HeaderMap::new(),
            request: RequestOptions::default(),
        }
    }
}

impl SearchConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn request(mut self, request: RequestOptions) -> Self {
        self.request = request;
        self
    }
}

/// Retrieves and de-duplicates topic clusters for a keyword.
pub struct ClusterFetcher {
    http: Arc<SafeHttp>,
    cache: ClusterCache,
    search: SearchConfig,
}

impl ClusterFetcher {
    pub fn new(http: Arc<SafeHttp>, cache: ClusterCache, search: SearchConfig) -> Self {
        Self {
            http,
            cache,
            search,
        }
    }

    /// Fetch up to `limit` unique clusters for `keyword`.
    ///
    /// Returns `None` when the upstream call fails or yields no body; callers
    /// treat that as "no data". An empty list is a valid (cached) result.
    #[instrument(skip(self), fields(url = %self.search.url))]
    pub async fn fetch_clusters(&self, keyword: &str, limit: usize) -> Option<Arc<Vec<Cluster>>> {
        let key = ClusterKey::new(keyword, limit);
        if let Some(cached) = self.cache.get(&key).await {
            debug!(count = cached.len(), "cluster cache hit");
            return Some(cached);
        }

        let params = [("q", keyword.to_string()), ("limit", limit.to_string())];
        let body = self
            .http
            .get_json(&self.search.url, &self.search.headers, &params, &self.search.request)
            .await?;

        let clusters = Arc::new(parse_clusters(body, limit));
        debug!(count = clusters.len(), "fetched clusters");
        self.cache.insert(key, clusters.clone()).await;
        Some(clusters)
    }
}

/// Extract at most `limit` clusters from a search response body, then drop
/// repeated labels.
///
/// A missing or non-array `clusters` field yields an empty list. The limit
/// applies before de-duplication, so the result may be shorter than `limit`.
pub fn parse_clusters(body: Value, limit: usize) -> Vec<Cluster> {
    let entries = match body {
        Value::Object(mut map) => match map.remove("clusters") {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    dedup_clusters(
        entries
            .into_iter()
            .take(limit)
            .filter_map(Cluster::from_value),
    )
}

/// Keep the first cluster for each trimmed, case-insensitive label.
pub fn dedup_clusters(clusters: impl IntoIterator<Item = Cluster>) -> Vec<Cluster> {
    let mut seen = HashSet::new();
    clusters
        .into_iter()
        .filter(|cluster| seen.insert(cluster.dedup_key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn labels(clusters: &[Cluster]) -> Vec<&str> {
        clusters.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn dedup_keeps_first_seen() {
        let clusters = dedup_clusters(vec![
            Cluster::new("Foo", "first", 1.0),
            Cluster::new(" foo ", "second", 2.0),
            Cluster::new("Bar", "third", 3.0),
        ]);
        assert_eq!(labels(&clusters), vec!["Foo", "Bar"]);
        assert_eq!(clusters[0].summary, "first");
    }

    #[test]
    fn parse_applies_limit_before_dedup() {
        let body = json!({"clusters": [
            {"label": "A"}, {"label": "a"}, {"label": "B"}, {"label": "C"}
        ]});
        let clusters = parse_clusters(body, 3);
        assert_eq!(labels(&clusters), vec!["A", "B"]);
    }

    #[test]
    fn parse_missing_clusters_field() {
        assert!(parse_clusters(json!({"other": 1}), 6).is_empty());
        assert!(parse_clusters(json!({"clusters": "nope"}), 6).is_empty());
        assert!(parse_clusters(json!([1, 2]), 6).is_empty());
    }

    #[test]
    fn parse_skips_non_object_entries() {
        let body = json!({"clusters": [1, {"label": "Real"}, null]});
        assert_eq!(labels(&parse_clusters(body, 6)), vec!["Real"]);
    }

    #[test]
    fn unlabeled_clusters_collapse_to_one() {
        let body = json!({"clusters": [{"summary": "x"}, {"summary": "y"}]});
        assert_eq!(parse_clusters(body, 6).len(), 1);
    }
}
