//! Reusable upstream HTTP session.
//!
//! [`SafeHttp`] owns one long-lived `reqwest::Client` (a pooled connection
//! context). The client is created lazily by [`SafeHttp::ensure`], dropped by
//! [`SafeHttp::close`] and transparently recreated on the next request.
//! Concurrent requests share the client; `reqwest` pools connections
//! internally, so no further locking is needed around calls.

pub mod retry;

use std::sync::{Mutex, MutexGuard, PoisonError};

use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info};

use crate::version;
use crate::{MembitError, Result};

pub use retry::RequestOptions;

/// Lazily created, explicitly closed HTTP session.
pub struct SafeHttp {
    session: Mutex<Option<Client>>,
    user_agent: String,
}

impl SafeHttp {
    /// Create a session that identifies as `MembitContextAgent/<version>`.
    ///
    /// No connection resources are allocated until the first request.
    pub fn new() -> Self {
        Self::with_user_agent(version::user_agent())
    }

    pub fn with_user_agent(user_agent: impl Into<String>) -> Self {
        Self {
            session: Mutex::new(None),
            user_agent: user_agent.into(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Client>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the live client, creating it if absent or previously closed.
    pub fn ensure(&self) -> Result<Client> {
        let mut session = self.lock();
        if let Some(client) = session.as_ref() {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| MembitError::Http(format!("failed to build HTTP client: {e}")))?;
        debug!(user_agent = %self.user_agent, "opened HTTP session");
        *session = Some(client.clone());
        Ok(client)
    }

    /// Whether a client is currently held.
    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    /// Release the client. Returns `true` only for the call that released it.
    pub fn close(&self) -> bool {
        let released = self.lock().take().is_some();
        if released {
            info!("closed HTTP session");
        }
        released
    }

    /// GET `url` and decode the body as JSON.
    ///
    /// Non-200 statuses, transport errors and undecodable bodies are retried
    /// per `options`. A body that decodes to an empty value (`null`, `false`,
    /// `0`, `""`, `[]` or `{}`) counts as no data.
    /// Returns `None` once attempts are exhausted; never errors.
    pub async fn get_json(
        &self,
        url: &str,
        headers: &HeaderMap,
        params: &[(&str, String)],
        options: &RequestOptions,
    ) -> Option<Value> {
        let body = retry::with_retry(options, url, || self.get_once(url, headers, params, options)).await?;
        if is_empty_body(&body) {
            debug!(url, "upstream returned an empty body");
            return None;
        }
        Some(body)
    }

    async fn get_once(
        &self,
        url: &str,
        headers: &HeaderMap,
        params: &[(&str, String)],
        options: &RequestOptions,
    ) -> Result<Value> {
        let client = self.ensure()?;
        let response = client
            .get(url)
            .headers(headers.clone())
            .query(params)
            .timeout(options.timeout)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(MembitError::Api {
                status: status.as_u16(),
                message: format!("unexpected status from {url}"),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

impl Default for SafeHttp {
    fn default() -> Self {
        Self::new()
    }
}

fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_is_lazy() {
        let http = SafeHttp::new();
        assert!(!http.is_open());
        http.ensure().unwrap();
        assert!(http.is_open());
    }

    #[test]
    fn close_releases_exactly_once() {
        let http = SafeHttp::new();
        assert!(!http.close(), "nothing to release yet");
        http.ensure().unwrap();
        assert!(http.close());
        assert!(!http.close());
        assert!(!http.is_open());
    }

    #[test]
    fn ensure_recreates_after_close() {
        let http = SafeHttp::new();
        http.ensure().unwrap();
        http.close();
        http.ensure().unwrap();
        assert!(http.is_open());
    }

    #[test]
    fn empty_bodies() {
        assert!(is_empty_body(&Value::Null));
        assert!(is_empty_body(&json!({})));
        assert!(is_empty_body(&json!([])));
        assert!(is_empty_body(&json!(false)));
        assert!(is_empty_body(&json!(0)));
        assert!(is_empty_body(&json!(0.0)));
        assert!(is_empty_body(&json!("")));
        assert!(!is_empty_body(&json!({"clusters": []})));
        assert!(!is_empty_body(&json!([0])));
        assert!(!is_empty_body(&json!(true)));
        assert!(!is_empty_body(&json!(3)));
        assert!(!is_empty_body(&json!("x")));
    }
}
