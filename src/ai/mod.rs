//! AI text generation behind a never-failing adapter.
//!
//! [`TextGenerator`] is the seam to the external model; [`GeminiClient`] is
//! the production implementation. [`Summarizer`] wraps an optional
//! generator and turns every failure mode into a typed error the caller can
//! show to users:
//!
//! - no generator configured → [`MembitError::AiNotInitialized`]
//! - response without candidates → [`MembitError::BlockedOrEmpty`]
//! - anything else → [`MembitError::Ai`] carrying the underlying message

mod gemini;

pub use gemini::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, GeminiClient};

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::telemetry;
use crate::{MembitError, Result};

/// Default output token cap for [`Summarizer::call_gemini_safe`].
pub const DEFAULT_MAX_TOKENS: u32 = 180;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.4;

/// Sampling parameters for one generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// One completion candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    /// Concatenated text parts; `None` when the candidate carried no text.
    pub text: Option<String>,
    pub finish_reason: Option<String>,
}

/// Raw model output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    pub candidates: Vec<Candidate>,
    /// Reason the prompt itself was blocked, if reported.
    pub block_reason: Option<String>,
}

/// Provider of text completions.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<Generation>;
}

/// Adapter that never lets a generation failure escape as anything but a
/// returned error value.
#[derive(Clone)]
pub struct Summarizer {
    generator: Option<Arc<dyn TextGenerator>>,
    temperature: f32,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// A summarizer without a model (e.g. no API key configured).
    pub fn uninitialized() -> Self {
        Self {
            generator: None,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.generator.is_some()
    }

    /// Generate a completion for `prompt` capped at `max_tokens` output tokens.
    ///
    /// Returns the first candidate's text. Uninitialized, blocked and failed
    /// calls come back as errors whose `Display` is the user-facing reason.
    pub async fn call_gemini_safe(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let Some(generator) = &self.generator else {
            return Err(MembitError::AiNotInitialized);
        };

        let config = GenerationConfig {
            max_output_tokens: max_tokens,
            temperature: self.temperature,
        };
        let result = generator
            .generate(prompt, &config)
            .await
            .and_then(first_candidate_text);

        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::AI_REQUESTS_TOTAL, "status" => status).increment(1);

        match result {
            Ok(text) => {
                debug!(provider = generator.name(), chars = text.len(), "generation succeeded");
                Ok(text)
            }
            Err(e) => {
                warn!(provider = generator.name(), error = %e, "generation failed");
                Err(match e {
                    MembitError::AiNotInitialized | MembitError::BlockedOrEmpty | MembitError::Ai(_) => e,
                    other => MembitError::Ai(other.to_string()),
                })
            }
        }
    }
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::uninitialized()
    }
}

fn first_candidate_text(generation: Generation) -> Result<String> {
    let Some(candidate) = generation.candidates.into_iter().next() else {
        match generation.block_reason.as_deref() {
            Some(reason) => warn!(block_reason = reason, "prompt blocked"),
            None => debug!("generation returned no candidates"),
        }
        return Err(MembitError::BlockedOrEmpty);
    };
    match candidate.text {
        Some(text) => Ok(text),
        None => Err(MembitError::Ai(format!(
            "response candidate contains no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        ))),
    }
}
