//! Membit - crypto sentiment and trend context for chat bots
//!
//! This crate fetches trending discussion clusters from the Membit API,
//! scores them with a keyword heuristic, optionally summarizes text through
//! Gemini, renders engagement charts, and routes chat commands
//! (`!hunt`, `!graph`, `!analyze`, `!ping`, `!help`) to those capabilities.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use membit::{BotSettings, Dispatcher, Engine, Reply, ReplySink};
//!
//! struct Stdout;
//!
//! #[async_trait]
//! impl ReplySink for Stdout {
//!     async fn send(&self, reply: Reply) -> membit::Result<()> {
//!         println!("{}", reply.render_text());
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> membit::Result<()> {
//!     let engine = Arc::new(Engine::builder().gemini("your-gemini-key").build()?);
//!     let dispatcher = Dispatcher::new(engine.clone(), BotSettings::default());
//!
//!     dispatcher.handle_message("alice", "!hunt bitcoin", &Stdout).await?;
//!
//!     engine.shutdown();
//!     Ok(())
//! }
//! ```

pub mod ai;
pub mod cache;
pub mod chart;
pub mod clusters;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod http;
pub mod insight;
pub mod telemetry;
pub mod text;
pub mod types;
pub mod version;

pub use dispatch::{BotSettings, Dispatcher, ReplySink};
pub use engine::{Engine, EngineBuilder};
pub use error::{MembitError, Result};
pub use types::{Attachment, Cluster, Embed, EmbedField, Insight, Reply, RiskBand, RiskColor};
pub use version::{BuildInfo, PKG_VERSION};
