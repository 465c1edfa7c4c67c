//! Chat command dispatch.
//!
//! The chat platform delivers messages to [`Dispatcher::handle_message`] and
//! receives replies through a [`ReplySink`]. Rate-limited commands consume
//! the user's cooldown before their arguments are validated. Any error
//! raised while handling a command is reported back to the requester as
//! `⚠️ Error: <reason>` instead of propagating.

mod command;
mod cooldown;

pub use command::{COMMAND_PREFIX, Command, Invocation};
pub use cooldown::CooldownTracker;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::ai::DEFAULT_MAX_TOKENS;
use crate::chart::{self, CHART_FILENAME};
use crate::clusters::DEFAULT_LIMIT;
use crate::engine::Engine;
use crate::telemetry;
use crate::text::{clean_text_summary, truncate};
use crate::types::{Attachment, Embed, Reply};
use crate::Result;

/// Clusters requested by `!hunt`.
pub const HUNT_LIMIT: usize = DEFAULT_LIMIT;
/// Clusters requested by `!graph`.
pub const GRAPH_LIMIT: usize = 8;
/// Clusters shown as individual fields in a hunt reply.
const HUNT_CLUSTER_FIELDS: usize = 3;
const INSIGHT_FIELD_MAX: usize = 900;
const CLUSTER_FIELD_MAX: usize = 500;
const GRAPH_COLOR: u32 = 0x3BA3FF;
const ANALYSIS_COLOR: u32 = 0x00CC99;

pub const HELP_TEXT: &str = "Commands: `!hunt <topic>`, `!graph <topic>`, `!analyze <text>`";
pub const DEFAULT_FOOTER: &str = "Powered by Membit";

/// Destination for replies to the channel a command came from.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send(&self, reply: Reply) -> Result<()>;
}

/// Dispatcher behaviour knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct BotSettings {
    /// Minimum time between rate-limited commands per user.
    pub cooldown: Duration,
    /// Footer attached to hunt replies.
    pub footer: String,
    /// Command words (with prefix) gated by the cooldown.
    pub rate_limited: Vec<String>,
    /// Output token cap for `!analyze`.
    pub analysis_max_tokens: u32,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(10),
            footer: DEFAULT_FOOTER.to_string(),
            rate_limited: vec!["!hunt".into(), "!graph".into(), "!analyze".into()],
            analysis_max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Routes chat commands to the engine and formats the results.
pub struct Dispatcher {
    engine: Arc<Engine>,
    settings: BotSettings,
    cooldowns: CooldownTracker,
}

impl Dispatcher {
    pub fn new(engine: Arc<Engine>, settings: BotSettings) -> Self {
        let cooldowns = CooldownTracker::new(settings.cooldown);
        Self {
            engine,
            settings,
            cooldowns,
        }
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    pub fn settings(&self) -> &BotSettings {
        &self.settings
    }

    /// Handle one inbound message from `author`.
    ///
    /// Only failures to deliver replies (including the error report itself)
    /// are returned; handler failures are turned into an error reply.
    pub async fn handle_message(
        &self,
        author: &str,
        content: &str,
        sink: &dyn ReplySink,
    ) -> Result<()> {
        let Some(invocation) = Invocation::parse(content) else {
            return Ok(());
        };

        if self.settings.rate_limited.contains(&invocation.name) {
            if !self.cooldowns.check(author) {
                info!(user = author, command = %invocation.name, "cooldown rejected command");
                return sink
                    .send(Reply::text(format!(
                        "⏳ Cooldown! Wait {}s.",
                        self.cooldowns.window().as_secs()
                    )))
                    .await;
            }
            self.cooldowns.prune();
        }

        let Some(command) = Command::from_invocation(&invocation) else {
            return Ok(());
        };

        info!(user = author, command = command.name(), "dispatching command");
        metrics::counter!(telemetry::COMMANDS_TOTAL, "command" => command.name()).increment(1);

        if let Err(e) = self.run(command, sink).await {
            warn!(user = author, error = %e, "command failed");
            sink.send(Reply::text(format!("⚠️ Error: {e}"))).await?;
        }
        Ok(())
    }

    async fn run(&self, command: Command, sink: &dyn ReplySink) -> Result<()> {
        match command {
            Command::Hunt { topic } => self.handle_hunt(&topic, sink).await,
            Command::Graph { topic } => self.handle_graph(&topic, sink).await,
            Command::Analyze { text } => self.handle_analyze(&text, sink).await,
            Command::Ping => sink.send(Reply::text("Pong! 🏓")).await,
            Command::Help => sink.send(Reply::text(HELP_TEXT)).await,
        }
    }

    async fn handle_hunt(&self, topic: &str, sink: &dyn ReplySink) -> Result<()> {
        sink.send(Reply::text(format!("🔎 Hunting Membit for **{topic}**...")))
            .await?;

        let clusters = match self.engine.fetch_clusters(topic, HUNT_LIMIT).await {
            Some(clusters) if !clusters.is_empty() => clusters,
            _ => {
                return sink
                    .send(Reply::text("❌ No clusters found or API error."))
                    .await;
            }
        };

        let insight = self.engine.insight(&clusters);
        let mut embed = Embed::new(format!("Membit Hunt: {topic}"))
            .description(insight.recommendation.as_str())
            .color(insight.color.rgb())
            .field(
                "Heuristic Insight",
                truncate(&insight.summary, INSIGHT_FIELD_MAX),
                false,
            );
        for cluster in clusters.iter().take(HUNT_CLUSTER_FIELDS) {
            let summary = clean_text_summary(&cluster.summary);
            embed = embed.field(
                format!("🔹 {}", cluster.label),
                truncate(&summary, CLUSTER_FIELD_MAX),
                false,
            );
        }
        embed = embed.footer(self.settings.footer.as_str());

        sink.send(Reply::embed(embed)).await
    }

    async fn handle_graph(&self, topic: &str, sink: &dyn ReplySink) -> Result<()> {
        sink.send(Reply::text(format!("📊 Generating Graph for **{topic}**...")))
            .await?;

        let clusters = match self.engine.fetch_clusters(topic, GRAPH_LIMIT).await {
            Some(clusters) if !clusters.is_empty() => clusters,
            _ => return sink.send(Reply::text("⚠️ No data to graph.")).await,
        };

        let labels: Vec<String> = clusters
            .iter()
            .map(|c| {
                if c.label.is_empty() {
                    "N/A".to_string()
                } else {
                    c.label.clone()
                }
            })
            .collect();
        let values: Vec<f64> = clusters.iter().map(|c| c.engagement_score).collect();

        let png = match chart::render_graph(labels, values, topic.to_string()).await {
            Ok(png) => png,
            Err(e) => return sink.send(Reply::text(format!("⚠️ Graph Error: {e}"))).await,
        };

        let embed = Embed::new(format!("Engagement Graph: {topic}"))
            .color(GRAPH_COLOR)
            .image(format!("attachment://{CHART_FILENAME}"));
        let attachment = Attachment {
            filename: CHART_FILENAME.to_string(),
            bytes: png,
        };
        sink.send(Reply::embed_with_attachment(embed, attachment))
            .await
    }

    async fn handle_analyze(&self, text: &str, sink: &dyn ReplySink) -> Result<()> {
        sink.send(Reply::text("🧠 AI Analyzing Sentiment...")).await?;

        let prompt = format!("Analyze sentiment briefly (Positive/Negative/Neutral):\n{text}");
        let description = match self
            .engine
            .summarize(&prompt, self.settings.analysis_max_tokens)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                info!(reason = %e, "AI unavailable, using fallback");
                "⚠️ AI Unavailable (Using Fallback logic).".to_string()
            }
        };

        let embed = Embed::new("AI Analysis")
            .description(description)
            .color(ANALYSIS_COLOR);
        sink.send(Reply::embed(embed)).await
    }
}
