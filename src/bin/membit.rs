//! membit — console front-end for the Membit bot.
//!
//! Feeds chat lines to the command dispatcher and prints the replies.
//! Chart attachments are written to the output directory.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use membit::config::{Config, Secrets};
use membit::{Dispatcher, MembitError, Reply, ReplySink};

/// Membit console bot.
#[derive(Parser)]
#[command(name = "membit")]
#[command(version = membit::PKG_VERSION)]
#[command(about = "Membit crypto sentiment bot (console front-end)")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for chart attachments.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// User name the messages are sent as.
    #[arg(short, long, env = "MEMBIT_USER", default_value = "console")]
    user: String,

    /// Handle a single message and exit (otherwise read lines from stdin).
    #[arg(short, long)]
    message: Option<String>,
}

/// Prints replies and saves attachments.
struct ConsoleSink {
    out_dir: PathBuf,
}

#[async_trait]
impl ReplySink for ConsoleSink {
    async fn send(&self, reply: Reply) -> membit::Result<()> {
        println!("{}", reply.render_text());
        if let Reply::Embed {
            attachment: Some(attachment),
            ..
        } = &reply
        {
            let path = self.out_dir.join(&attachment.filename);
            tokio::fs::write(&path, &attachment.bytes)
                .await
                .map_err(|e| MembitError::Delivery(format!("write {path:?}: {e}")))?;
            println!("[saved {}]", path.display());
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;

    let engine = Arc::new(config.engine_builder(&secrets)?.build()?);
    if !engine.summarizer().is_initialized() {
        warn!("GEMINI_API_KEY not set; !analyze will use the fallback reply");
    }
    let dispatcher = Dispatcher::new(engine.clone(), config.bot_settings());
    let sink = ConsoleSink {
        out_dir: args.out_dir,
    };

    let build = membit::BuildInfo::current();
    info!(version = %build, dirty = build.dirty, "membit starting");

    let outcome = match args.message {
        Some(message) => dispatcher.handle_message(&args.user, &message, &sink).await,
        None => run_stdin(&dispatcher, &args.user, &sink).await,
    };

    if engine.shutdown() {
        info!("http session closed");
    }
    outcome?;
    Ok(())
}

async fn run_stdin(dispatcher: &Dispatcher, user: &str, sink: &ConsoleSink) -> membit::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        dispatcher.handle_message(user, line.trim(), sink).await?;
    }
    Ok(())
}
