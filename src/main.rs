mod api;
mod gateway;

use clap::{Parser, Subcommand};
use mbot_channels::line::LineChannel;
use mbot_core::{config, shellexpand, traits::Channel};
use mbot_memory::{AuditLogger, Store};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "mbot", version, about = "mbot — check-in ledger for LINE conversations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, env = "MBOT_CONFIG", default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server.
    Start,
    /// Show configuration and store status.
    Status,
    /// Run one message against a conversation's stored ledger and print the reply.
    Exec {
        /// Conversation to run against.
        #[arg(long)]
        conversation: String,
        /// The message text.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load(&cli.config)?;
    cfg.apply_env_overrides()?;

    let _guard = init_logging(&cfg.mbot.data_dir, &cfg.mbot.log_level)?;

    match cli.command {
        Commands::Start => {
            if !cfg.line.enabled {
                anyhow::bail!("LINE is disabled. Enable [line] in config.toml.");
            }
            if cfg.line.channel_access_token.is_empty() {
                anyhow::bail!(
                    "LINE is enabled but channel_access_token is empty. \
                     Set it in config.toml or CHANNEL_ACCESS_TOKEN env var."
                );
            }
            if cfg.line.channel_secret.is_empty() {
                warn!("channel_secret is empty: webhook signatures will not be checked");
            }

            let store = Store::new(&cfg.memory).await?;
            let audit = AuditLogger::new(store.pool().clone());

            let channels: Vec<Arc<dyn Channel>> =
                vec![Arc::new(LineChannel::new(cfg.line.clone()))];

            let gw = Arc::new(gateway::Gateway::new(
                Arc::new(store),
                channels,
                Some(audit),
                cfg.ledger.limits(),
                cfg.ledger.serialize_conversations,
            ));

            info!(
                "{} starting (channels: {})",
                cfg.mbot.name,
                gw.channel_names().join(", ")
            );
            let state = api::ApiState::new(gw, &cfg.line.channel_secret);
            api::serve(&cfg.api, state).await?;
        }
        Commands::Status => {
            println!("mbot — Status Check\n");
            println!("Config: {}", cli.config);
            println!("Database: {}", shellexpand(&cfg.memory.db_path));
            println!("Listen: {}:{}", cfg.api.host, cfg.api.port);
            println!(
                "Serialize conversations: {}",
                cfg.ledger.serialize_conversations
            );
            println!();

            println!(
                "  line: {}",
                if !cfg.line.enabled {
                    "disabled"
                } else if cfg.line.channel_access_token.is_empty() {
                    "enabled but missing channel_access_token"
                } else if cfg.line.channel_secret.is_empty() {
                    "configured (no channel_secret, signatures unchecked)"
                } else {
                    "configured"
                }
            );

            let store = Store::new(&cfg.memory).await?;
            println!("  conversations: {}", store.conversation_count().await?);
        }
        Commands::Exec {
            conversation,
            message,
        } => {
            if message.is_empty() {
                anyhow::bail!(
                    "no message provided. Usage: mbot exec --conversation <id> <message>"
                );
            }
            let text = message.join(" ");

            let store = Store::new(&cfg.memory).await?;
            let gw = gateway::Gateway::new(
                Arc::new(store),
                Vec::new(),
                None,
                cfg.ledger.limits(),
                cfg.ledger.serialize_conversations,
            );

            let applied = gw.apply(&conversation, &text).await?;
            match applied.result.reply {
                Some(reply) => println!("{reply}"),
                None => println!("(no reply)"),
            }
        }
    }

    Ok(())
}

/// Log to stderr and to `{data_dir}/logs/mbot.log`.
///
/// `RUST_LOG` takes precedence over the configured level. The returned guard
/// must stay alive for buffered file output to be flushed.
fn init_logging(data_dir: &str, level: &str) -> anyhow::Result<WorkerGuard> {
    let log_dir = std::path::PathBuf::from(shellexpand(data_dir)).join("logs");
    std::fs::create_dir_all(&log_dir)
        .map_err(|e| anyhow::anyhow!("failed to create {}: {e}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "mbot.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    Ok(guard)
}
