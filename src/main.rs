//! combatd - tabletop combat tracker daemon

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use combatd::{Config, Server};
use figment::providers::Serialized;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Command line flags; anything given here overrides file and environment
#[derive(Parser, Debug, Serialize)]
#[command(name = "combatd", version, about = "Tabletop combat tracker server")]
struct Args {
    /// Address to listen on
    #[arg(short, long)]
    #[serde(rename = "bind_addr", skip_serializing_if = "Option::is_none")]
    bind: Option<SocketAddr>,

    /// SQLite database file (in-memory if unset)
    #[arg(short, long)]
    #[serde(rename = "db_path", skip_serializing_if = "Option::is_none")]
    database: Option<String>,

    /// Config file (defaults to ./combatd.toml if present)
    #[arg(short, long)]
    #[serde(skip)]
    config: Option<PathBuf>,

    /// Seed the dice for reproducible rolls
    #[arg(long)]
    #[serde(rename = "dice_seed", skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,

    /// Reject malformed dice expressions
    #[arg(long)]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    strict_dice: bool,

    /// Reject reorders that leave out combatants
    #[arg(long)]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    strict_reorder: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config: Config = Config::figment(args.config.as_deref())
        .merge(Serialized::defaults(&args))
        .extract()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "combatd=info,tower_http=debug".into());
    let fmt_layer = if config.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    let server = Server::new(config).await?;
    server.run().await?;

    Ok(())
}
