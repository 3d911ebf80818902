//! CLI command definitions and handlers.
//!
//! Each subcommand is implemented as a function that takes the parsed
//! arguments and returns an `anyhow::Result<()>`. The `resolve` command
//! goes through the same [`crate::api::handle`] path an HTTP front end
//! would, so its JSON output matches the wire contract exactly.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;
use tracing::info;

use crate::api::{self, ApiRequest};
use crate::config::{self, Config};
use crate::resolver::Resolver;

/// Stream Resolver CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a media identifier to a stream location/metadata
    Resolve {
        /// External video identifier
        id: String,
        /// Track title (enables metadata search)
        #[arg(long)]
        title: Option<String>,
        /// Artist name(s), comma/ampersand separated
        #[arg(long)]
        author: Option<String>,
        /// Expected duration in seconds (with --author, enables strict scoring)
        #[arg(long)]
        duration: Option<u32>,
    },
    /// Print the configured endpoint pools
    Instances,
    /// Write the built-in defaults to the config file
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the parsed command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Resolve {
            id,
            title,
            author,
            duration,
        } => resolve(id, title.as_deref(), author.as_deref(), *duration),
        Commands::Instances => instances(),
        Commands::InitConfig { force } => init_config(*force),
    }
}

fn resolve(
    id: &str,
    title: Option<&str>,
    author: Option<&str>,
    duration: Option<u32>,
) -> anyhow::Result<()> {
    let config = config::load();
    let resolver = Resolver::from_config(&config);

    let mut params = vec![("id".to_string(), id.to_string())];
    if let Some(title) = title {
        params.push(("title".to_string(), title.to_string()));
    }
    if let Some(author) = author {
        params.push(("author".to_string(), author.to_string()));
    }
    if let Some(duration) = duration {
        params.push(("duration".to_string(), duration.to_string()));
    }

    let runtime = Runtime::new().context("failed to start async runtime")?;
    let response = runtime.block_on(api::handle(&resolver, &ApiRequest::get(params)));

    if let Some(body) = &response.body {
        println!("{}", serde_json::to_string_pretty(body)?);
    }
    if response.status != 200 {
        bail!("resolution failed (HTTP {})", response.status);
    }
    Ok(())
}

fn instances() -> anyhow::Result<()> {
    let config = config::load();

    println!("saavn (timeout {} ms):", config.saavn.timeout_ms);
    for url in &config.saavn.base_urls {
        println!("  {url}");
    }
    for (name, pool) in [
        ("instanceA", &config.instance_a),
        ("instanceB", &config.instance_b),
    ] {
        println!(
            "{name} ({} , timeout {} ms):",
            pool.path_template, pool.timeout_ms
        );
        for url in &pool.base_urls {
            println!("  {url}");
        }
    }
    Ok(())
}

fn init_config(force: bool) -> anyhow::Result<()> {
    if let Some(path) = config::config_path()
        && path.exists()
        && !force
    {
        bail!("config file already exists at {path:?} (use --force to overwrite)");
    }

    config::save(&Config::builtin()).context("failed to write config file")?;
    info!("wrote default config");
    Ok(())
}
