//! Stream Resolver - fallback-chained metadata/stream resolution.
//!
//! Given a media identifier and optional title/author/duration hints, this
//! tool queries up to three independent upstream services in priority order
//! (metadata search, then two mirror-instance pools) and returns the first
//! usable result as JSON matching the HTTP response contract.

pub mod api;
pub mod cli;
pub mod config;
pub mod resolver;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("stream_resolver=info".parse()?))
        .init();

    cli::run_command(&args)
}
