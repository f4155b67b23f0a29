//! Binary crate for the `shell-weather` command-line host.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and loading the configuration file
//! - Driving the weather core (one-shot or scheduled refreshes)
//! - Printing what a panel applet would show

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod icons;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
