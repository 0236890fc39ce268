//! s3dir - directory-style S3 CLI client
//!
//! A thin command-line wrapper over S3-compatible object storage that
//! treats key prefixes as directories.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod exit_code;
mod output;
mod runner;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so --json output on stdout stays parseable
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = cli::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
