//! CLI definition and top-level execution
//!
//! Parses flags with environment fallback for the non-secret settings,
//! resolves credentials, constructs the client, and hands the session to the
//! runner.

use clap::Parser;

use sd_core::{resolve_credentials, ClientConfig, RunConfig, Session, StdinPrompt, DEFAULT_REGION};
use sd_s3::S3Client;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};
use crate::runner;

/// s3dir - directory-style S3 CLI client
///
/// Wraps an S3-compatible object store behind directory-style operations and
/// drives a fixed demonstration sequence: ls, cd, get, put, stat, is-dir.
#[derive(Parser, Debug)]
#[command(name = "s3dir")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Access key ID (falls back to S3_ACCESS_KEY, then an interactive prompt)
    #[arg(short = 'a', long)]
    pub access_key: Option<String>,

    /// Secret access key (falls back to S3_SECRET_KEY, then an interactive prompt)
    #[arg(short = 's', long)]
    pub secret_key: Option<String>,

    /// Bucket for the run
    #[arg(short = 'b', long, env = "S3_BUCKET_NAME")]
    pub bucket_name: String,

    /// Remote prefix to list and cd into
    #[arg(short = 'd', long, env = "S3_DIR_PATH")]
    pub dir_path: String,

    /// Local file path, used as download target and upload source
    #[arg(short = 'l', long, env = "S3_LOCAL_PATH")]
    pub local_path: String,

    /// Remote key to download
    #[arg(short = 'g', long, env = "S3_DOWNLOAD_PATH")]
    pub get_path: String,

    /// Remote key to upload to
    #[arg(short = 'p', long, env = "S3_UPLOAD_PATH")]
    pub put_path: String,

    /// Custom S3 endpoint URL (AWS default when unset)
    #[arg(long, env = "S3_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// AWS region
    #[arg(long, env = "S3_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Force path-style bucket addressing
    #[arg(long, env = "S3_FORCE_PATH_STYLE")]
    pub path_style: bool,

    /// Output a single JSON document instead of human-readable text
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, default_value = "false")]
    pub no_color: bool,

    /// Disable progress indication
    #[arg(long, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub debug: bool,
}

/// Resolve configuration, build the client, and drive the run
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };
    let formatter = Formatter::new(output_config.clone());

    let credentials = match resolve_credentials(cli.access_key, cli.secret_key, &StdinPrompt) {
        Ok(creds) => creds,
        Err(e) => {
            formatter.error(&format!("Failed to resolve credentials: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    let client_config = ClientConfig {
        credentials,
        region: cli.region,
        endpoint_url: cli.endpoint_url,
        path_style: cli.path_style,
    };

    let run_config = RunConfig {
        bucket_name: cli.bucket_name,
        dir_path: cli.dir_path,
        local_path: cli.local_path,
        download_path: cli.get_path,
        upload_path: cli.put_path,
    };

    let client = match S3Client::new(client_config).await {
        Ok(client) => client,
        Err(e) => {
            formatter.error(&format!("Failed to create S3 client: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    // The bucket context is set up front so the first ls (which runs before
    // cd) already has a bucket to list in.
    let session = Session::with_context(client, run_config.bucket_name.as_str(), "");

    runner::run(session, &run_config, &output_config).await
}
