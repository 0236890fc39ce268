//! Configuration types and credential resolution
//!
//! Nothing here is persisted. Credentials resolve once per run from an
//! explicit flag value, then the environment, then an interactive prompt;
//! prompting sits behind a trait so tests can inject replies.

use crate::error::Result;

/// Environment variable for the access key ID
pub const ACCESS_KEY_ENV: &str = "S3_ACCESS_KEY";

/// Environment variable for the secret access key
pub const SECRET_KEY_ENV: &str = "S3_SECRET_KEY";

/// Default AWS region
pub const DEFAULT_REGION: &str = "us-east-1";

/// Resolved credential pair
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,
}

/// Connection parameters for the S3 client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Resolved credentials
    pub credentials: Credentials,

    /// AWS region
    pub region: String,

    /// Custom endpoint URL (AWS default when None)
    pub endpoint_url: Option<String>,

    /// Force path-style bucket addressing
    pub path_style: bool,
}

/// Bucket and path parameters for one demonstration run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Bucket for the run
    pub bucket_name: String,

    /// Remote prefix to list and cd into
    pub dir_path: String,

    /// Local file path (download target and upload source)
    pub local_path: String,

    /// Remote key to download
    pub download_path: String,

    /// Remote key to upload to
    pub upload_path: String,
}

/// Source of interactively supplied credential values
pub trait CredentialPrompt {
    /// Ask for a value; the message names the credential being requested
    fn prompt(&self, message: &str) -> Result<String>;
}

/// Prompt written to stderr; the reply is one line read from stdin
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl CredentialPrompt for StdinPrompt {
    fn prompt(&self, message: &str) -> Result<String> {
        use std::io::Write;

        let mut stderr = std::io::stderr();
        write!(stderr, "{message}")?;
        stderr.flush()?;

        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Resolve the credential pair: flag value, then environment, then prompt
pub fn resolve_credentials(
    access_key: Option<String>,
    secret_key: Option<String>,
    prompt: &dyn CredentialPrompt,
) -> Result<Credentials> {
    let access_key = pick(
        access_key,
        env_var(ACCESS_KEY_ENV),
        "Enter the access key: ",
        prompt,
    )?;
    let secret_key = pick(
        secret_key,
        env_var(SECRET_KEY_ENV),
        "Enter the secret key: ",
        prompt,
    )?;
    Ok(Credentials {
        access_key,
        secret_key,
    })
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Precedence for one credential value; empty environment values count as unset
fn pick(
    flag: Option<String>,
    env: Option<String>,
    message: &str,
    prompt: &dyn CredentialPrompt,
) -> Result<String> {
    match flag.or(env.filter(|v| !v.is_empty())) {
        Some(value) => Ok(value),
        None => prompt.prompt(message),
    }
}
