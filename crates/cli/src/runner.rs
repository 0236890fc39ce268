//! The demonstration run
//!
//! Drives the fixed sequence against a session: ls, cd, get, put, stat,
//! is-dir. Human-readable output is printed progressively; with --json a
//! single document describing the whole run is emitted at the end. The
//! first failing step aborts the run with the error's exit code.

use std::path::Path;

use humansize::{format_size, BINARY};
use serde::Serialize;

use sd_core::{normalize_prefix, ObjectStat, ObjectStore, RunConfig, Session};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressBar};

/// Report of one full run, emitted as the JSON document
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Bucket every step ran against
    pub bucket: String,

    /// Child segments under the dir path
    pub listing: Vec<String>,

    /// Context prefix after cd
    pub prefix: String,

    /// Download result
    pub downloaded: Transfer,

    /// Upload result
    pub uploaded: Transfer,

    /// Metadata of the downloaded key
    pub stat: ObjectStat,

    /// Whether the dir path names a directory
    pub is_dir: bool,
}

/// One completed transfer
#[derive(Debug, Serialize)]
pub struct Transfer {
    /// Remote key
    pub key: String,

    /// Local file path
    pub local_path: String,

    /// Transferred bytes
    pub size_bytes: i64,

    /// Human-readable size
    pub size_human: String,
}

/// Execute the demonstration sequence and return an exit code
pub async fn run<S: ObjectStore>(
    mut session: Session<S>,
    config: &RunConfig,
    output_config: &OutputConfig,
) -> ExitCode {
    let formatter = Formatter::new(output_config.clone());
    let bucket = &config.bucket_name;

    // 1. List the directory
    let listing = match session.ls(Some(&config.dir_path)).await {
        Ok(entries) => entries,
        Err(e) => {
            formatter.error(&format!("Failed to list {}: {e}", config.dir_path));
            return ExitCode::from_error(&e);
        }
    };
    if !formatter.is_json() {
        formatter.println(&format!("{}:", normalize_prefix(&config.dir_path)));
        for entry in &listing {
            formatter.println(&format!("  {entry}"));
        }
    }

    // 2. Change context
    session.cd(bucket.as_str(), &config.dir_path);
    if !formatter.is_json() {
        formatter.println(&format!(
            "Context: {}/{}",
            session.bucket(),
            session.prefix()
        ));
    }

    // 3. Download
    let spinner = ProgressBar::spinner(
        output_config,
        &format!("Downloading {}", config.download_path),
    );
    let downloaded = session
        .get(bucket, &config.download_path, Path::new(&config.local_path))
        .await;
    spinner.finish_and_clear();
    let downloaded_bytes = match downloaded {
        Ok(bytes) => bytes,
        Err(e) => {
            formatter.error(&format!("Failed to download {}: {e}", config.download_path));
            return ExitCode::from_error(&e);
        }
    };
    if !formatter.is_json() {
        formatter.println(&format!(
            "Downloaded {} -> {} ({})",
            config.download_path,
            config.local_path,
            format_size(downloaded_bytes, BINARY)
        ));
    }

    // 4. Upload
    let spinner = ProgressBar::spinner(
        output_config,
        &format!("Uploading {}", config.upload_path),
    );
    let uploaded = session
        .put(bucket, &config.upload_path, Path::new(&config.local_path))
        .await;
    spinner.finish_and_clear();
    let uploaded = match uploaded {
        Ok(stat) => stat,
        Err(e) => {
            formatter.error(&format!("Failed to upload {}: {e}", config.upload_path));
            return ExitCode::from_error(&e);
        }
    };
    if !formatter.is_json() {
        formatter.println(&format!(
            "Uploaded {} -> {} ({})",
            config.local_path,
            config.upload_path,
            format_size(uploaded.size_bytes as u64, BINARY)
        ));
    }

    // 5. Stat the downloaded key
    let stat = match session.stat(bucket, &config.download_path).await {
        Ok(stat) => stat,
        Err(e) => {
            formatter.error(&format!("Failed to stat {}: {e}", config.download_path));
            return ExitCode::from_error(&e);
        }
    };
    if !formatter.is_json() {
        print_stat(&formatter, &stat);
    }

    // 6. Directory check
    let is_dir = match session.is_dir(bucket, &config.dir_path).await {
        Ok(flag) => flag,
        Err(e) => {
            formatter.error(&format!("Failed to check {}: {e}", config.dir_path));
            return ExitCode::from_error(&e);
        }
    };
    if !formatter.is_json() {
        formatter.println(&format!(
            "{} is a directory: {is_dir}",
            normalize_prefix(&config.dir_path)
        ));
    }

    let report = RunReport {
        bucket: config.bucket_name.clone(),
        listing,
        prefix: session.prefix().to_string(),
        downloaded: Transfer {
            key: config.download_path.clone(),
            local_path: config.local_path.clone(),
            size_bytes: downloaded_bytes as i64,
            size_human: format_size(downloaded_bytes, BINARY),
        },
        uploaded: Transfer {
            key: uploaded.key.clone(),
            local_path: config.local_path.clone(),
            size_bytes: uploaded.size_bytes,
            size_human: format_size(uploaded.size_bytes as u64, BINARY),
        },
        stat,
        is_dir,
    };

    if formatter.is_json() {
        formatter.json(&report);
    } else {
        formatter.success("Run complete.");
    }

    ExitCode::Success
}

fn print_stat(formatter: &Formatter, stat: &ObjectStat) {
    formatter.kv("Name", &stat.key);
    if let Some(modified) = &stat.last_modified {
        formatter.kv(
            "Date",
            &modified.strftime("%Y-%m-%d %H:%M:%S UTC").to_string(),
        );
    }
    formatter.kv(
        "Size",
        &format!(
            "{} ({} bytes)",
            format_size(stat.size_bytes as u64, BINARY),
            stat.size_bytes
        ),
    );
    if let Some(etag) = &stat.etag {
        formatter.kv("ETag", etag);
    }
    if let Some(ct) = &stat.content_type {
        formatter.kv("Type", ct);
    }
}
