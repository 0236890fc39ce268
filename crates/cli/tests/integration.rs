//! Integration tests for the s3dir CLI
//!
//! These tests require a running S3-compatible server and an existing
//! bucket. Remote state is seeded through the library client; the tests
//! then drive the built binary.
//!
//! Run with:
//! ```bash
//! # Start a MinIO container
//! docker run -d --name minio -p 9000:9000 \
//!     -e MINIO_ROOT_USER=accesskey \
//!     -e MINIO_ROOT_PASSWORD=secretkey \
//!     quay.io/minio/minio server /data
//!
//! # Create the test bucket, then run
//! TEST_S3_ENDPOINT=http://127.0.0.1:9000 \
//! TEST_S3_ACCESS_KEY=accesskey \
//! TEST_S3_SECRET_KEY=secretkey \
//! TEST_S3_BUCKET=s3dir-test \
//! cargo test --features integration
//! ```

#![cfg(feature = "integration")]

use std::process::{Command, Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tempfile::TempDir;

use sd_core::{ClientConfig, Credentials, ListOptions, ObjectStore};
use sd_s3::S3Client;

/// S3 test configuration from environment
struct TestConfig {
    endpoint: String,
    access_key: String,
    secret_key: String,
    bucket: String,
}

fn get_test_config() -> Option<TestConfig> {
    Some(TestConfig {
        endpoint: std::env::var("TEST_S3_ENDPOINT").ok()?,
        access_key: std::env::var("TEST_S3_ACCESS_KEY").ok()?,
        secret_key: std::env::var("TEST_S3_SECRET_KEY").ok()?,
        bucket: std::env::var("TEST_S3_BUCKET").ok()?,
    })
}

/// Get the path to the s3dir binary
fn s3dir_binary() -> std::path::PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_s3dir") {
        return std::path::PathBuf::from(path);
    }

    // Try debug first, then release
    let debug = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("target/debug/s3dir");

    if debug.exists() {
        return debug;
    }

    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("target/release/s3dir")
}

/// Run the s3dir binary with explicit arguments and environment
fn run_s3dir(args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(s3dir_binary());
    cmd.args(args);
    cmd.stdin(Stdio::null());

    // Ambient credentials must not leak into the child
    cmd.env_remove("S3_ACCESS_KEY");
    cmd.env_remove("S3_SECRET_KEY");

    for (key, value) in envs {
        cmd.env(key, value);
    }

    cmd.output().expect("Failed to execute s3dir binary")
}

/// Build a library client for seeding and verifying remote state
async fn seed_client(config: &TestConfig) -> Result<S3Client> {
    S3Client::new(ClientConfig {
        credentials: Credentials {
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
        },
        region: "us-east-1".to_string(),
        endpoint_url: Some(config.endpoint.clone()),
        path_style: true,
    })
    .await
    .context("failed to build seed client")
}

/// Wait for the S3 service to respond to list requests
async fn wait_for_ready(client: &S3Client, bucket: &str) -> bool {
    for _ in 0..30 {
        if client
            .list_keys(bucket, "", ListOptions::default())
            .await
            .is_ok()
        {
            return true;
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    false
}

async fn seed(client: &S3Client, bucket: &str, key: &str, data: &[u8]) -> Result<()> {
    client
        .put_object(bucket, key, data.to_vec(), None)
        .await
        .with_context(|| format!("failed to seed {key}"))?;
    Ok(())
}

/// Generate unique suffix for test resources
fn uuid_suffix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{:x}", duration.as_nanos() % 0xFFFFFFFF)
}

/// Standard argument set for one run against a unique prefix
fn run_args<'a>(
    config: &'a TestConfig,
    prefix: &'a str,
    get_key: &'a str,
    put_key: &'a str,
    local: &'a str,
) -> Vec<&'a str> {
    vec![
        "-a",
        &config.access_key,
        "-s",
        &config.secret_key,
        "-b",
        &config.bucket,
        "-d",
        prefix,
        "-g",
        get_key,
        "-p",
        put_key,
        "-l",
        local,
        "--endpoint-url",
        &config.endpoint,
        "--path-style",
    ]
}

#[tokio::test]
async fn test_full_run_round_trip() -> Result<()> {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping: S3 test config not available");
        return Ok(());
    };

    let client = seed_client(&config).await?;
    assert!(
        wait_for_ready(&client, &config.bucket).await,
        "S3 service did not become ready in time"
    );

    let prefix = format!("run-{}", uuid_suffix());
    let get_key = format!("{prefix}/source.bin");
    let put_key = format!("{prefix}/copy.bin");
    seed(&client, &config.bucket, &get_key, b"round trip payload").await?;

    let tmp = TempDir::new()?;
    let local = tmp.path().join("local.bin");
    let local_str = local.to_string_lossy().into_owned();

    let output = run_s3dir(
        &run_args(&config, &prefix, &get_key, &put_key, &local_str),
        &[],
    );
    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    // Download landed locally
    assert_eq!(std::fs::read(&local)?, b"round trip payload");

    // Upload landed remotely with the same bytes
    let uploaded = client.get_object(&config.bucket, &put_key).await?;
    assert_eq!(uploaded, b"round trip payload");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Downloaded"), "stdout: {stdout}");
    assert!(stdout.contains("Uploaded"), "stdout: {stdout}");
    Ok(())
}

#[tokio::test]
async fn test_listing_shows_sorted_child_segments() -> Result<()> {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping: S3 test config not available");
        return Ok(());
    };

    let client = seed_client(&config).await?;
    assert!(
        wait_for_ready(&client, &config.bucket).await,
        "S3 service did not become ready in time"
    );

    let prefix = format!("photos-{}", uuid_suffix());
    let get_key = format!("{prefix}/2020/beach.jpg");
    let put_key = format!("{prefix}/2020/copy.jpg");
    seed(&client, &config.bucket, &get_key, b"jpeg bytes").await?;
    seed(
        &client,
        &config.bucket,
        &format!("{prefix}/2021/hike.jpg"),
        b"jpeg bytes",
    )
    .await?;
    seed(
        &client,
        &config.bucket,
        &format!("{prefix}/2021/lake.jpg"),
        b"jpeg bytes",
    )
    .await?;

    let tmp = TempDir::new()?;
    let local_str = tmp.path().join("pic.jpg").to_string_lossy().into_owned();

    let output = run_s3dir(
        &run_args(&config, &prefix, &get_key, &put_key, &local_str),
        &[],
    );
    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    // Entry lines are indented; each year appears once, in sorted order
    let stdout = String::from_utf8_lossy(&output.stdout);
    let entries: Vec<&str> = stdout
        .lines()
        .filter(|line| line.starts_with("  "))
        .map(str::trim)
        .collect();
    assert_eq!(entries, vec!["2020", "2021"], "stdout: {stdout}");
    Ok(())
}

#[tokio::test]
async fn test_missing_download_key_exits_not_found() -> Result<()> {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping: S3 test config not available");
        return Ok(());
    };

    let client = seed_client(&config).await?;
    assert!(
        wait_for_ready(&client, &config.bucket).await,
        "S3 service did not become ready in time"
    );

    let prefix = format!("gone-{}", uuid_suffix());
    seed(
        &client,
        &config.bucket,
        &format!("{prefix}/present.bin"),
        b"x",
    )
    .await?;

    let tmp = TempDir::new()?;
    let local = tmp.path().join("never.bin");
    let local_str = local.to_string_lossy().into_owned();
    let get_key = format!("{prefix}/absent.bin");
    let put_key = format!("{prefix}/copy.bin");

    let output = run_s3dir(
        &run_args(&config, &prefix, &get_key, &put_key, &local_str),
        &[],
    );
    assert_eq!(output.status.code(), Some(5));
    assert!(!local.exists(), "failed download must not write a local file");
    Ok(())
}

#[tokio::test]
async fn test_json_output_is_machine_readable() -> Result<()> {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping: S3 test config not available");
        return Ok(());
    };

    let client = seed_client(&config).await?;
    assert!(
        wait_for_ready(&client, &config.bucket).await,
        "S3 service did not become ready in time"
    );

    let prefix = format!("json-{}", uuid_suffix());
    let get_key = format!("{prefix}/data.bin");
    let put_key = format!("{prefix}/copy.bin");
    seed(&client, &config.bucket, &get_key, b"json payload").await?;

    let tmp = TempDir::new()?;
    let local_str = tmp.path().join("data.bin").to_string_lossy().into_owned();

    let mut args = run_args(&config, &prefix, &get_key, &put_key, &local_str);
    args.push("--json");
    let output = run_s3dir(&args, &[]);
    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)
        .context("stdout is not a single JSON document")?;
    assert_eq!(report["bucket"], config.bucket.as_str());
    assert_eq!(report["downloaded"]["size_bytes"], 12);
    assert_eq!(report["uploaded"]["key"], put_key.as_str());
    assert_eq!(report["stat"]["size_bytes"], 12);
    assert_eq!(report["is_dir"], true);
    Ok(())
}

#[tokio::test]
async fn test_credentials_fall_back_to_environment() -> Result<()> {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping: S3 test config not available");
        return Ok(());
    };

    let client = seed_client(&config).await?;
    assert!(
        wait_for_ready(&client, &config.bucket).await,
        "S3 service did not become ready in time"
    );

    let prefix = format!("env-{}", uuid_suffix());
    let get_key = format!("{prefix}/data.bin");
    let put_key = format!("{prefix}/copy.bin");
    seed(&client, &config.bucket, &get_key, b"env payload").await?;

    let tmp = TempDir::new()?;
    let local_str = tmp.path().join("data.bin").to_string_lossy().into_owned();

    // No -a/-s flags; the binary must pick the keys up from S3_* variables
    let args = vec![
        "-b",
        config.bucket.as_str(),
        "-d",
        prefix.as_str(),
        "-g",
        get_key.as_str(),
        "-p",
        put_key.as_str(),
        "-l",
        local_str.as_str(),
        "--endpoint-url",
        config.endpoint.as_str(),
        "--path-style",
    ];
    let output = run_s3dir(
        &args,
        &[
            ("S3_ACCESS_KEY", config.access_key.as_str()),
            ("S3_SECRET_KEY", config.secret_key.as_str()),
        ],
    );
    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(())
}

#[tokio::test]
async fn test_bad_credentials_exit_auth_error() -> Result<()> {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping: S3 test config not available");
        return Ok(());
    };

    let client = seed_client(&config).await?;
    assert!(
        wait_for_ready(&client, &config.bucket).await,
        "S3 service did not become ready in time"
    );

    let prefix = format!("auth-{}", uuid_suffix());
    let tmp = TempDir::new()?;
    let local_str = tmp.path().join("x.bin").to_string_lossy().into_owned();
    let get_key = format!("{prefix}/x.bin");
    let put_key = format!("{prefix}/y.bin");

    let args = vec![
        "-a",
        "wrong-access-key",
        "-s",
        "wrong-secret-key",
        "-b",
        config.bucket.as_str(),
        "-d",
        prefix.as_str(),
        "-g",
        get_key.as_str(),
        "-p",
        put_key.as_str(),
        "-l",
        local_str.as_str(),
        "--endpoint-url",
        config.endpoint.as_str(),
        "--path-style",
    ];
    let output = run_s3dir(&args, &[]);
    assert_eq!(
        output.status.code(),
        Some(4),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(())
}
