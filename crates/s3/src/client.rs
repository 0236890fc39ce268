//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from sd-core.

use async_trait::async_trait;
use aws_smithy_types::error::display::DisplayErrorContext;

use sd_core::{ClientConfig, Error, ListOptions, ListPage, ObjectStat, ObjectStore, Result};

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client from resolved connection parameters
    pub async fn new(config: ClientConfig) -> Result<Self> {
        let ClientConfig {
            credentials,
            region,
            endpoint_url,
            path_style,
        } = config;

        // Build credentials provider
        let credentials = aws_credential_types::Credentials::new(
            credentials.access_key,
            credentials.secret_key,
            None, // session token
            None, // expiry
            "s3dir-static-credentials",
        );

        // Build SDK config
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(region));

        if let Some(endpoint) = endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;

        // Path-style addressing for S3-compatible endpoints
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(path_style)
            .build();

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

/// Render the full SDK error chain, service error code included
fn error_text<E>(err: E) -> String
where
    E: std::error::Error,
{
    format!("{}", DisplayErrorContext(err))
}

/// Map a rendered SDK error onto the core taxonomy
///
/// The service error code appears in the rendered chain; anything that is
/// neither a missing object nor a credential rejection counts as a network
/// failure.
fn map_sdk_error(what: &str, message: String) -> Error {
    if message.contains("NotFound")
        || message.contains("NoSuchKey")
        || message.contains("NoSuchBucket")
    {
        Error::NotFound(what.to_string())
    } else if message.contains("AccessDenied")
        || message.contains("InvalidAccessKeyId")
        || message.contains("SignatureDoesNotMatch")
    {
        Error::Auth(message)
    } else {
        Error::Network(message)
    }
}

/// ETags arrive wrapped in quotes; store them bare
fn trim_etag(etag: &str) -> String {
    etag.trim_matches('"').to_string()
}

/// Convert an SDK timestamp, dropping subsecond precision
fn timestamp_from_sdk(dt: &aws_smithy_types::DateTime) -> Option<jiff::Timestamp> {
    jiff::Timestamp::from_second(dt.secs()).ok()
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(&format!("{bucket}/{key}"), error_text(e)))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Network(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectStat> {
        let size = data.len() as i64;
        let body = aws_sdk_s3::primitives::ByteStream::from(data);

        let mut request = self.inner.put_object().bucket(bucket).key(key).body(body);

        if let Some(ct) = &content_type {
            request = request.content_type(ct);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_sdk_error(&format!("{bucket}/{key}"), error_text(e)))?;

        let mut stat = ObjectStat::new(key, size);
        stat.etag = response.e_tag().map(trim_etag);
        stat.content_type = content_type;
        Ok(stat)
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectStat> {
        let response = self
            .inner
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(&format!("{bucket}/{key}"), error_text(e)))?;

        let mut stat = ObjectStat::new(key, response.content_length().unwrap_or(0));

        if let Some(modified) = response.last_modified() {
            stat.last_modified = timestamp_from_sdk(modified);
        }

        if let Some(etag) = response.e_tag() {
            stat.etag = Some(trim_etag(etag));
        }

        if let Some(ct) = response.content_type() {
            stat.content_type = Some(ct.to_string());
        }

        Ok(stat)
    }

    async fn list_keys(
        &self,
        bucket: &str,
        prefix: &str,
        options: ListOptions,
    ) -> Result<ListPage> {
        let mut request = self.inner.list_objects_v2().bucket(bucket);

        if !prefix.is_empty() {
            request = request.prefix(prefix);
        }

        if let Some(max) = options.max_keys {
            request = request.max_keys(max);
        }

        if let Some(token) = &options.continuation_token {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_sdk_error(&format!("{bucket}/{prefix}"), error_text(e)))?;

        let keys = response
            .contents()
            .iter()
            .filter_map(|o| o.key().map(|k| k.to_string()))
            .collect();

        Ok(ListPage {
            keys,
            truncated: response.is_truncated().unwrap_or(false),
            continuation_token: response.next_continuation_token().map(|s| s.to_string()),
        })
    }
}
