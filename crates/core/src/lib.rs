//! sd-core: Core library for the s3dir CLI
//!
//! This crate provides the core functionality for the s3dir CLI, including:
//! - Error taxonomy and exit-code mapping
//! - Key and prefix string handling
//! - ObjectStore trait for the storage primitives
//! - Directory-style session over a flat object store
//! - Credential and client configuration resolution
//!
//! This crate is designed to be independent of any specific S3 SDK,
//! allowing for easy testing and potential future support for other backends.

pub mod config;
pub mod error;
pub mod path;
pub mod session;
pub mod traits;

pub use config::{
    resolve_credentials, ClientConfig, CredentialPrompt, Credentials, RunConfig, StdinPrompt,
    ACCESS_KEY_ENV, DEFAULT_REGION, SECRET_KEY_ENV,
};
pub use error::{Error, Result};
pub use path::{child_segment, normalize_key, normalize_prefix, validate_bucket};
pub use session::Session;
pub use traits::{ListOptions, ListPage, ObjectStat, ObjectStore};
