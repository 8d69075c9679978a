//! Atrium Admin - typed control-plane API client
//!
//! This crate provides typed access to the object-storage cluster's
//! administrative HTTP API for the Atrium console:
//! - JSON wire types for buckets, key grants, and access keys
//! - A bearer-token-authenticated reqwest client
//! - A bounded-attempt retry executor for transient transport failures
//!
//! Only transport-level failures (connection refused/reset, timeout, DNS)
//! are retried. Any received HTTP response is terminal: mutating admin
//! calls are not safely repeatable, and control-plane 4xx/5xx responses
//! are deterministic for a given request.
//!
//! # Example
//!
//! ```rust,ignore
//! use atrium_admin::{AdminApi, AdminApiConfig, AdminClient};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = AdminApiConfig::new("http://localhost:3903", "admin-token");
//! let client = AdminClient::new(config)?;
//!
//! let cancel = CancellationToken::new();
//! let info = client.bucket_info_by_global_alias("photos", &cancel).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod retry;
pub mod types;

pub use client::{AdminApi, AdminClient};
pub use config::AdminApiConfig;
pub use error::{AdminError, Result};
pub use retry::RetryConfig;
pub use types::{BucketInfo, BucketKeyGrant, KeyInfo, KeyPermissions};
