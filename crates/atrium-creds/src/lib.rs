//! Atrium Creds - bucket credential broker
//!
//! Resolves a bucket name into the access-key pair the object-access
//! layer uses to sign data-plane requests: discovers which key the
//! control plane granted read+write on the bucket, retrieves that key's
//! secret, and caches the pair with a TTL so the two admin round trips
//! are paid once per bucket per hour, not once per request.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use atrium_admin::{AdminApiConfig, AdminClient};
//! use atrium_creds::CredentialBroker;
//!
//! let admin = Arc::new(AdminClient::new(AdminApiConfig::new(url, token))?);
//! let broker = CredentialBroker::new(admin);
//!
//! let credential = broker.resolve("photos").await?;
//! // credential.access_key_id / credential.secret_access_key
//! ```

pub mod broker;
pub mod cache;
pub mod credential;
pub mod error;

pub use broker::{CredentialBroker, DEFAULT_CREDENTIAL_TTL};
pub use cache::TtlCache;
pub use credential::ResolvedCredential;
pub use error::{CredsError, Result};
