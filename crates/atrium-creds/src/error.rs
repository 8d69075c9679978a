//! Credential broker error types.

use atrium_admin::AdminError;
use thiserror::Error;

/// Result type for credential broker operations
pub type Result<T> = std::result::Result<T, CredsError>;

/// Errors produced by the credential broker.
///
/// Every variant means "this bucket cannot be accessed right now"; the
/// broker never substitutes empty or partial credentials on any error
/// path.
#[derive(Debug, Error)]
pub enum CredsError {
    /// No key granted on the bucket carries both read and write
    #[error("no access key with read+write permission granted on bucket {bucket}")]
    NoEligibleCredential { bucket: String },

    /// A grant was selected but its secret could not be obtained
    #[error("secret for access key {key_id} is unavailable")]
    SecretUnavailable { key_id: String },

    /// The control-plane client failed
    #[error(transparent)]
    Admin(#[from] AdminError),
}
