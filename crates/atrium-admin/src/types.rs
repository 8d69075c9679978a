//! Wire types for the control-plane admin API.
//!
//! Field names follow the control plane's camelCase JSON. Unknown fields
//! are ignored so the console stays compatible across control-plane
//! versions.

use serde::{Deserialize, Serialize};

/// Permission flags of one access key on one bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyPermissions {
    pub read: bool,
    pub write: bool,
    pub owner: bool,
}

/// One access key granted on a bucket.
///
/// The control plane returns grants in a stable order; that order is
/// significant downstream (first eligible grant wins), so it is preserved
/// here verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketKeyGrant {
    pub access_key_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub permissions: KeyPermissions,
}

/// Bucket metadata as returned by `GET /v1/bucket?globalAlias=...`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketInfo {
    pub id: String,
    #[serde(default)]
    pub global_aliases: Vec<String>,
    #[serde(default)]
    pub keys: Vec<BucketKeyGrant>,
}

/// Access key metadata as returned by `GET /v1/key?id=...`.
///
/// `secret_access_key` is only populated when the request asked for it
/// with `showSecretKey=true`; `Debug` redacts it either way.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInfo {
    pub access_key_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
}

impl std::fmt::Debug for KeyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyInfo")
            .field("access_key_id", &self.access_key_id)
            .field("name", &self.name)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
