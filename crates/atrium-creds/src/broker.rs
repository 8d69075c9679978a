//! Bucket-to-credential resolution with TTL caching and single-flight
//! miss handling.

use std::sync::Arc;
use std::time::Duration;

use atrium_admin::{AdminApi, AdminError};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::cache::TtlCache;
use crate::credential::ResolvedCredential;
use crate::error::{CredsError, Result};

/// Tracing target for broker operations
pub const TRACING_TARGET: &str = "atrium_creds::broker";

/// Default lifetime of a cached credential pair
pub const DEFAULT_CREDENTIAL_TTL: Duration = Duration::from_secs(3_600);

/// Resolves bucket names into data-plane credential pairs.
///
/// Resolution is two control-plane calls: bucket info (to learn which
/// keys are granted and with what permissions), then key info with the
/// secret revealed. Results are cached for [`DEFAULT_CREDENTIAL_TTL`];
/// within that window the pair is trusted even if the key is revoked or
/// its permissions edited on the control plane — key-mutating console
/// operations call [`invalidate`](Self::invalidate) to bound that
/// staleness.
///
/// Concurrent misses for the same bucket are deduplicated: one task
/// performs the resolution while the others wait and reuse its cache
/// write.
pub struct CredentialBroker {
    admin: Arc<dyn AdminApi>,
    cache: TtlCache<ResolvedCredential>,
    ttl: Duration,
    /// Per-bucket gates serializing cache-miss resolution
    inflight: DashMap<String, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for CredentialBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialBroker")
            .field("ttl", &self.ttl)
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl CredentialBroker {
    /// Create a broker with the default credential TTL
    pub fn new(admin: Arc<dyn AdminApi>) -> Self {
        Self::with_ttl(admin, DEFAULT_CREDENTIAL_TTL)
    }

    /// Create a broker with a custom credential TTL
    pub fn with_ttl(admin: Arc<dyn AdminApi>, ttl: Duration) -> Self {
        Self {
            admin,
            cache: TtlCache::new(),
            ttl,
            inflight: DashMap::new(),
        }
    }

    fn cache_key(bucket: &str) -> String {
        format!("key:{bucket}")
    }

    /// Resolve the credential pair granted read+write on `bucket`.
    ///
    /// Cache hits return without touching the network. See
    /// [`resolve_with_cancel`](Self::resolve_with_cancel) for the
    /// cancellation-aware variant.
    pub async fn resolve(&self, bucket: &str) -> Result<ResolvedCredential> {
        self.resolve_with_cancel(bucket, &CancellationToken::new())
            .await
    }

    /// Resolve with a caller-supplied cancellation signal.
    ///
    /// Cancellation promptly aborts whatever the resolution is blocked
    /// on, including the wait behind a concurrent resolution of the same
    /// bucket; a cancelled resolution never populates the cache.
    pub async fn resolve_with_cancel(
        &self,
        bucket: &str,
        cancel: &CancellationToken,
    ) -> Result<ResolvedCredential> {
        let cache_key = Self::cache_key(bucket);

        if let Some(credential) = self.cache.get(&cache_key) {
            tracing::debug!(target: TRACING_TARGET, bucket, "credential cache hit");
            return Ok(credential);
        }

        // Single-flight: the first miss resolves, concurrent misses for
        // the same bucket wait here and reuse its cache write. The wait
        // itself is cancellable; the winner's resolution may span backoff
        // sleeps, and a cancelled waiter must not sit through them.
        let gate = self
            .inflight
            .entry(cache_key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let held = tokio::select! {
            () = cancel.cancelled() => return Err(AdminError::Cancelled.into()),
            held = gate.lock() => held,
        };

        if let Some(credential) = self.cache.get(&cache_key) {
            tracing::debug!(
                target: TRACING_TARGET,
                bucket,
                "credential resolved by concurrent caller"
            );
            return Ok(credential);
        }

        let resolved = self.resolve_uncached(bucket, cancel).await;
        if let Ok(credential) = &resolved {
            self.cache.insert(cache_key.clone(), credential.clone(), self.ttl);
        }

        drop(held);
        // Drop the gate once no other task holds it; a fresh miss after
        // expiry will recreate it.
        self.inflight
            .remove_if(&cache_key, |_, gate| Arc::strong_count(gate) == 1);

        resolved
    }

    /// Perform the two-call resolution, bypassing the cache.
    async fn resolve_uncached(
        &self,
        bucket: &str,
        cancel: &CancellationToken,
    ) -> Result<ResolvedCredential> {
        let info = self
            .admin
            .bucket_info_by_global_alias(bucket, cancel)
            .await?;

        // First grant with both read and write, in control-plane order.
        // The order is the deterministic tie-break; read-only, write-only,
        // and owner-only grants are skipped.
        let grant = info
            .keys
            .iter()
            .find(|grant| grant.permissions.read && grant.permissions.write)
            .ok_or_else(|| CredsError::NoEligibleCredential {
                bucket: bucket.to_string(),
            })?;

        let key = self.admin.key_info(&grant.access_key_id, true, cancel).await?;
        let secret = key
            .secret_access_key
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| CredsError::SecretUnavailable {
                key_id: grant.access_key_id.clone(),
            })?;

        tracing::debug!(
            target: TRACING_TARGET,
            bucket,
            access_key_id = %key.access_key_id,
            "resolved bucket credential"
        );

        Ok(ResolvedCredential {
            access_key_id: key.access_key_id,
            secret_access_key: secret,
        })
    }

    /// Drop the cached credential for `bucket`.
    ///
    /// Key-mutating admin operations (key update/delete, grant edits) call
    /// this synchronously so staleness is bounded by the mutation, not by
    /// the passive TTL window.
    pub fn invalidate(&self, bucket: &str) {
        self.cache.invalidate(&Self::cache_key(bucket));
        tracing::debug!(target: TRACING_TARGET, bucket, "credential cache invalidated");
    }

    /// Whether a fresh credential for `bucket` is currently cached
    #[must_use]
    pub fn is_cached(&self, bucket: &str) -> bool {
        self.cache.get(&Self::cache_key(bucket)).is_some()
    }
}
