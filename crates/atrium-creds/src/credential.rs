//! Resolved data-plane credentials.

/// An access-key pair usable to sign data-plane requests.
///
/// The secret never appears in `Debug` output. Within the broker's cache
/// TTL the pair is trusted even if the control plane has since revoked
/// the key or edited its permissions; key-mutating operations should call
/// [`CredentialBroker::invalidate`](crate::CredentialBroker::invalidate)
/// to bound that window.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedCredential {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for ResolvedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCredential")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let credential = ResolvedCredential {
            access_key_id: "GK1".into(),
            secret_access_key: "s3cr3t".into(),
        };
        let debug = format!("{credential:?}");
        assert!(debug.contains("GK1"));
        assert!(!debug.contains("s3cr3t"), "secret leaked: {debug}");
    }
}
