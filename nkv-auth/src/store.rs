//! Credential storage and comparison over the namespaced KV client.
//!
//! Logical keys are `"username:" + email`; the KV client adds the
//! service namespace on top. Credentials expire with the client's
//! default TTL, so registrations are valid for a bounded window.

use serde::Serialize;
use tracing::debug;

use nkv_client::KvClient;

/// Prefix distinguishing credential entries inside the namespace.
const KEY_PREFIX: &str = "username:";

/// Outcome of a register or login request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponse {
    pub message: String,
}

impl AuthResponse {
    fn new(message: impl Into<String>) -> Self {
        AuthResponse {
            message: message.into(),
        }
    }
}

/// Authentication business logic over a KV-backed credential table.
///
/// Store failures (connection unavailable, remote operation failure)
/// surface as the response message; a missing credential is not an
/// error, it is a failed login.
pub struct CredentialStore {
    kv: KvClient,
}

impl CredentialStore {
    pub fn new(kv: KvClient) -> Self {
        CredentialStore { kv }
    }

    fn credential_key(email: &str) -> String {
        format!("{KEY_PREFIX}{email}")
    }

    /// Stores the credential under the caller's email.
    pub async fn register(&self, email: &str, password: &str) -> AuthResponse {
        match self.kv.set(&Self::credential_key(email), password).await {
            Ok(()) => AuthResponse::new("Registration successful"),
            Err(err) => AuthResponse::new(err.to_string()),
        }
    }

    /// Compares the supplied password against the stored credential.
    pub async fn login(&self, email: &str, password: &str) -> AuthResponse {
        match self.kv.get(&Self::credential_key(email)).await {
            Ok(stored) => {
                debug!("credential lookup for {email}: present={}", stored.is_some());
                if stored.as_deref() == Some(password) {
                    AuthResponse::new("Authenticated")
                } else {
                    AuthResponse::new("Go away!")
                }
            }
            Err(err) => AuthResponse::new(err.to_string()),
        }
    }

    /// Releases the underlying connection.
    pub async fn disconnect(&self) {
        self.kv.disconnect().await;
    }
}
