//! AWS credential bundle resolved by the hosting environment.

use serde::Deserialize;

/// Credentials and region for the downstream AWS calls.
///
/// Used only to key the client cache and to sign requests; never written
/// into results or persisted output. An empty bundle is valid here and
/// surfaces as an authentication failure from the backend, not from this
/// layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub session_token: Option<String>,
}

impl AwsCredentials {
    /// Region to bind clients to, falling back to the default region when
    /// the bundle does not carry one.
    pub fn region_or_default(&self) -> &str {
        if self.region.is_empty() {
            DEFAULT_REGION
        } else {
            &self.region
        }
    }

    /// Read credentials from the standard AWS environment variables.
    pub fn from_env() -> Self {
        Self {
            access_key_id: std::env::var("AWS_ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
            region: std::env::var("AWS_REGION")
                .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
                .unwrap_or_default(),
            session_token: std::env::var("AWS_SESSION_TOKEN").ok(),
        }
    }
}

/// Region used when the credential bundle leaves it unset.
pub const DEFAULT_REGION: &str = "us-east-1";
