//! Persistence of merged analysis results to object storage.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

use crate::clients::ClientRegistry;
use crate::config::{StorageConfig, DEFAULT_OUTPUT_PREFIX};
use crate::credentials::AwsCredentials;
use crate::error::AnalysisError;
use crate::models::AnalysisResult;

/// Writes analysis results to the configured bucket.
pub struct ResultStore {
    registry: Arc<ClientRegistry>,
    config: StorageConfig,
}

impl ResultStore {
    pub fn new(registry: Arc<ClientRegistry>, config: StorageConfig) -> Self {
        Self { registry, config }
    }

    /// Serialize `result` as pretty-printed JSON and write it under a
    /// timestamped key. On success the key is recorded on the result and
    /// returned; on failure the storage error propagates and the whole
    /// request fails with it.
    ///
    /// The payload is serialized before `output_key` is set, so the stored
    /// object never references its own key. The timestamp is taken here, at
    /// persistence time; rapid successive calls on a coarse clock can
    /// collide on the same key, in which case the last write wins.
    pub async fn persist(
        &self,
        credentials: &AwsCredentials,
        result: &mut AnalysisResult,
        prefix: Option<&str>,
    ) -> Result<String, AnalysisError> {
        let client = self.registry.storage_client(credentials);
        let key = build_output_key(prefix.unwrap_or(DEFAULT_OUTPUT_PREFIX), Utc::now());
        let body = serde_json::to_vec_pretty(result)?;

        client
            .put_object(&self.config.bucket, &key, body, "application/json")
            .await?;

        result.output_key = Some(key.clone());
        info!(output_key = %key, bucket = %self.config.bucket, "analysis results saved");
        Ok(key)
    }
}

/// Build the storage key `{prefix}/{timestamp}.json`, with ':' and '.'
/// in the ISO-8601 timestamp replaced so the key stays portable.
fn build_output_key(prefix: &str, now: DateTime<Utc>) -> String {
    let timestamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{prefix}/{timestamp}.json")
}
