//! Backend API seams.
//!
//! The registry and orchestrator work against these traits rather than the
//! concrete SDK clients, so tests can substitute in-memory implementations.

use std::sync::Arc;

use async_trait::async_trait;

use crate::credentials::AwsCredentials;
use crate::error::BackendError;
use crate::models::{EntityDetection, PhiDetection};

/// The medical NLP backend: two idempotent request/response operations over
/// raw text.
#[async_trait]
pub trait MedicalAnalysisApi: Send + Sync {
    async fn detect_entities(&self, text: &str) -> Result<EntityDetection, BackendError>;

    async fn detect_phi(&self, text: &str) -> Result<PhiDetection, BackendError>;
}

/// The object-store backend: a single put operation.
#[async_trait]
pub trait ObjectStoreApi: Send + Sync {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError>;
}

/// Constructs live backend handles for a credential bundle.
///
/// The registry calls this on cache misses only; handles it returns are
/// kept for the life of the process.
pub trait ClientFactory: Send + Sync {
    fn analysis_client(&self, credentials: &AwsCredentials) -> Arc<dyn MedicalAnalysisApi>;

    fn storage_client(&self, credentials: &AwsCredentials) -> Arc<dyn ObjectStoreApi>;
}
