//! Process-wide cache of backend client handles.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::clients::api::{ClientFactory, MedicalAnalysisApi, ObjectStoreApi};
use crate::credentials::AwsCredentials;

/// Lazily creates and caches one live client per (access key, region) pair
/// for each backend service.
///
/// Entries live for the life of the process; the identity space per process
/// is small and stable, so there is no eviction. Concurrent resolution of
/// the same key may race and build an extra handle; the last insert wins
/// and the loser becomes unreachable, which is harmless since the handles
/// are interchangeable. No lock is held across a network call.
pub struct ClientRegistry {
    factory: Box<dyn ClientFactory>,
    analysis: RwLock<HashMap<String, Arc<dyn MedicalAnalysisApi>>>,
    storage: RwLock<HashMap<String, Arc<dyn ObjectStoreApi>>>,
}

impl ClientRegistry {
    /// Registry backed by the given factory. Tests pass a mock factory to
    /// get an isolated instance; production code passes
    /// [`AwsClientFactory`](crate::clients::AwsClientFactory).
    pub fn new(factory: Box<dyn ClientFactory>) -> Self {
        Self {
            factory,
            analysis: RwLock::new(HashMap::new()),
            storage: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve the analysis client for the credential bundle, creating and
    /// caching it on first use.
    pub fn analysis_client(&self, credentials: &AwsCredentials) -> Arc<dyn MedicalAnalysisApi> {
        let cache_key = format!(
            "{}_{}",
            credentials.access_key_id,
            credentials.region_or_default()
        );

        if let Some(client) = self
            .analysis
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&cache_key)
        {
            debug!(%cache_key, "using cached analysis client");
            return Arc::clone(client);
        }

        let client = self.factory.analysis_client(credentials);
        self.analysis
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(cache_key.clone(), Arc::clone(&client));
        debug!(%cache_key, region = credentials.region_or_default(), "created analysis client");
        client
    }

    /// Resolve the storage client for the credential bundle, creating and
    /// caching it on first use. The storage cache is namespaced separately
    /// from the analysis cache.
    pub fn storage_client(&self, credentials: &AwsCredentials) -> Arc<dyn ObjectStoreApi> {
        let cache_key = format!(
            "s3_{}_{}",
            credentials.access_key_id,
            credentials.region_or_default()
        );

        if let Some(client) = self
            .storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&cache_key)
        {
            debug!(%cache_key, "using cached storage client");
            return Arc::clone(client);
        }

        let client = self.factory.storage_client(credentials);
        self.storage
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(cache_key.clone(), Arc::clone(&client));
        debug!(%cache_key, region = credentials.region_or_default(), "created storage client");
        client
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::BackendError;
    use crate::models::{EntityDetection, PhiDetection};

    struct NullAnalysisClient;

    #[async_trait]
    impl MedicalAnalysisApi for NullAnalysisClient {
        async fn detect_entities(&self, _text: &str) -> Result<EntityDetection, BackendError> {
            Ok(EntityDetection::default())
        }

        async fn detect_phi(&self, _text: &str) -> Result<PhiDetection, BackendError> {
            Ok(PhiDetection::default())
        }
    }

    struct NullStoreClient;

    #[async_trait]
    impl ObjectStoreApi for NullStoreClient {
        async fn put_object(
            &self,
            _bucket: &str,
            _key: &str,
            _body: Vec<u8>,
            _content_type: &str,
        ) -> Result<(), BackendError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingFactory {
        analysis_created: Arc<AtomicUsize>,
        storage_created: Arc<AtomicUsize>,
    }

    impl ClientFactory for CountingFactory {
        fn analysis_client(&self, _credentials: &AwsCredentials) -> Arc<dyn MedicalAnalysisApi> {
            self.analysis_created.fetch_add(1, Ordering::SeqCst);
            Arc::new(NullAnalysisClient)
        }

        fn storage_client(&self, _credentials: &AwsCredentials) -> Arc<dyn ObjectStoreApi> {
            self.storage_created.fetch_add(1, Ordering::SeqCst);
            Arc::new(NullStoreClient)
        }
    }

    fn credentials(region: &str) -> AwsCredentials {
        AwsCredentials {
            access_key_id: "AKID".to_string(),
            secret_access_key: "secret".to_string(),
            region: region.to_string(),
            session_token: None,
        }
    }

    #[test]
    fn same_identity_returns_same_handle() {
        let registry = ClientRegistry::new(Box::new(CountingFactory::default()));
        let first = registry.analysis_client(&credentials("us-east-1"));
        let second = registry.analysis_client(&credentials("us-east-1"));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn different_region_creates_distinct_handle() {
        let registry = ClientRegistry::new(Box::new(CountingFactory::default()));
        let east = registry.analysis_client(&credentials("us-east-1"));
        let west = registry.analysis_client(&credentials("us-west-2"));
        assert!(!Arc::ptr_eq(&east, &west));
    }

    #[test]
    fn factory_invoked_once_per_key() {
        let factory = CountingFactory::default();
        let analysis_created = Arc::clone(&factory.analysis_created);
        let storage_created = Arc::clone(&factory.storage_created);
        let registry = ClientRegistry::new(Box::new(factory));
        for _ in 0..3 {
            registry.analysis_client(&credentials("us-east-1"));
            registry.storage_client(&credentials("us-east-1"));
        }
        assert_eq!(analysis_created.load(Ordering::SeqCst), 1);
        assert_eq!(storage_created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn storage_and_analysis_caches_do_not_collide() {
        let registry = ClientRegistry::new(Box::new(CountingFactory::default()));
        registry.analysis_client(&credentials("us-east-1"));
        registry.storage_client(&credentials("us-east-1"));
        let analysis = registry
            .analysis
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let storage = registry
            .storage
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        assert!(analysis.contains_key("AKID_us-east-1"));
        assert!(storage.contains_key("s3_AKID_us-east-1"));
    }

    #[test]
    fn empty_region_uses_default() {
        let registry = ClientRegistry::new(Box::new(CountingFactory::default()));
        registry.analysis_client(&credentials(""));
        let analysis = registry
            .analysis
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        assert!(analysis.contains_key("AKID_us-east-1"));
    }
}
