//! Analysis orchestration: issues the requested detection calls and merges
//! their responses into a single result record.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::clients::ClientRegistry;
use crate::config::AnalysisMode;
use crate::credentials::AwsCredentials;
use crate::error::AnalysisError;
use crate::models::AnalysisResult;

/// Runs entity and PHI detection against the analysis backend.
pub struct AnalysisOrchestrator {
    registry: Arc<ClientRegistry>,
}

impl AnalysisOrchestrator {
    pub fn new(registry: Arc<ClientRegistry>) -> Self {
        Self { registry }
    }

    /// Issue the detection calls the mode asks for, sequentially, and merge
    /// the responses.
    ///
    /// Fail-fast: the first backend failure aborts the pass and nothing
    /// already collected is surfaced. When both calls return a model
    /// version, the entity call's version wins.
    pub async fn analyze(
        &self,
        credentials: &AwsCredentials,
        text: &str,
        mode: AnalysisMode,
    ) -> Result<AnalysisResult, AnalysisError> {
        let started = Instant::now();
        let client = self.registry.analysis_client(credentials);

        let mut result = AnalysisResult::new(text.len());

        if mode.includes_entities() {
            info!("detecting medical entities");
            let detection = client.detect_entities(text).await?;
            result.metadata.entity_count = Some(detection.entities.len());
            result.model_version = detection.model_version;
            result.entities = Some(detection.entities);
        }

        if mode.includes_phi() {
            info!("detecting PHI");
            let detection = client.detect_phi(text).await?;
            result.metadata.phi_count = Some(detection.entities.len());
            if result.model_version.is_none() {
                result.model_version = detection.model_version;
            }
            result.phi = Some(detection.entities);
        }

        // Wall-clock time across all backend calls of this pass.
        result.metadata.processing_time = started.elapsed().as_millis() as u64;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::clients::{ClientFactory, MedicalAnalysisApi, ObjectStoreApi};
    use crate::error::BackendError;
    use crate::models::{EntityDetection, MedicalEntity, PhiDetection, PhiEntity};

    struct ScriptedClient {
        entity_version: Option<String>,
        phi_version: Option<String>,
        fail_phi: bool,
    }

    #[async_trait]
    impl MedicalAnalysisApi for ScriptedClient {
        async fn detect_entities(&self, _text: &str) -> Result<EntityDetection, BackendError> {
            Ok(EntityDetection {
                entities: vec![MedicalEntity {
                    text: Some("aspirin".to_string()),
                    category: Some("MEDICATION".to_string()),
                    score: Some(0.97),
                    ..Default::default()
                }],
                model_version: self.entity_version.clone(),
            })
        }

        async fn detect_phi(&self, _text: &str) -> Result<PhiDetection, BackendError> {
            if self.fail_phi {
                return Err(BackendError::new(
                    "comprehendmedical",
                    Some("InternalServerException".to_string()),
                    "PHI detection unavailable",
                ));
            }
            Ok(PhiDetection {
                entities: vec![PhiEntity {
                    text: Some("John".to_string()),
                    entity_type: Some("NAME".to_string()),
                    score: Some(0.99),
                    ..Default::default()
                }],
                model_version: self.phi_version.clone(),
            })
        }
    }

    struct ScriptedFactory {
        entity_version: Option<String>,
        phi_version: Option<String>,
        fail_phi: bool,
    }

    impl ClientFactory for ScriptedFactory {
        fn analysis_client(&self, _credentials: &AwsCredentials) -> Arc<dyn MedicalAnalysisApi> {
            Arc::new(ScriptedClient {
                entity_version: self.entity_version.clone(),
                phi_version: self.phi_version.clone(),
                fail_phi: self.fail_phi,
            })
        }

        fn storage_client(&self, _credentials: &AwsCredentials) -> Arc<dyn ObjectStoreApi> {
            unimplemented!("orchestrator tests never touch storage")
        }
    }

    fn orchestrator(factory: ScriptedFactory) -> AnalysisOrchestrator {
        AnalysisOrchestrator::new(Arc::new(ClientRegistry::new(Box::new(factory))))
    }

    #[tokio::test]
    async fn entity_model_version_takes_precedence() {
        let orchestrator = orchestrator(ScriptedFactory {
            entity_version: Some("entities-2.1".to_string()),
            phi_version: Some("phi-1.4".to_string()),
            fail_phi: false,
        });
        let result = orchestrator
            .analyze(&AwsCredentials::default(), "text", AnalysisMode::Both)
            .await
            .unwrap();
        assert_eq!(result.model_version.as_deref(), Some("entities-2.1"));
    }

    #[tokio::test]
    async fn phi_model_version_used_when_entity_call_skipped() {
        let orchestrator = orchestrator(ScriptedFactory {
            entity_version: Some("entities-2.1".to_string()),
            phi_version: Some("phi-1.4".to_string()),
            fail_phi: false,
        });
        let result = orchestrator
            .analyze(&AwsCredentials::default(), "text", AnalysisMode::Phi)
            .await
            .unwrap();
        assert_eq!(result.model_version.as_deref(), Some("phi-1.4"));
        assert!(result.entities.is_none());
        assert_eq!(result.metadata.phi_count, Some(1));
    }

    #[tokio::test]
    async fn phi_failure_discards_entity_data() {
        let orchestrator = orchestrator(ScriptedFactory {
            entity_version: None,
            phi_version: None,
            fail_phi: true,
        });
        let err = orchestrator
            .analyze(&AwsCredentials::default(), "text", AnalysisMode::Both)
            .await
            .unwrap_err();
        match err {
            AnalysisError::Backend(backend) => {
                assert_eq!(backend.code.as_deref(), Some("InternalServerException"));
            }
            other => panic!("expected backend error, got {other:?}"),
        }
    }
}
