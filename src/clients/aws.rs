//! AWS SDK implementations of the backend API seams.

use std::sync::Arc;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;

use crate::clients::api::{ClientFactory, MedicalAnalysisApi, ObjectStoreApi};
use crate::credentials::AwsCredentials;
use crate::error::BackendError;
use crate::models::{
    EntityAttribute, EntityDetection, EntityTrait, MedicalEntity, PhiDetection, PhiEntity,
};

/// Comprehend Medical over the official SDK client.
#[derive(Debug, Clone)]
pub struct AwsComprehendMedicalClient {
    client: aws_sdk_comprehendmedical::Client,
}

#[async_trait]
impl MedicalAnalysisApi for AwsComprehendMedicalClient {
    async fn detect_entities(&self, text: &str) -> Result<EntityDetection, BackendError> {
        let out = self
            .client
            .detect_entities_v2()
            .text(text)
            .send()
            .await
            .map_err(|err| map_sdk_error("comprehendmedical", err))?;

        Ok(EntityDetection {
            entities: out.entities().iter().map(map_entity).collect(),
            model_version: Some(out.model_version().to_string()),
        })
    }

    async fn detect_phi(&self, text: &str) -> Result<PhiDetection, BackendError> {
        let out = self
            .client
            .detect_phi()
            .text(text)
            .send()
            .await
            .map_err(|err| map_sdk_error("comprehendmedical", err))?;

        Ok(PhiDetection {
            entities: out.entities().iter().map(map_phi_entity).collect(),
            model_version: Some(out.model_version().to_string()),
        })
    }
}

/// S3 over the official SDK client.
#[derive(Debug, Clone)]
pub struct AwsS3Client {
    client: aws_sdk_s3::Client,
}

#[async_trait]
impl ObjectStoreApi for AwsS3Client {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|err| map_sdk_error("s3", err))?;
        Ok(())
    }
}

/// Builds SDK clients bound to a credential bundle and its region.
#[derive(Debug, Default)]
pub struct AwsClientFactory;

impl AwsClientFactory {
    fn sdk_credentials(credentials: &AwsCredentials) -> Credentials {
        Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            credentials.session_token.clone(),
            None,
            "clinsight",
        )
    }
}

impl ClientFactory for AwsClientFactory {
    fn analysis_client(&self, credentials: &AwsCredentials) -> Arc<dyn MedicalAnalysisApi> {
        let config = aws_sdk_comprehendmedical::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(credentials.region_or_default().to_string()))
            .credentials_provider(Self::sdk_credentials(credentials))
            .build();
        Arc::new(AwsComprehendMedicalClient {
            client: aws_sdk_comprehendmedical::Client::from_conf(config),
        })
    }

    fn storage_client(&self, credentials: &AwsCredentials) -> Arc<dyn ObjectStoreApi> {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(credentials.region_or_default().to_string()))
            .credentials_provider(Self::sdk_credentials(credentials))
            .build();
        Arc::new(AwsS3Client {
            client: aws_sdk_s3::Client::from_conf(config),
        })
    }
}

fn map_entity(entity: &aws_sdk_comprehendmedical::types::Entity) -> MedicalEntity {
    MedicalEntity {
        id: entity.id(),
        text: entity.text().map(str::to_string),
        category: entity.category().map(|c| c.as_str().to_string()),
        entity_type: entity.r#type().map(|t| t.as_str().to_string()),
        score: entity.score(),
        begin_offset: entity.begin_offset(),
        end_offset: entity.end_offset(),
        attributes: map_attributes(entity.attributes()),
        traits: map_traits(entity.traits()),
    }
}

fn map_phi_entity(entity: &aws_sdk_comprehendmedical::types::Entity) -> PhiEntity {
    PhiEntity {
        id: entity.id(),
        text: entity.text().map(str::to_string),
        category: entity.category().map(|c| c.as_str().to_string()),
        entity_type: entity.r#type().map(|t| t.as_str().to_string()),
        score: entity.score(),
        begin_offset: entity.begin_offset(),
        end_offset: entity.end_offset(),
        attributes: map_attributes(entity.attributes()),
        traits: map_traits(entity.traits()),
    }
}

fn map_attributes(
    attributes: &[aws_sdk_comprehendmedical::types::Attribute],
) -> Option<Vec<EntityAttribute>> {
    if attributes.is_empty() {
        return None;
    }
    Some(
        attributes
            .iter()
            .map(|a| EntityAttribute {
                attribute_type: a.r#type().map(|t| t.as_str().to_string()),
                score: a.score(),
                relationship_score: a.relationship_score(),
                id: a.id(),
                begin_offset: a.begin_offset(),
                end_offset: a.end_offset(),
                text: a.text().map(str::to_string),
            })
            .collect(),
    )
}

fn map_traits(traits: &[aws_sdk_comprehendmedical::types::Trait]) -> Option<Vec<EntityTrait>> {
    if traits.is_empty() {
        return None;
    }
    Some(
        traits
            .iter()
            .map(|t| EntityTrait {
                name: t.name().map(|n| n.as_str().to_string()),
                score: t.score(),
            })
            .collect(),
    )
}

fn map_sdk_error<E>(service: &'static str, err: SdkError<E>) -> BackendError
where
    E: ProvideErrorMetadata + std::fmt::Debug,
{
    let fallback = format!("{err:?}");

    match err {
        SdkError::ServiceError(service_err) => {
            let code = service_err.err().code().map(str::to_string);
            let message = service_err
                .err()
                .message()
                .map(str::to_string)
                .unwrap_or(fallback);
            BackendError::new(service, code, message)
        }
        _ => BackendError::new(service, None, fallback),
    }
}
