//! Request entry point: validates input, resolves credentials, and runs the
//! analysis and persistence steps.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info};

use crate::analysis::AnalysisOrchestrator;
use crate::clients::ClientRegistry;
use crate::config::{AnalysisConfig, StorageConfig};
use crate::credentials::AwsCredentials;
use crate::error::AnalysisError;
use crate::models::AnalysisResult;
use crate::persistence::ResultStore;
use crate::simplify;

/// Runtime inputs supplied with one request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeInputs {
    /// Clinical text to analyze; takes precedence over the configured text.
    pub text: Option<String>,
}

/// Per-call execution context from the host.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// Credential bundle for the downstream calls. When absent, an empty
    /// bundle is used and authentication fails at the backend.
    pub credentials: Option<AwsCredentials>,
    pub workflow_id: String,
    pub execution_id: String,
    pub node_id: String,
}

/// Outcome of one request.
#[derive(Debug, Clone)]
pub struct NodeOutput {
    pub result: AnalysisResult,
    /// Storage key of the persisted result, when persistence ran.
    pub output_key: Option<String>,
}

/// Executes analysis requests end to end.
pub struct AnalysisNodeExecutor {
    orchestrator: AnalysisOrchestrator,
    store: ResultStore,
}

impl AnalysisNodeExecutor {
    pub fn new(registry: Arc<ClientRegistry>, storage: StorageConfig) -> Self {
        Self {
            orchestrator: AnalysisOrchestrator::new(Arc::clone(&registry)),
            store: ResultStore::new(registry, storage),
        }
    }

    /// Run one analysis request.
    ///
    /// Either the whole request completes (analysis, and persistence when
    /// requested) or it fails as a whole; there is no partial result.
    pub async fn execute(
        &self,
        inputs: NodeInputs,
        config: AnalysisConfig,
        context: ExecutionContext,
    ) -> Result<NodeOutput, AnalysisError> {
        match self.run(inputs, &config, &context).await {
            Ok(output) => {
                info!(
                    workflow_id = %context.workflow_id,
                    execution_id = %context.execution_id,
                    analysis_type = %config.analysis_type,
                    output_format = %config.output_format,
                    text_length = output.result.metadata.text_length,
                    entity_count = ?output.result.metadata.entity_count,
                    phi_count = ?output.result.metadata.phi_count,
                    processing_time = output.result.metadata.processing_time,
                    "analysis completed"
                );
                Ok(output)
            }
            Err(err) => {
                error!(
                    workflow_id = %context.workflow_id,
                    execution_id = %context.execution_id,
                    node_id = %context.node_id,
                    error = %err,
                    code = err.code().unwrap_or("unknown"),
                    detail = ?err,
                    "analysis failed"
                );
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        inputs: NodeInputs,
        config: &AnalysisConfig,
        context: &ExecutionContext,
    ) -> Result<NodeOutput, AnalysisError> {
        // Runtime input wins over configured text; an empty runtime input
        // falls back to the configured text.
        let text = match inputs.text {
            Some(text) if !text.is_empty() => text,
            _ => config.text.clone(),
        };

        if text.trim().is_empty() {
            return Err(AnalysisError::Validation(
                "no clinical text provided for analysis".to_string(),
            ));
        }

        let credentials = context.credentials.clone().unwrap_or_default();

        let mut result = self
            .orchestrator
            .analyze(&credentials, &text, config.analysis_type)
            .await?;

        simplify::apply(&mut result, config.output_format);

        if config.save_to_s3 {
            self.store
                .persist(&credentials, &mut result, config.output_prefix.as_deref())
                .await?;
        }

        Ok(NodeOutput {
            output_key: result.output_key.clone(),
            result,
        })
    }
}
