//! clinsight - clinical text analysis adapter for AWS Comprehend Medical.
//!
//! Submits clinical text to the Comprehend Medical service, aggregates the
//! returned entity and PHI annotations into a single record, and optionally
//! persists the record to S3. Backend clients are cached per credential and
//! region for the life of the process.

pub mod analysis;
pub mod cli;
pub mod clients;
pub mod config;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod models;
pub mod persistence;
pub mod simplify;

pub use analysis::AnalysisOrchestrator;
pub use clients::{AwsClientFactory, ClientFactory, ClientRegistry, MedicalAnalysisApi, ObjectStoreApi};
pub use config::{AnalysisConfig, AnalysisMode, OutputFormat, StorageConfig};
pub use credentials::AwsCredentials;
pub use error::{AnalysisError, BackendError};
pub use executor::{AnalysisNodeExecutor, ExecutionContext, NodeInputs, NodeOutput};
pub use models::{AnalysisResult, MedicalEntity, PhiEntity};
pub use persistence::ResultStore;
