//! Backend client management: API seams, AWS implementations, and the
//! process-wide client cache.

mod api;
mod aws;
mod registry;

pub use api::{ClientFactory, MedicalAnalysisApi, ObjectStoreApi};
pub use aws::{AwsClientFactory, AwsComprehendMedicalClient, AwsS3Client};
pub use registry::ClientRegistry;
