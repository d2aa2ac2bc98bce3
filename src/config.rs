//! Configuration types for analysis requests and result storage.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default S3 key prefix for persisted results.
pub const DEFAULT_OUTPUT_PREFIX: &str = "comprehend-medical-output";

/// Default bucket when `CLINSIGHT_S3_BUCKET` is unset.
pub const DEFAULT_BUCKET: &str = "clinsight-default-bucket";

/// Which category of annotation to request from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisMode {
    Entities,
    Phi,
    Both,
}

impl AnalysisMode {
    pub fn includes_entities(self) -> bool {
        matches!(self, AnalysisMode::Entities | AnalysisMode::Both)
    }

    pub fn includes_phi(self) -> bool {
        matches!(self, AnalysisMode::Phi | AnalysisMode::Both)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisMode::Entities => "ENTITIES",
            AnalysisMode::Phi => "PHI",
            AnalysisMode::Both => "BOTH",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the result payload.
///
/// `Raw` keeps only the pass-through annotation lists; `Simplified` adds the
/// grouped views derived in [`crate::simplify`]; `Both` carries both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[serde(rename = "json", alias = "raw")]
    Raw,
    Simplified,
    Both,
}

impl OutputFormat {
    pub fn includes_simplified(self) -> bool {
        matches!(self, OutputFormat::Simplified | OutputFormat::Both)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Raw => "json",
            OutputFormat::Simplified => "simplified",
            OutputFormat::Both => "both",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request analysis settings supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    /// Statically configured clinical text; runtime input takes precedence.
    pub text: String,
    pub analysis_type: AnalysisMode,
    pub output_format: OutputFormat,
    /// Persist the merged result to S3 after analysis.
    pub save_to_s3: bool,
    /// Key prefix for persisted results; [`DEFAULT_OUTPUT_PREFIX`] when unset.
    pub output_prefix: Option<String>,
    /// Language of the clinical text. Only "en" is supported by the backend.
    pub language: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            analysis_type: AnalysisMode::Entities,
            output_format: OutputFormat::Simplified,
            save_to_s3: false,
            output_prefix: None,
            language: "en".to_string(),
        }
    }
}

/// Process-wide storage settings, resolved once at startup rather than per
/// request.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Bucket that persisted results are written to.
    pub bucket: String,
}

impl StorageConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
        }
    }

    /// Resolve the bucket from `CLINSIGHT_S3_BUCKET`, falling back to
    /// [`DEFAULT_BUCKET`].
    pub fn from_env() -> Self {
        Self {
            bucket: std::env::var("CLINSIGHT_S3_BUCKET")
                .unwrap_or_else(|_| DEFAULT_BUCKET.to_string()),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }
}
