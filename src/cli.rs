//! Command-line driver for one-off analysis runs.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::clients::{AwsClientFactory, ClientRegistry};
use crate::config::{AnalysisConfig, AnalysisMode, OutputFormat, StorageConfig};
use crate::credentials::AwsCredentials;
use crate::executor::{AnalysisNodeExecutor, ExecutionContext, NodeInputs};

/// Analyze clinical text with AWS Comprehend Medical.
#[derive(Debug, Parser)]
#[command(name = "clinsight", version, about)]
pub struct Cli {
    /// Clinical text to analyze. Reads --input or stdin when omitted.
    pub text: Option<String>,

    /// Read the clinical text from a file instead of the command line.
    #[arg(long, value_name = "FILE", conflicts_with = "text")]
    pub input: Option<PathBuf>,

    /// Analysis to run: entities, phi, or both.
    #[arg(long, default_value = "entities", value_parser = parse_mode)]
    pub mode: AnalysisMode,

    /// Output shape: json, simplified, or both.
    #[arg(long, default_value = "simplified", value_parser = parse_format)]
    pub format: OutputFormat,

    /// Persist the result to S3 (bucket from CLINSIGHT_S3_BUCKET).
    #[arg(long)]
    pub persist: bool,

    /// Key prefix for persisted results.
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Enable info-level logging.
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_mode(value: &str) -> Result<AnalysisMode, String> {
    match value.to_ascii_uppercase().as_str() {
        "ENTITIES" => Ok(AnalysisMode::Entities),
        "PHI" => Ok(AnalysisMode::Phi),
        "BOTH" => Ok(AnalysisMode::Both),
        other => Err(format!("unknown analysis mode: {other}")),
    }
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    match value.to_ascii_lowercase().as_str() {
        "json" | "raw" => Ok(OutputFormat::Raw),
        "simplified" => Ok(OutputFormat::Simplified),
        "both" => Ok(OutputFormat::Both),
        other => Err(format!("unknown output format: {other}")),
    }
}

/// Check argv for the verbose flag before clap parsing, so logging can be
/// initialized first.
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Parse arguments, run one analysis request, and print the result as
/// pretty JSON on stdout.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let text = match (cli.text, cli.input) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)?,
        (None, None) => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let registry = Arc::new(ClientRegistry::new(Box::new(AwsClientFactory)));
    let executor = AnalysisNodeExecutor::new(registry, StorageConfig::from_env());

    let config = AnalysisConfig {
        analysis_type: cli.mode,
        output_format: cli.format,
        save_to_s3: cli.persist,
        output_prefix: cli.prefix,
        ..Default::default()
    };
    let context = ExecutionContext {
        credentials: Some(AwsCredentials::from_env()),
        node_id: "cli".to_string(),
        ..Default::default()
    };

    let output = executor
        .execute(NodeInputs { text: Some(text) }, config, context)
        .await?;

    println!("{}", serde_json::to_string_pretty(&output.result)?);
    if let Some(key) = output.output_key {
        eprintln!("saved to {key}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parsing_is_case_insensitive() {
        assert_eq!(parse_mode("both").unwrap(), AnalysisMode::Both);
        assert_eq!(parse_mode("PHI").unwrap(), AnalysisMode::Phi);
        assert!(parse_mode("everything").is_err());
    }

    #[test]
    fn format_accepts_raw_alias() {
        assert_eq!(parse_format("raw").unwrap(), OutputFormat::Raw);
        assert_eq!(parse_format("json").unwrap(), OutputFormat::Raw);
        assert!(parse_format("xml").is_err());
    }
}
