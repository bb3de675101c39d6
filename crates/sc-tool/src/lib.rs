mod case;
mod runner;
mod source;

pub use case::{TestCase, TestStep, TESTCASE_SCHEMA_V1};
pub use runner::{assert_case, run_case, RunOptions, RunReport, StepReport};
pub use source::{discover_cases, read_cases_from_dir, read_test_case, CASE_FILE_SUFFIX};

use std::path::PathBuf;

use sc_core::ScenarioError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScToolError {
    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse testcase {path}: {source}")]
    ParseCase {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid testcase schema version \"{found}\", expected \"{expected}\".")]
    InvalidSchemaVersion { expected: String, found: String },
    #[error("No {suffix} files under {path}.", suffix = CASE_FILE_SUFFIX)]
    SourceEmpty { path: PathBuf },
    #[error("Step \"{step}\" of {case} failed: {source}")]
    StepFailed {
        case: PathBuf,
        step: String,
        source: ScenarioError,
    },
}

impl ScToolError {
    /// Stable code for the CLI error protocol; step failures report the
    /// code of the underlying scenario error.
    pub fn code(&self) -> &str {
        match self {
            Self::ReadFile { .. } => "TOOL_READ_FILE",
            Self::ParseCase { .. } => "TOOL_PARSE_CASE",
            Self::InvalidSchemaVersion { .. } => "TOOL_SCHEMA_VERSION",
            Self::SourceEmpty { .. } => "TOOL_SOURCE_EMPTY",
            Self::StepFailed { source, .. } => &source.code,
        }
    }
}
