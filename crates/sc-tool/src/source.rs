use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{ScToolError, TestCase, TESTCASE_SCHEMA_V1};

pub const CASE_FILE_SUFFIX: &str = ".case.json";

/// All case files under `cases_dir`, sorted by path.
pub fn discover_cases(cases_dir: &Path) -> Result<Vec<PathBuf>, ScToolError> {
    let mut cases = WalkDir::new(cases_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().to_string_lossy().ends_with(CASE_FILE_SUFFIX))
        .map(|entry| entry.into_path())
        .collect::<Vec<_>>();
    cases.sort();

    if cases.is_empty() {
        return Err(ScToolError::SourceEmpty {
            path: cases_dir.to_path_buf(),
        });
    }
    Ok(cases)
}

pub fn read_cases_from_dir(cases_dir: &Path) -> Result<Vec<(PathBuf, TestCase)>, ScToolError> {
    discover_cases(cases_dir)?
        .into_iter()
        .map(|path| {
            let case = read_test_case(&path)?;
            Ok((path, case))
        })
        .collect()
}

pub fn read_test_case(case_path: &Path) -> Result<TestCase, ScToolError> {
    let raw = fs::read_to_string(case_path).map_err(|source| ScToolError::ReadFile {
        path: case_path.to_path_buf(),
        source,
    })?;
    let parsed: TestCase = serde_json::from_str(&raw).map_err(|source| ScToolError::ParseCase {
        path: case_path.to_path_buf(),
        source,
    })?;

    if parsed.schema_version != TESTCASE_SCHEMA_V1 {
        return Err(ScToolError::InvalidSchemaVersion {
            expected: TESTCASE_SCHEMA_V1.to_string(),
            found: parsed.schema_version,
        });
    }

    Ok(parsed)
}
