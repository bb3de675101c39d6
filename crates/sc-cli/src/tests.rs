use super::*;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should be monotonic")
        .as_nanos();
    std::env::temp_dir().join(format!("sc-cli-{}-{}", name, nanos))
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent should be created");
    }
    fs::write(path, content).expect("file should be written");
}

#[test]
fn load_vars_defaults_to_empty_map() {
    assert_eq!(load_vars(None).expect("no file"), Value::Map(Vec::new()));
}

#[test]
fn load_vars_reports_read_and_parse_errors() {
    let missing = temp_path("missing-vars.json");
    let error = load_vars(missing.to_str()).expect_err("missing file should fail");
    assert_eq!(error.code, "CLI_VARS_READ");

    let broken = temp_path("broken-vars.json");
    write_file(&broken, "{");
    let error = load_vars(broken.to_str()).expect_err("broken json should fail");
    assert_eq!(error.code, "CLI_VARS_INVALID");

    let valid = temp_path("vars.json");
    write_file(&valid, r#"{"name": "world"}"#);
    assert_eq!(
        load_vars(valid.to_str()).expect("vars should load"),
        Value::map([("name", "world")])
    );
}

#[test]
fn render_reports_template_errors_with_codes() {
    let error = run_render(RenderArgs {
        template: "{{ vars.".to_string(),
        vars: None,
    })
    .expect_err("unclosed template");
    assert_eq!(error.code, "TEMPLATE_UNCLOSED");

    let error = run_render(RenderArgs {
        template: "{{ vars.missing }}".to_string(),
        vars: None,
    })
    .expect_err("missing key");
    assert_eq!(error.code, "EVAL_KEY_NOT_FOUND");
}

#[test]
fn render_succeeds_with_vars_file() {
    let vars = temp_path("render-vars.json");
    write_file(&vars, r#"{"items": [1, 2, 3]}"#);
    let code = run_render(RenderArgs {
        template: "{{ size(vars.items) }}".to_string(),
        vars: Some(vars.to_string_lossy().to_string()),
    })
    .expect("render should pass");
    assert_eq!(code, 0);
}

#[test]
fn run_cases_fails_when_any_case_fails() {
    let root = temp_path("run-cases");
    write_file(
        &root.join("ok.case.json"),
        r#"{"schemaVersion":"sc-tool-case.v1","steps":[{"value":"{{ 1 + 1 }}","expect":2}]}"#,
    );
    let code = run_cases(RunArgs {
        cases_dir: root.to_string_lossy().to_string(),
        fail_fast: false,
    })
    .expect("passing cases");
    assert_eq!(code, 0);

    write_file(
        &root.join("bad.case.json"),
        r#"{"schemaVersion":"sc-tool-case.v1","steps":[{"value":"a","expect":"b"}]}"#,
    );
    let error = run_cases(RunArgs {
        cases_dir: root.to_string_lossy().to_string(),
        fail_fast: true,
    })
    .expect_err("failing case");
    assert_eq!(error.code, "CLI_CASES_FAILED");
}

#[test]
fn run_cases_requires_case_files() {
    let root = temp_path("no-cases");
    fs::create_dir_all(&root).expect("root should be created");
    let error = run_cases(RunArgs {
        cases_dir: root.to_string_lossy().to_string(),
        fail_fast: false,
    })
    .expect_err("empty dir");
    assert_eq!(error.code, "TOOL_SOURCE_EMPTY");
}

#[test]
fn run_cli_from_args_maps_outcomes_to_exit_codes() {
    assert_eq!(
        run_cli_from_args(["sc-cli", "render", "--template", "{{ 1 + 2 }}"]),
        0
    );
    assert_eq!(
        run_cli_from_args(["sc-cli", "render", "--template", "{{ 007 }}"]),
        1
    );
    assert_eq!(run_cli_from_args(["sc-cli", "unknown"]), 2);
    assert_eq!(run_cli_from_args(["sc-cli", "--help"]), 0);
}
