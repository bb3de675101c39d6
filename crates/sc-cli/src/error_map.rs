use sc_core::ScenarioError;
use sc_tool::ScToolError;
use std::fmt::Display;

fn map_error(code: &'static str, error: impl Display) -> ScenarioError {
    ScenarioError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: ScenarioError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!(
        "ERROR_MSG_JSON:{}",
        serde_json::to_string(&error.to_string())
            .unwrap_or_else(|_| "\"Unknown error\"".to_string())
    );
    1
}

pub(crate) fn map_cli_vars_read(error: std::io::Error) -> ScenarioError {
    map_error("CLI_VARS_READ", error)
}

pub(crate) fn map_cli_vars_invalid(error: serde_json::Error) -> ScenarioError {
    map_error("CLI_VARS_INVALID", error)
}

pub(crate) fn map_cli_value_json(error: serde_json::Error) -> ScenarioError {
    map_error("CLI_VALUE_JSON", error)
}

pub(crate) fn map_tool_error(error: ScToolError) -> ScenarioError {
    ScenarioError::new(error.code(), error.to_string())
}

#[cfg(test)]
mod error_map_tests {
    use super::*;

    #[test]
    fn emit_error_returns_non_zero_exit_code() {
        let code = emit_error(ScenarioError::new("ERR", "failed"));
        assert_eq!(code, 1);
    }

    #[test]
    fn mapping_helpers_keep_error_codes() {
        assert_eq!(
            map_cli_vars_read(std::io::Error::other("read")).code,
            "CLI_VARS_READ"
        );

        let invalid = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        assert_eq!(map_cli_vars_invalid(invalid).code, "CLI_VARS_INVALID");

        let invalid = serde_json::from_str::<serde_json::Value>("[").expect_err("invalid json");
        assert_eq!(map_cli_value_json(invalid).code, "CLI_VALUE_JSON");

        let tool = map_tool_error(ScToolError::SourceEmpty {
            path: std::path::PathBuf::from("/nowhere"),
        });
        assert_eq!(tool.code, "TOOL_SOURCE_EMPTY");
        assert!(tool.message.contains("/nowhere"));
    }
}
