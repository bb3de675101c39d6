use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

pub const TESTCASE_SCHEMA_V1: &str = "sc-tool-case.v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default = "default_vars")]
    pub vars: JsonValue,
    #[serde(default)]
    pub steps: Vec<TestStep>,
}

fn default_vars() -> JsonValue {
    JsonValue::Object(Map::new())
}

/// One evaluation: `value` and `expect` are both executed as templates,
/// then `expect` is asserted against `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: JsonValue,
    pub expect: JsonValue,
}

impl TestStep {
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("steps[{}]", index),
        }
    }
}
