use sc_core::{ScenarioError, Value};
use sc_query::{elem, Query};

use crate::equal::equal;
use crate::Assertion;

/// Builds an assertion tree mirroring the shape of `expected`.
///
/// Maps assert only the keys they name; extra keys in the actual value are
/// ignored. Sequences assert their length and every element in order.
/// Everything else is an [`equal`] check.
pub fn build(expected: &Value) -> Box<dyn Assertion> {
    match expected {
        Value::Map(entries) => Box::new(KeysAssertion {
            keys: entries
                .iter()
                .map(|(key, value)| KeyCheck::new(elem(key), build(value)))
                .collect(),
        }),
        Value::MapSlice(items) => Box::new(KeysAssertion {
            keys: items
                .iter()
                .filter(|item| !item.key.is_nil())
                .map(|item| KeyCheck::new(elem(&item.key), build(&item.value)))
                .collect(),
        }),
        Value::Seq(values) => Box::new(SeqAssertion {
            items: values.iter().map(build).collect(),
        }),
        other => Box::new(equal(other.clone())),
    }
}

struct KeyCheck {
    key: String,
    query: Query,
    assertion: Box<dyn Assertion>,
}

impl KeyCheck {
    fn new(key: &Value, assertion: Box<dyn Assertion>) -> Self {
        let key = key.to_string();
        Self {
            query: Query::new().key(key.as_str()),
            key,
            assertion,
        }
    }
}

struct KeysAssertion {
    keys: Vec<KeyCheck>,
}

impl Assertion for KeysAssertion {
    fn assert(&self, actual: &Value) -> Result<(), ScenarioError> {
        for check in &self.keys {
            let path = check.query.to_string();
            let found = check.query.extract(actual).map_err(|_| {
                ScenarioError::new(
                    "ASSERT_KEY_NOT_FOUND",
                    format!("\"{}\" not found in {}.", check.key, elem(actual).type_name()),
                )
                .with_path(path.clone())
            })?;
            check
                .assertion
                .assert(&found)
                .map_err(|error| error.prepend_path(&path))?;
        }
        Ok(())
    }
}

struct SeqAssertion {
    items: Vec<Box<dyn Assertion>>,
}

impl Assertion for SeqAssertion {
    fn assert(&self, actual: &Value) -> Result<(), ScenarioError> {
        let Value::Seq(values) = elem(actual) else {
            return Err(ScenarioError::new(
                "ASSERT_NOT_EQUAL",
                format!(
                    "expected a sequence of {} element(s) but got {} ({})",
                    self.items.len(),
                    actual.repr(),
                    actual.type_name()
                ),
            ));
        };
        if values.len() != self.items.len() {
            return Err(ScenarioError::new(
                "ASSERT_LENGTH",
                format!(
                    "expected {} element(s) but got {}",
                    self.items.len(),
                    values.len()
                ),
            ));
        }
        for (index, (assertion, value)) in self.items.iter().zip(values).enumerate() {
            assertion
                .assert(value)
                .map_err(|error| error.prepend_path(&format!("[{}]", index)))?;
        }
        Ok(())
    }
}
