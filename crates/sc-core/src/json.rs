use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::numeric::{decimal_eq, to_big_decimal};
use crate::record::Record;
use crate::value::{IntKind, Number, Value};

/// Numbers beyond i64/u64 stay exact: they become a float only when the f64
/// holds the same decimal value, and numeric text otherwise.
fn from_json_number(number: &serde_json::Number) -> Value {
    if let Some(value) = number.as_i64() {
        return Value::from(value);
    }
    if let Some(value) = number.as_u64() {
        return Value::from(value);
    }
    let exact = Value::Number(Number::new(number.to_string()));
    let float = number
        .as_f64()
        .filter(|value| value.is_finite())
        .map(Value::from);
    match (float, to_big_decimal(&exact)) {
        (Some(float), Ok(decimal)) => match to_big_decimal(&float) {
            Ok(narrow) if decimal_eq(&decimal, &narrow) => float,
            _ => exact,
        },
        _ => exact,
    }
}

/// Writes numeric text as a JSON number when it is one, as a string
/// otherwise.
fn serialize_numeric_text<S: Serializer>(text: &str, serializer: S) -> Result<S::Ok, S::Error> {
    match text.parse::<serde_json::Number>() {
        Ok(number) => number.serialize(serializer),
        Err(_) => serializer.serialize_str(text),
    }
}

/// Exported fields by lookup name, with `inline` fields spliced into their
/// parent. A direct field wins over an inlined one of the same name.
fn record_entries(record: &Record) -> Vec<(String, &Value)> {
    let table = record.schema().field_table();
    let mut entries = table
        .direct
        .iter()
        .filter(|(index, _)| !table.inline.contains(index))
        .filter_map(|(index, name)| record.field(*index).map(|value| (name.clone(), value)))
        .collect::<Vec<_>>();
    for index in &table.inline {
        let Some(mut value) = record.field(*index) else {
            continue;
        };
        while let Value::Ref(Some(inner)) = value {
            value = inner;
        }
        let children = match value {
            Value::Record(child) => record_entries(child),
            Value::Map(pairs) => pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
            Value::MapSlice(items) => items
                .iter()
                .map(|item| (item.key.to_string(), &item.value))
                .collect(),
            _ => Vec::new(),
        };
        for (name, value) in children {
            if !entries.iter().any(|(existing, _)| *existing == name) {
                entries.push((name, value));
            }
        }
    }
    entries
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(value) => Value::Bool(value),
            serde_json::Value::Number(number) => from_json_number(&number),
            serde_json::Value::String(value) => Value::String(value),
            serde_json::Value::Array(values) => {
                Value::Seq(values.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (Value::String(key), Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Nil | Value::Ref(None) => serializer.serialize_unit(),
            Value::Ref(Some(value)) => value.serialize(serializer),
            Value::Bool(value) => serializer.serialize_bool(*value),
            Value::Int(value) => match value.kind() {
                IntKind::U8 | IntKind::U16 | IntKind::U32 | IntKind::U64 => {
                    serializer.serialize_u64(value.get() as u64)
                }
                _ => serializer.serialize_i64(value.get() as i64),
            },
            Value::Float(value) => serializer.serialize_f64(value.get()),
            Value::String(value) => serializer.serialize_str(value),
            Value::Named(value) => serializer.serialize_str(value.as_str()),
            Value::Enum(value) => serializer.serialize_str(&value.name()),
            Value::Number(value) => serialize_numeric_text(value.as_str(), serializer),
            Value::BigInt(value) => serialize_numeric_text(&value.to_string(), serializer),
            Value::BigDecimal(value) => serialize_numeric_text(&value.to_string(), serializer),
            Value::Seq(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(&key.to_string(), value)?;
                }
                map.end()
            }
            Value::Record(record) => {
                let entries = record_entries(record);
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (name, value) in entries {
                    map.serialize_entry(&name, value)?;
                }
                map.end()
            }
            Value::MapItem(item) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(&item.key.to_string(), &item.value)?;
                map.end()
            }
            Value::MapSlice(items) => {
                let mut map = serializer.serialize_map(Some(items.len()))?;
                for item in items {
                    map.serialize_entry(&item.key.to_string(), &item.value)?;
                }
                map.end()
            }
            Value::Object(_) | Value::Function(_) => serializer.collect_str(self),
        }
    }
}
