use sc_core::numeric::{
    decimal_eq, is_integral, to_big_decimal, to_big_int, to_float, to_i64, to_int,
};
use sc_core::BigDecimal;
use sc_core::{EnumValue, NamedString, ScenarioError, Value};

fn coercion_error(expected: &Value, target: &Value, reason: impl std::fmt::Display) -> ScenarioError {
    ScenarioError::new(
        "ASSERT_COERCION",
        format!(
            "Cannot convert {} ({}) to {}: {}",
            expected.repr(),
            expected.type_name(),
            target.type_name(),
            reason
        ),
    )
}

/// Converts `expected` into the representation of `target`, so the two can
/// be compared directly.
///
/// A [`Value::Number`] target is the one exception: the result is a
/// [`Value::BigInt`] or [`Value::BigDecimal`] to compare against the numeric
/// value of the target text.
pub fn convert(expected: &Value, target: &Value) -> Result<Value, ScenarioError> {
    let fail = |reason: &dyn std::fmt::Display| coercion_error(expected, target, reason);
    let numeric = |error: ScenarioError| coercion_error(expected, target, error.message);

    match target {
        Value::Int(actual) => to_int(expected, actual.kind()).map(Value::Int).map_err(numeric),
        Value::Float(actual) => to_float(expected, actual.kind())
            .map(Value::Float)
            .map_err(numeric),
        Value::BigInt(_) => to_big_int(expected).map(Value::BigInt).map_err(numeric),
        Value::BigDecimal(_) => to_big_decimal(expected)
            .map(Value::BigDecimal)
            .map_err(numeric),
        Value::Number(_) => {
            let actual = to_big_decimal(target).map_err(numeric)?;
            if matches!(expected, Value::Int(_) | Value::BigInt(_)) {
                if !is_integral(&actual) {
                    return Err(fail(&format_args!("{} is not an integer", target.repr())));
                }
                return to_big_int(expected).map(Value::BigInt).map_err(numeric);
            }
            to_big_decimal(expected)
                .map(Value::BigDecimal)
                .map_err(numeric)
        }
        Value::String(_) => expected
            .as_str()
            .map(Value::from)
            .ok_or_else(|| fail(&"not a string")),
        Value::Named(actual) => expected
            .as_str()
            .map(|text| Value::Named(NamedString::new(actual.type_name(), text)))
            .ok_or_else(|| fail(&"not a string")),
        Value::Enum(actual) => match expected {
            Value::Int(_) | Value::BigInt(_) => {
                let number = to_i64(expected).map_err(numeric)?;
                let number = i32::try_from(number)
                    .map_err(|_| fail(&format_args!("{} overflows int32", number)))?;
                Ok(Value::Enum(EnumValue::new(actual.descriptor(), number)))
            }
            Value::String(_) | Value::Named(_) => {
                let name = expected.as_str().unwrap_or_default();
                EnumValue::from_name(actual.descriptor(), name)
                    .map(Value::Enum)
                    .ok_or_else(|| fail(&format_args!("unknown enum name \"{}\"", name)))
            }
            _ => Err(fail(&"not an integer or a name")),
        },
        Value::Bool(_) => match expected {
            Value::Bool(value) => Ok(Value::Bool(*value)),
            _ => Err(fail(&"not a bool")),
        },
        _ => Err(fail(&"unsupported target type")),
    }
}

/// Compares a converted expectation with its target.
pub(crate) fn same(converted: &Value, target: &Value) -> Result<bool, ScenarioError> {
    match (converted, target) {
        (Value::BigInt(expected), Value::Number(_)) => Ok(decimal_eq(
            &BigDecimal::new(expected.clone(), 0),
            &to_big_decimal(target)?,
        )),
        (Value::BigDecimal(expected), Value::Number(_)) => {
            Ok(decimal_eq(expected, &to_big_decimal(target)?))
        }
        _ => Ok(converted == target),
    }
}
