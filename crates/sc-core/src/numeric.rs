//! Checked conversions between the numeric shapes of [`Value`].
//!
//! Every conversion goes through an arbitrary-precision intermediate:
//! [`BigInt`] for integers and [`BigDecimal`] for everything with a
//! fractional part. Narrowing to a fixed width is always explicit and fails
//! instead of truncating.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::error::ScenarioError;
use crate::value::{FloatKind, FloatValue, IntKind, IntValue, Value};

fn unsupported(value: &Value, target: &str) -> ScenarioError {
    ScenarioError::new(
        "NUMERIC_UNSUPPORTED",
        format!("Cannot convert {} ({}) to {}.", value.repr(), value.type_name(), target),
    )
}

fn parse_decimal(text: &str) -> Result<BigDecimal, ScenarioError> {
    BigDecimal::from_str(text).map_err(|_| {
        ScenarioError::new(
            "NUMERIC_PARSE",
            format!("\"{}\" is not a number.", text),
        )
    })
}

/// Integers wider than this many digits are rejected before they are expanded.
pub const MAX_INTEGER_DIGITS: i128 = 4096;

/// `decimal` as `(digits, scale)` with trailing zeros moved into the scale,
/// plus the number of significant digits. Zero is `(0, 0, 1)`.
fn normalize(decimal: &BigDecimal) -> (BigInt, i64, usize) {
    let (digits, scale) = decimal.as_bigint_and_exponent();
    if digits.is_zero() {
        return (BigInt::zero(), 0, 1);
    }
    let text = digits.magnitude().to_string();
    let trimmed = text.trim_end_matches('0');
    let zeros = text.len() - trimmed.len();
    let digits = digits / num_traits::pow(BigInt::from(10), zeros);
    (digits, scale.saturating_sub(zeros as i64), trimmed.len())
}

/// Decimal equality that never rescales either side, so values with far
/// apart exponents compare in time bounded by their digit counts.
pub fn decimal_eq(left: &BigDecimal, right: &BigDecimal) -> bool {
    let (left_digits, left_scale, _) = normalize(left);
    let (right_digits, right_scale, _) = normalize(right);
    left_scale == right_scale && left_digits == right_digits
}

/// Sum of two decimals. Operands whose exponents lie more than
/// [`MAX_INTEGER_DIGITS`] apart are out of range.
pub fn decimal_add(left: &BigDecimal, right: &BigDecimal) -> Result<BigDecimal, ScenarioError> {
    if left.is_zero() {
        return Ok(right.clone());
    }
    if right.is_zero() {
        return Ok(left.clone());
    }
    let (_, left_scale, _) = normalize(left);
    let (_, right_scale, _) = normalize(right);
    if (left_scale as i128 - right_scale as i128).abs() > MAX_INTEGER_DIGITS {
        return Err(ScenarioError::new(
            "NUMERIC_OUT_OF_RANGE",
            format!(
                "Cannot add numbers whose exponents are more than {} apart.",
                MAX_INTEGER_DIGITS
            ),
        ));
    }
    Ok(left + right)
}

pub fn is_integral(decimal: &BigDecimal) -> bool {
    normalize(decimal).1 <= 0
}

/// The integer value of `decimal`, or `None` when it has a fractional part.
/// Integers with more than [`MAX_INTEGER_DIGITS`] digits are out of range.
pub fn integral_part(decimal: &BigDecimal) -> Result<Option<BigInt>, ScenarioError> {
    let (digits, scale, width) = normalize(decimal);
    if scale > 0 {
        return Ok(None);
    }
    if width as i128 - scale as i128 > MAX_INTEGER_DIGITS {
        return Err(ScenarioError::new(
            "NUMERIC_OUT_OF_RANGE",
            format!(
                "{}e{} has more than {} integer digits.",
                digits, -(scale as i128), MAX_INTEGER_DIGITS
            ),
        ));
    }
    let exponent = usize::try_from(-(scale as i128)).unwrap_or_default();
    Ok(Some(digits * num_traits::pow(BigInt::from(10), exponent)))
}

pub fn to_big_decimal(value: &Value) -> Result<BigDecimal, ScenarioError> {
    match value {
        Value::Int(value) => Ok(BigDecimal::new(BigInt::from(value.get()), 0)),
        Value::Float(float) if float.get().is_finite() => {
            parse_decimal(&float.to_decimal_string())
        }
        Value::Enum(value) => Ok(BigDecimal::new(BigInt::from(value.number()), 0)),
        Value::BigInt(value) => Ok(BigDecimal::new(value.clone(), 0)),
        Value::BigDecimal(value) => Ok(value.clone()),
        Value::Number(value) => parse_decimal(value.as_str()),
        Value::String(text) => parse_decimal(text),
        Value::Named(text) => parse_decimal(text.as_str()),
        other => Err(unsupported(other, "bigdecimal")),
    }
}

pub fn to_big_int(value: &Value) -> Result<BigInt, ScenarioError> {
    match value {
        Value::Int(value) => Ok(BigInt::from(value.get())),
        Value::Enum(value) => Ok(BigInt::from(value.number())),
        Value::BigInt(value) => Ok(value.clone()),
        Value::Float(_)
        | Value::BigDecimal(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Named(_) => {
            let decimal = to_big_decimal(value)?;
            integral_part(&decimal)?.ok_or_else(|| {
                ScenarioError::new(
                    "NUMERIC_NOT_INTEGER",
                    format!("{} is not an integer.", value.repr()),
                )
            })
        }
        other => Err(unsupported(other, "bigint")),
    }
}

/// Decimal exponents beyond this overflow (or underflow) an f64.
const F64_MAX_DIGITS: i128 = 400;

fn out_of_range(value: &BigInt, target: &str) -> ScenarioError {
    ScenarioError::new(
        "NUMERIC_OUT_OF_RANGE",
        format!("{} overflows {}.", value, target),
    )
}

/// Converts to an integer of the given width, rejecting values that do not
/// fit.
pub fn to_int(value: &Value, kind: IntKind) -> Result<IntValue, ScenarioError> {
    let big = to_big_int(value)?;
    big.to_i128()
        .and_then(|wide| IntValue::new(kind, wide))
        .ok_or_else(|| out_of_range(&big, kind.name()))
}

pub fn to_i64(value: &Value) -> Result<i64, ScenarioError> {
    let big = to_big_int(value)?;
    big.to_i64().ok_or_else(|| out_of_range(&big, "int64"))
}

pub fn to_u64(value: &Value) -> Result<u64, ScenarioError> {
    let big = to_big_int(value)?;
    big.to_u64().ok_or_else(|| out_of_range(&big, "uint64"))
}

pub fn to_f64(value: &Value) -> Result<f64, ScenarioError> {
    if let Value::Float(value) = value {
        return Ok(value.get());
    }
    let overflow = || {
        ScenarioError::new(
            "NUMERIC_OUT_OF_RANGE",
            format!("{} overflows float64.", value.repr()),
        )
    };
    let decimal = to_big_decimal(value)?;
    let (_, scale, width) = normalize(&decimal);
    let magnitude = width as i128 - scale as i128;
    if magnitude > F64_MAX_DIGITS {
        return Err(overflow());
    }
    if magnitude < -F64_MAX_DIGITS {
        return Ok(if decimal.is_negative() { -0.0 } else { 0.0 });
    }
    decimal
        .to_f64()
        .filter(|converted| converted.is_finite())
        .ok_or_else(overflow)
}

pub fn to_float(value: &Value, kind: FloatKind) -> Result<FloatValue, ScenarioError> {
    let wide = to_f64(value)?;
    Ok(match kind {
        FloatKind::F64 => FloatValue::f64(wide),
        FloatKind::F32 => {
            let narrow = wide as f32;
            if !narrow.is_finite() {
                return Err(ScenarioError::new(
                    "NUMERIC_OUT_OF_RANGE",
                    format!("{} overflows float32.", wide),
                ));
            }
            FloatValue::f32(narrow)
        }
    })
}
