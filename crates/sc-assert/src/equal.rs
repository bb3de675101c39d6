use sc_core::{ScenarioError, Value};
use sc_query::elem;

use crate::convert::{convert, same};
use crate::Assertion;

/// Asserts that the actual value equals `expected`, converting `expected`
/// to the actual value's type when the two differ.
pub fn equal(expected: impl Into<Value>) -> Equal {
    Equal {
        expected: expected.into(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Equal {
    expected: Value,
}

impl Equal {
    pub fn expected(&self) -> &Value {
        &self.expected
    }

    fn not_equal(&self, actual: &Value) -> ScenarioError {
        ScenarioError::new(
            "ASSERT_NOT_EQUAL",
            format!(
                "expected {} ({}) but got {} ({})",
                self.expected.repr(),
                self.expected.type_name(),
                actual.repr(),
                actual.type_name()
            ),
        )
    }
}

impl Assertion for Equal {
    fn assert(&self, actual: &Value) -> Result<(), ScenarioError> {
        let expected = &self.expected;
        if expected.is_nil() || actual.is_nil() {
            if expected.is_nil() && actual.is_nil() {
                return Ok(());
            }
            return Err(self.not_equal(actual));
        }
        let target = elem(actual);
        if expected == actual || expected == target {
            return Ok(());
        }

        let converted = convert(expected, target)?;
        tracing::trace!(
            expected = %expected.repr(),
            converted = %converted.repr(),
            target = %target.type_name(),
            "converted expectation"
        );
        if same(&converted, target)? {
            Ok(())
        } else {
            Err(self.not_equal(actual))
        }
    }
}

#[cfg(test)]
mod equal_tests {
    use super::*;
    use sc_core::{EnumDescriptor, EnumValue, NamedString, Number};

    struct Case {
        name: &'static str,
        expected: Value,
        ok: Value,
        ng: Value,
    }

    #[test]
    fn equal_accepts_ok_and_rejects_ng() {
        let user_type = EnumDescriptor::new(
            "UserType",
            [(0, "USER_TYPE_UNSPECIFIED"), (1, "CUSTOMER")],
        );
        let customer = Value::from(EnumValue::new(&user_type, 1));
        let unspecified = Value::from(EnumValue::new(&user_type, 0));
        let text = Value::ptr("string");

        let cases = vec![
            Case {
                name: "nil",
                expected: Value::Nil,
                ok: Value::Nil,
                ng: text.clone(),
            },
            Case {
                name: "nil (got typed nil)",
                expected: Value::Nil,
                ok: Value::null_ptr(),
                ng: text.clone(),
            },
            Case {
                name: "nil (expect typed nil)",
                expected: Value::null_ptr(),
                ok: Value::Nil,
                ng: text.clone(),
            },
            Case {
                name: "integer",
                expected: Value::from(1i64),
                ok: Value::from(1i64),
                ng: Value::from(2i64),
            },
            Case {
                name: "integer (type conversion)",
                expected: Value::from(1i64),
                ok: Value::from(1u64),
                ng: Value::from(2u64),
            },
            Case {
                name: "string",
                expected: Value::from("test"),
                ok: Value::from("test"),
                ng: Value::from("develop"),
            },
            Case {
                name: "string (type conversion)",
                expected: Value::from("test"),
                ok: Value::from(NamedString::new("myString", "test")),
                ng: Value::from(NamedString::new("myString", "develop")),
            },
            Case {
                name: "enum integer",
                expected: Value::from(1i64),
                ok: customer.clone(),
                ng: unspecified.clone(),
            },
            Case {
                name: "enum string",
                expected: Value::from("CUSTOMER"),
                ok: customer,
                ng: unspecified,
            },
            Case {
                name: "number (string)",
                expected: Value::from("100"),
                ok: Value::from(Number::new("100")),
                ng: Value::from(Number::new("0.01")),
            },
            Case {
                name: "number (int)",
                expected: Value::from(100i64),
                ok: Value::from(Number::new("100")),
                ng: Value::from(Number::new("0.01")),
            },
            Case {
                name: "number (float)",
                expected: Value::from(0.01f64),
                ok: Value::from(Number::new("0.01")),
                ng: Value::from(Number::new("100")),
            },
            Case {
                name: "pointer to value",
                expected: Value::from("string"),
                ok: Value::ptr(Value::ptr("string")),
                ng: Value::ptr("other"),
            },
        ];

        for case in cases {
            let assertion = equal(case.expected);
            if let Err(error) = assertion.assert(&case.ok) {
                panic!("{}: unexpected error: {}", case.name, error);
            }
            assert!(
                assertion.assert(&case.ng).is_err(),
                "{}: expected error but no error",
                case.name
            );
        }
    }

    #[test]
    fn failures_distinguish_coercion_from_mismatch() {
        let mismatch = equal(1i64).assert(&Value::from(2u64)).expect_err("2 != 1");
        assert_eq!(mismatch.code, "ASSERT_NOT_EQUAL");
        assert_eq!(mismatch.message, "expected 1 (int64) but got 2 (uint64)");

        let coercion = equal(100i64)
            .assert(&Value::from(Number::new("0.01")))
            .expect_err("fractional number");
        assert_eq!(coercion.code, "ASSERT_COERCION");

        let nil = equal("x").assert(&Value::null_ptr()).expect_err("nil actual");
        assert_eq!(nil.code, "ASSERT_NOT_EQUAL");
        assert!(nil.message.ends_with("but got <nil> (pointer)"));
    }

    #[test]
    fn numbers_with_far_exponents_compare_without_expanding() {
        let huge = Value::from(Number::new("1e2000000000"));
        let error = equal(1i64).assert(&huge).expect_err("1 != 1e2000000000");
        assert_eq!(error.code, "ASSERT_NOT_EQUAL");

        let tiny = Value::from(Number::new("1e-2000000000"));
        let error = equal(0.01f64).assert(&tiny).expect_err("0.01 != 1e-2000000000");
        assert_eq!(error.code, "ASSERT_NOT_EQUAL");

        equal(1000i64)
            .assert(&Value::from(Number::new("1e3")))
            .expect("1e3 is 1000");
    }

    #[test]
    fn wide_integers_are_compared_exactly() {
        let actual = Value::from(Number::new("123456789012345678901234567890"));
        let error = equal("123456789012345678901234567891")
            .assert(&actual)
            .expect_err("last digit differs");
        assert_eq!(error.code, "ASSERT_NOT_EQUAL");
        equal("123456789012345678901234567890")
            .assert(&actual)
            .expect("same digits");
    }

    #[test]
    fn nil_check_ignores_non_nullable_values() {
        for value in [
            Value::Nil,
            Value::null_ptr(),
            Value::ptr("string"),
            Value::from("string"),
            Value::from(0i64),
        ] {
            let expect = matches!(value, Value::Nil | Value::Ref(None));
            assert_eq!(value.is_nil(), expect, "{:?}", value);
        }
    }
}
