use std::borrow::Cow;

use sc_core::{numeric, ScenarioError, Value};
use sc_query::{elem, Extractor, Index, Key};

use crate::ast::Expr;
use crate::context::Context;

pub fn evaluate(expr: &Expr, context: &Context) -> Result<Value, ScenarioError> {
    resolve(expr, context).map(Cow::into_owned)
}

/// Evaluates `expr`, borrowing from the context whenever the result is a
/// sub-value of it.
pub(crate) fn resolve<'c>(
    expr: &Expr,
    context: &'c Context,
) -> Result<Cow<'c, Value>, ScenarioError> {
    match expr {
        Expr::Ident(name) => context.lookup(name).ok_or_else(|| {
            ScenarioError::new(
                "EVAL_NAME_NOT_FOUND",
                format!("Name \"{}\" is not defined.", name),
            )
            .with_path(name.clone())
        }),
        Expr::Str(text) => Ok(Cow::Owned(Value::String(text.clone()))),
        Expr::Int(value) => Ok(Cow::Owned(Value::from(*value))),
        Expr::Selector { base, name } => {
            let target = resolve(base, context)?;
            step(target, &Key::new(name.as_str())).ok_or_else(|| key_not_found(name, base))
        }
        Expr::Index { base, index } => {
            let key = resolve(index, context)?;
            let target = resolve(base, context)?;
            resolve_index(target, &key, base)
        }
        Expr::Call { callee, args } => call(callee, args, context).map(Cow::Owned),
        Expr::Add { left, right } => {
            let left = resolve(left, context)?;
            let right = resolve(right, context)?;
            add(elem(&left), elem(&right)).map(Cow::Owned)
        }
    }
}

fn step<'c>(target: Cow<'c, Value>, extractor: &dyn Extractor) -> Option<Cow<'c, Value>> {
    match target {
        Cow::Borrowed(inner) => extractor.extract(inner),
        Cow::Owned(inner) => extractor
            .extract(&inner)
            .map(|found| Cow::Owned(found.into_owned())),
    }
}

fn key_not_found(key: &str, base: &Expr) -> ScenarioError {
    ScenarioError::new(
        "EVAL_KEY_NOT_FOUND",
        format!("Key \"{}\" not found in \"{}\".", key, base),
    )
    .with_path(base.to_string())
}

fn resolve_index<'c>(
    target: Cow<'c, Value>,
    key: &Value,
    base: &Expr,
) -> Result<Cow<'c, Value>, ScenarioError> {
    match elem(key) {
        Value::Int(position) if matches!(elem(&target), Value::Seq(_)) => {
            let found = usize::try_from(position.get())
                .ok()
                .and_then(|position| step(target, &Index::new(position)));
            found.ok_or_else(|| key_not_found(&position.get().to_string(), base))
        }
        Value::Int(_) | Value::String(_) | Value::Named(_) => {
            let key = elem(key).to_string();
            step(target, &Key::new(key.as_str())).ok_or_else(|| key_not_found(&key, base))
        }
        other => Err(ScenarioError::new(
            "EVAL_INDEX_INVALID",
            format!(
                "Index must be an integer or a string, got {} ({}).",
                other.repr(),
                other.type_name()
            ),
        )
        .with_path(base.to_string())),
    }
}

fn call(callee: &Expr, args: &[Expr], context: &Context) -> Result<Value, ScenarioError> {
    let target = resolve(callee, context)?;
    let Value::Function(function) = elem(&target) else {
        return Err(ScenarioError::new(
            "EVAL_NOT_CALLABLE",
            format!(
                "\"{}\" is {} ({}), not a function.",
                callee,
                target.repr(),
                target.type_name()
            ),
        )
        .with_path(callee.to_string()));
    };
    let values = args
        .iter()
        .map(|arg| evaluate(arg, context))
        .collect::<Result<Vec<_>, _>>()?;
    if !function.arity().accepts(values.len()) {
        return Err(ScenarioError::new(
            "EVAL_CALL_ARITY",
            format!(
                "\"{}\" expects {} argument(s), got {}.",
                callee,
                function.arity(),
                values.len()
            ),
        )
        .with_path(callee.to_string()));
    }
    tracing::trace!(function = function.name(), args = values.len(), "calling function");
    function.call(&values).map_err(|error| {
        ScenarioError::new("EVAL_CALL_FAILED", error.to_string()).with_path(callee.to_string())
    })
}

fn add(left: &Value, right: &Value) -> Result<Value, ScenarioError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a
            .get()
            .checked_add(b.get())
            .and_then(|sum| i64::try_from(sum).ok())
            .map(Value::from)
            .ok_or_else(|| {
                ScenarioError::new(
                    "EVAL_ADD_OVERFLOW",
                    format!("{} + {} overflows int64.", a.get(), b.get()),
                )
            }),
        _ if left.is_numeric() && right.is_numeric() => {
            Ok(Value::from(as_f64(left) + as_f64(right)))
        }
        _ if is_any_numeric(left) && is_any_numeric(right) => add_big(left, right),
        _ => Ok(Value::String(format!("{}{}", left, right))),
    }
}

fn is_any_numeric(value: &Value) -> bool {
    value.is_numeric() || value.is_big_numeric()
}

/// Exact addition once either side is arbitrary-precision: integers stay
/// integers, anything else becomes a decimal.
fn add_big(left: &Value, right: &Value) -> Result<Value, ScenarioError> {
    let integer = |value: &Value| matches!(value, Value::Int(_) | Value::BigInt(_));
    if integer(left) && integer(right) {
        return Ok(Value::BigInt(
            numeric::to_big_int(left)? + numeric::to_big_int(right)?,
        ));
    }
    numeric::decimal_add(
        &numeric::to_big_decimal(left)?,
        &numeric::to_big_decimal(right)?,
    )
    .map(Value::BigDecimal)
}

fn as_f64(value: &Value) -> f64 {
    match value {
        Value::Int(value) => value.get() as f64,
        Value::Float(value) => value.get(),
        _ => f64::NAN,
    }
}

#[cfg(test)]
mod eval_tests {
    use super::*;
    use sc_core::{Arity, BigDecimal, Function, Number};
    use std::str::FromStr;

    fn expr(source: &str) -> Expr {
        let template = crate::Template::parse(&format!("{{{{ {} }}}}", source))
            .expect("expression should parse");
        match template.segments() {
            [crate::Segment::Expr(expr)] => expr.clone(),
            other => panic!("expected a single expression, got {:?}", other),
        }
    }

    fn context() -> Context {
        Context::new(Value::map([
            (
                "user",
                Value::ptr(Value::map([
                    ("name", Value::from("alice")),
                    ("age", Value::from(30u8)),
                ])),
            ),
            (
                "items",
                Value::Seq(vec![Value::from("x"), Value::from("y")]),
            ),
            ("codes", Value::map([(Value::from(7i64), Value::from("seven"))])),
            ("ratio", Value::from(0.5f64)),
            ("wide", Value::from(Number::new("123456789012345678901234567890"))),
            ("price", Value::from(Number::new("1.25"))),
        ]))
    }

    fn eval(source: &str) -> Result<Value, ScenarioError> {
        evaluate(&expr(source), &context())
    }

    #[test]
    fn selectors_and_indexes_walk_the_root() {
        assert_eq!(eval("user.name"), Ok(Value::from("alice")));
        assert_eq!(eval("user[\"age\"]"), Ok(Value::from(30u8)));
        assert_eq!(eval("items[1]"), Ok(Value::from("y")));
        assert_eq!(eval("codes[7]"), Ok(Value::from("seven")));
    }

    #[test]
    fn misses_name_the_key_and_path() {
        let error = eval("user.email").expect_err("missing key");
        assert_eq!(error.code, "EVAL_KEY_NOT_FOUND");
        assert_eq!(error.path.as_deref(), Some("user"));
        assert!(error.message.contains("email"));

        assert_eq!(eval("items[2]").expect_err("out of range").code, "EVAL_KEY_NOT_FOUND");
        assert_eq!(eval("nobody").expect_err("unknown").code, "EVAL_NAME_NOT_FOUND");
        assert_eq!(
            eval("items[ratio]").expect_err("float index").code,
            "EVAL_INDEX_INVALID"
        );
    }

    #[test]
    fn addition_is_numeric_or_textual() {
        assert_eq!(eval("1 + 2 + 3"), Ok(Value::from(6i64)));
        assert_eq!(eval("user.age + 1"), Ok(Value::from(31i64)));
        assert_eq!(eval("ratio + 1"), Ok(Value::from(1.5f64)));
        assert_eq!(eval("user.name + \"-\" + 1"), Ok(Value::from("alice-1")));
        assert_eq!(
            eval("9223372036854775807 + 1")
                .expect_err("overflow")
                .code,
            "EVAL_ADD_OVERFLOW"
        );
    }

    #[test]
    fn numeric_text_adds_exactly() {
        let decimal = |text: &str| Value::BigDecimal(BigDecimal::from_str(text).expect("decimal"));
        assert_eq!(eval("wide + 1"), Ok(decimal("123456789012345678901234567891")));
        assert_eq!(eval("price + ratio"), Ok(decimal("1.75")));
        assert_eq!(eval("price + \"x\""), Ok(Value::from("1.25x")));
        assert_eq!(
            eval("int(\"7\") + 1"),
            Ok(Value::from(8i64))
        );
    }

    #[test]
    fn calls_check_target_and_arity() {
        assert_eq!(eval("size(items)"), Ok(Value::from(2u64)));
        assert_eq!(eval("size(user.name)"), Ok(Value::from(5u64)));
        assert_eq!(eval("user.name(1)").expect_err("string").code, "EVAL_NOT_CALLABLE");
        assert_eq!(eval("size(1, 2)").expect_err("arity").code, "EVAL_CALL_ARITY");

        let failed = eval("int(\"abc\")").expect_err("bad number");
        assert_eq!(failed.code, "EVAL_CALL_FAILED");
        assert_eq!(failed.path.as_deref(), Some("int"));
        assert!(failed.message.contains("NUMERIC_PARSE"));
    }

    #[test]
    fn method_style_calls_resolve_through_selectors() {
        let greet = Function::new("greet", Arity::Variadic { min: 1 }, |args| {
            let names = args.iter().map(ToString::to_string).collect::<Vec<_>>();
            Ok(Value::map([("d", format!("hi {}", names.join(" ")))]))
        });
        let context = Context::new(Value::map([
            ("a", Value::map([("b", Value::Function(greet))])),
            ("c", Value::from("bob")),
        ]));
        let expr = expr("a.b(c, 1).d");
        assert_eq!(
            expr,
            Expr::selector(
                Expr::call(
                    Expr::selector(Expr::Ident("a".to_string()), "b"),
                    vec![Expr::Ident("c".to_string()), Expr::Int(1)],
                ),
                "d",
            )
        );
        assert_eq!(evaluate(&expr, &context), Ok(Value::from("hi bob 1")));
    }

    #[test]
    fn borrowed_results_avoid_copies() {
        let context = context();
        let resolved = resolve(&expr("user.name"), &context).expect("resolves");
        assert!(matches!(resolved, Cow::Borrowed(_)));
        let computed = resolve(&expr("size(items)"), &context).expect("resolves");
        assert!(matches!(computed, Cow::Owned(_)));
    }
}
