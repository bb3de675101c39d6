use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ScenarioError;
use crate::value::Value;

type FunctionBody = dyn Fn(&[Value]) -> Result<Value, ScenarioError> + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    Variadic { min: usize },
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Fixed(expected) => count == expected,
            Self::Variadic { min } => count >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(expected) => write!(f, "{}", expected),
            Self::Variadic { min } => write!(f, "at least {}", min),
        }
    }
}

/// A named invocable taking positional arguments.
#[derive(Clone)]
pub struct Function {
    name: String,
    arity: Arity,
    body: Arc<FunctionBody>,
}

impl Function {
    pub fn new<F>(name: impl Into<String>, arity: Arity, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, ScenarioError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, ScenarioError> {
        if !self.arity.accepts(args.len()) {
            return Err(ScenarioError::new(
                "EVAL_CALL_ARITY",
                format!(
                    "Function \"{}\" expects {} argument(s), got {}.",
                    self.name,
                    self.arity,
                    args.len()
                ),
            ));
        }
        (self.body)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, Function>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `function` under its own name, replacing an earlier one.
    pub fn register(&mut self, function: Function) {
        self.functions.insert(function.name().to_string(), function);
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, ScenarioError> {
        let function = self.get(name).ok_or_else(|| {
            ScenarioError::new(
                "EVAL_NAME_NOT_FOUND",
                format!("Function \"{}\" is not registered.", name),
            )
        })?;
        function.call(args)
    }
}

#[cfg(test)]
mod function_tests {
    use super::*;

    fn echo() -> Function {
        Function::new("echo", Arity::Fixed(1), |args| Ok(args[0].clone()))
    }

    #[test]
    fn call_checks_arity_before_running() {
        let error = echo().call(&[]).expect_err("arity should be enforced");
        assert_eq!(error.code, "EVAL_CALL_ARITY");
        assert_eq!(
            echo().call(&[Value::from("x")]).expect("call should pass"),
            Value::from("x")
        );
    }

    #[test]
    fn variadic_arity_accepts_minimum_and_more() {
        let arity = Arity::Variadic { min: 1 };
        assert!(!arity.accepts(0));
        assert!(arity.accepts(1));
        assert!(arity.accepts(3));
        assert_eq!(arity.to_string(), "at least 1");
    }

    #[test]
    fn registry_resolves_by_name() {
        let mut registry = FunctionRegistry::new();
        registry.register(echo());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["echo"]);
        assert_eq!(
            registry
                .call("echo", &[Value::from(1i64)])
                .expect("registered call"),
            Value::from(1i64)
        );
        let missing = registry.call("nope", &[]).expect_err("missing function");
        assert_eq!(missing.code, "EVAL_NAME_NOT_FOUND");
    }

    #[test]
    fn functions_compare_by_identity() {
        let function = echo();
        assert_eq!(function, function.clone());
        assert_ne!(function, echo());
    }
}
