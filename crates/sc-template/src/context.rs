use std::borrow::Cow;

use sc_core::{Function, FunctionRegistry, Value};

use crate::builtins::register_builtins;

/// Everything a template can name: a root value searched with the query
/// engine, and a registry of callable functions.
#[derive(Debug, Clone)]
pub struct Context {
    root: Value,
    functions: FunctionRegistry,
}

impl Context {
    /// A context over `root` with the builtin functions registered.
    pub fn new(root: impl Into<Value>) -> Self {
        let mut functions = FunctionRegistry::new();
        register_builtins(&mut functions);
        Self::with_functions(root, functions)
    }

    pub fn with_functions(root: impl Into<Value>, functions: FunctionRegistry) -> Self {
        Self {
            root: root.into(),
            functions,
        }
    }

    pub fn empty() -> Self {
        Self::new(Value::Nil)
    }

    pub fn with_function(mut self, function: Function) -> Self {
        self.functions.register(function);
        self
    }

    pub fn register(&mut self, function: Function) {
        self.functions.register(function);
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Root keys shadow registered functions of the same name.
    pub fn lookup(&self, name: &str) -> Option<Cow<'_, Value>> {
        sc_query::extract(&self.root, name).or_else(|| {
            self.functions
                .get(name)
                .map(|function| Cow::Owned(Value::Function(function.clone())))
        })
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::empty()
    }
}
