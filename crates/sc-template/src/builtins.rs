use sc_core::{numeric, Arity, Function, FunctionRegistry, ScenarioError, Value};
use sc_query::elem;

pub fn register_builtins(registry: &mut FunctionRegistry) {
    registry.register(Function::new("size", Arity::Fixed(1), |args| size(&args[0])));
    registry.register(Function::new("int", Arity::Fixed(1), |args| {
        numeric::to_i64(elem(&args[0])).map(Value::from)
    }));
    registry.register(Function::new("float", Arity::Fixed(1), |args| {
        numeric::to_f64(elem(&args[0])).map(Value::from)
    }));
    registry.register(Function::new("string", Arity::Fixed(1), |args| {
        Ok(Value::String(args[0].to_string()))
    }));
}

fn size(value: &Value) -> Result<Value, ScenarioError> {
    let length = match elem(value) {
        Value::Seq(values) => values.len(),
        Value::Map(entries) => entries.len(),
        Value::MapSlice(items) => items.len(),
        Value::String(text) => text.chars().count(),
        Value::Named(text) => text.as_str().chars().count(),
        other => {
            return Err(ScenarioError::new(
                "EVAL_ARGUMENT_INVALID",
                format!("size() does not accept {} ({}).", other.repr(), other.type_name()),
            ))
        }
    };
    Ok(Value::from(length as u64))
}
