use std::fmt;
use std::str::FromStr;

use sc_core::{MapItem, ScenarioError, Value};

use crate::ast::Segment;
use crate::context::Context;
use crate::eval::resolve;
use crate::parser::Parser;

/// A parsed template: raw text interleaved with `{{ ... }}` expressions.
///
/// Parsing is done once; the same template can be executed any number of
/// times, from any number of threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, ScenarioError> {
        Parser::new(source).parse()
    }

    pub(crate) fn from_parts(source: String, segments: Vec<Segment>) -> Self {
        Self { source, segments }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// A template made of exactly one expression yields that expression's
    /// value as is. Anything else is rendered into a string.
    #[tracing::instrument(skip_all, level = "trace", fields(source = %self.source))]
    pub fn execute(&self, context: &Context) -> Result<Value, ScenarioError> {
        if let [Segment::Expr(expr)] = self.segments.as_slice() {
            return resolve(expr, context).map(|value| value.into_owned());
        }
        let mut rendered = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => rendered.push_str(text),
                Segment::Expr(expr) => {
                    let value = resolve(expr, context)?;
                    rendered.push_str(&value.to_string());
                }
            }
        }
        Ok(Value::String(rendered))
    }

    pub fn render(&self, context: &Context) -> Result<String, ScenarioError> {
        Ok(match self.execute(context)? {
            Value::String(text) => text,
            other => other.to_string(),
        })
    }
}

impl FromStr for Template {
    type Err = ScenarioError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::parse(source)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Executes every string found inside `value` as a template, keeping the
/// surrounding structure. Map keys are executed too.
pub fn execute_value(value: &Value, context: &Context) -> Result<Value, ScenarioError> {
    Ok(match value {
        Value::String(text) => Template::parse(text)?.execute(context)?,
        Value::Seq(values) => Value::Seq(
            values
                .iter()
                .map(|value| execute_value(value, context))
                .collect::<Result<_, _>>()?,
        ),
        Value::Map(entries) => Value::Map(
            entries
                .iter()
                .map(|(key, value)| {
                    Ok((execute_value(key, context)?, execute_value(value, context)?))
                })
                .collect::<Result<_, ScenarioError>>()?,
        ),
        Value::MapSlice(items) => Value::MapSlice(
            items
                .iter()
                .map(|item| execute_item(item, context))
                .collect::<Result<_, _>>()?,
        ),
        Value::MapItem(item) => Value::MapItem(Box::new(execute_item(item, context)?)),
        Value::Ref(Some(inner)) => Value::Ref(Some(Box::new(execute_value(inner, context)?))),
        other => other.clone(),
    })
}

fn execute_item(item: &MapItem, context: &Context) -> Result<MapItem, ScenarioError> {
    Ok(MapItem {
        key: execute_value(&item.key, context)?,
        value: execute_value(&item.value, context)?,
    })
}
