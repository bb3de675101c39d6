use std::borrow::Cow;
use std::fmt;

use sc_core::{ScenarioError, Value};

use crate::extractor::{Extractor, Index, Key};

/// A chain of extractors applied left to right.
#[derive(Default)]
pub struct Query {
    steps: Vec<Box<dyn Extractor + Send + Sync>>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(self, key: impl Into<String>) -> Self {
        self.append(Key::new(key))
    }

    pub fn index(self, index: usize) -> Self {
        self.append(Index::new(index))
    }

    pub fn append(mut self, step: impl Extractor + Send + Sync + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn extract<'v>(&self, value: &'v Value) -> Result<Cow<'v, Value>, ScenarioError> {
        let mut current = Cow::Borrowed(value);
        let mut walked = String::new();
        for step in &self.steps {
            let next = match current {
                Cow::Borrowed(inner) => step.extract(inner),
                Cow::Owned(ref inner) => step.extract(inner).map(|found| Cow::Owned(found.into_owned())),
            };
            current = next.ok_or_else(|| {
                ScenarioError::new(
                    "QUERY_NOT_FOUND",
                    format!("\"{}\" not found.", step),
                )
                .with_path(walked.clone())
            })?;
            walked.push_str(&step.to_string());
        }
        Ok(current)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Query({})", self)
    }
}
