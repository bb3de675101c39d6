use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{code}: {}{message}", path_prefix(.path))]
pub struct ScenarioError {
    pub code: String,
    pub message: String,
    /// 1-based character position in the template source, for lexical and
    /// syntax errors.
    pub position: Option<usize>,
    /// Path of the value being resolved or asserted when the error occurred.
    pub path: Option<String>,
}

fn path_prefix(path: &Option<String>) -> String {
    match path {
        Some(path) if !path.is_empty() => format!("{}: ", path),
        _ => String::new(),
    }
}

impl ScenarioError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            position: None,
            path: None,
        }
    }

    pub fn at(code: impl Into<String>, message: impl Into<String>, position: usize) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            position: Some(position),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Prefixes the error path with an outer segment, so nested failures
    /// read as `.body.items[0]` once they bubble up.
    pub fn prepend_path(mut self, segment: &str) -> Self {
        self.path = Some(match self.path.take() {
            Some(inner) => format!("{}{}", segment, inner),
            None => segment.to_string(),
        });
        self
    }
}
