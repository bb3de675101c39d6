//! Assertions over [`Value`]s.
//!
//! [`equal`] compares with type coercion toward the actual value; [`build`]
//! turns a structured expectation into a tree of assertions.

use sc_core::{ScenarioError, Value};

mod build;
mod convert;
mod equal;

pub use build::build;
pub use convert::convert;
pub use equal::{equal, Equal};

pub trait Assertion: Send + Sync {
    fn assert(&self, actual: &Value) -> Result<(), ScenarioError>;
}
