pub mod error;
pub mod function;
mod json;
pub mod numeric;
pub mod record;
pub mod value;

pub use error::ScenarioError;
pub use function::{Arity, Function, FunctionRegistry};
pub use record::{FieldDef, FieldTable, Record, RecordSchema, RecordSchemaBuilder};
pub use value::*;

pub use bigdecimal::BigDecimal;
pub use num_bigint::BigInt;
