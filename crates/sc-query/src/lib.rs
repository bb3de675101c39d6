//! Structural key and index extraction over [`Value`]s.
//!
//! Extraction never fails on an incompatible shape: anything it cannot look
//! into is simply "not found".

mod extractor;
mod query;

pub use extractor::{elem, extract, Extractor, Index, Key};
pub use query::Query;
