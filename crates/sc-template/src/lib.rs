//! `{{ ... }}` templates: scanning, parsing and evaluation against a
//! [`Context`].

mod ast;
mod builtins;
mod context;
mod eval;
mod parser;
mod scanner;
mod template;
mod token;

pub use ast::{Expr, Segment};
pub use builtins::register_builtins;
pub use context::Context;
pub use eval::evaluate;
pub use parser::Parser;
pub use scanner::Scanner;
pub use template::{execute_value, Template};
pub use token::{Token, TokenKind};
