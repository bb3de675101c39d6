use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(String),
    Str(String),
    Int(i64),
    /// `base.name`
    Selector { base: Box<Expr>, name: String },
    /// `base[index]`
    Index { base: Box<Expr>, index: Box<Expr> },
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Add { left: Box<Expr>, right: Box<Expr> },
}

impl Expr {
    pub fn selector(base: Expr, name: impl Into<String>) -> Self {
        Self::Selector {
            base: Box::new(base),
            name: name.into(),
        }
    }

    pub fn index(base: Expr, index: Expr) -> Self {
        Self::Index {
            base: Box::new(base),
            index: Box::new(index),
        }
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Self::Call {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn add(left: Expr, right: Expr) -> Self {
        Self::Add {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Canonical source form; re-parsing it yields the same tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => f.write_str(name),
            Self::Str(text) => {
                f.write_str("\"")?;
                for ch in text.chars() {
                    if ch == '"' || ch == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", ch)?;
                }
                f.write_str("\"")
            }
            Self::Int(value) => write!(f, "{}", value),
            Self::Selector { base, name } => write!(f, "{}.{}", base, name),
            Self::Index { base, index } => write!(f, "{}[{}]", base, index),
            Self::Call { callee, args } => {
                write!(f, "{}(", callee)?;
                for (position, arg) in args.iter().enumerate() {
                    if position > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            Self::Add { left, right } => write!(f, "{} + {}", left, right),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Expr(Expr),
}
