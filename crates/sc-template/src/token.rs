use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,
    Illegal,
    LDBrace, // {{
    RDBrace, // }}
    Ident,
    String,
    Int,
    LParen, // (
    RParen, // )
    LBrack, // [
    RBrack, // ]
    Comma,  // ,
    Period, // .
    Add,    // +
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Eof => "EOF",
            Self::Illegal => "ILLEGAL",
            Self::LDBrace => "{{",
            Self::RDBrace => "}}",
            Self::Ident => "IDENT",
            Self::String => "STRING",
            Self::Int => "INT",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrack => "[",
            Self::RBrack => "]",
            Self::Comma => ",",
            Self::Period => ".",
            Self::Add => "+",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    /// 1-based character position where the token starts.
    pub pos: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, pos: usize) -> Self {
        Self {
            kind,
            literal: literal.into(),
            pos,
        }
    }
}
