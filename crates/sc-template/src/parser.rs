use sc_core::ScenarioError;

use crate::ast::{Expr, Segment};
use crate::scanner::Scanner;
use crate::template::Template;
use crate::token::{Token, TokenKind};

/// Recursive-descent parser with a single token of look-ahead.
///
/// ```text
/// primary := IDENT [ "(" args ")" ] | STRING | INT
/// postfix := primary ( "." IDENT [ "(" args ")" ] | "[" sum "]" )*
/// sum     := postfix ( "+" postfix )*
/// args    := [ sum ( "," sum )* ]
/// ```
pub struct Parser {
    source: String,
    scanner: Scanner,
    peeked: Option<Token>,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            scanner: Scanner::new(source),
            peeked: None,
        }
    }

    pub fn parse(mut self) -> Result<Template, ScenarioError> {
        let mut segments = Vec::new();
        loop {
            let token = self.next();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::String => segments.push(Segment::Text(token.literal)),
                TokenKind::LDBrace => {
                    let expr = self.parse_sum()?;
                    self.expect(TokenKind::RDBrace)?;
                    segments.push(Segment::Expr(expr));
                }
                _ => return Err(unexpected(token)),
            }
        }
        Ok(Template::from_parts(self.source, segments))
    }

    fn next(&mut self) -> Token {
        match self.peeked.take() {
            Some(token) => token,
            None => Scanner::scan(&mut self.scanner),
        }
    }

    fn peek(&mut self) -> TokenKind {
        let scanner = &mut self.scanner;
        self.peeked.get_or_insert_with(|| scanner.scan()).kind
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ScenarioError> {
        let token = self.next();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(unexpected(token))
        }
    }

    fn parse_sum(&mut self) -> Result<Expr, ScenarioError> {
        let mut left = self.parse_postfix()?;
        while self.peek() == TokenKind::Add {
            self.next();
            let right = self.parse_postfix()?;
            left = Expr::add(left, right);
        }
        Ok(left)
    }

    fn parse_postfix(&mut self) -> Result<Expr, ScenarioError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek() {
                TokenKind::Period => {
                    self.next();
                    let name = self.expect(TokenKind::Ident)?;
                    expr = Expr::selector(expr, name.literal);
                    expr = self.parse_call_suffix(expr)?;
                }
                TokenKind::LBrack => {
                    self.next();
                    let index = self.parse_sum()?;
                    self.expect(TokenKind::RBrack)?;
                    expr = Expr::index(expr, index);
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ScenarioError> {
        let token = self.next();
        match token.kind {
            TokenKind::Ident => self.parse_call_suffix(Expr::Ident(token.literal)),
            TokenKind::String => Ok(Expr::Str(token.literal)),
            TokenKind::Int => token.literal.parse::<i64>().map(Expr::Int).map_err(|_| {
                ScenarioError::at(
                    "TEMPLATE_INT_RANGE",
                    format!("Integer literal \"{}\" does not fit in int64.", token.literal),
                    token.pos,
                )
            }),
            _ => Err(unexpected(token)),
        }
    }

    fn parse_call_suffix(&mut self, callee: Expr) -> Result<Expr, ScenarioError> {
        if self.peek() != TokenKind::LParen {
            return Ok(callee);
        }
        self.next();
        let mut args = Vec::new();
        if self.peek() == TokenKind::RParen {
            self.next();
            return Ok(Expr::call(callee, args));
        }
        loop {
            args.push(self.parse_sum()?);
            let token = self.next();
            match token.kind {
                TokenKind::Comma => continue,
                TokenKind::RParen => return Ok(Expr::call(callee, args)),
                _ => return Err(unexpected(token)),
            }
        }
    }
}

fn unexpected(token: Token) -> ScenarioError {
    match token.kind {
        TokenKind::Illegal => ScenarioError::at(
            "TEMPLATE_ILLEGAL_TOKEN",
            format!("Illegal token \"{}\" at position {}.", token.literal, token.pos),
            token.pos,
        ),
        TokenKind::Eof => ScenarioError::at(
            "TEMPLATE_UNCLOSED",
            format!("Placeholder is not closed at position {}.", token.pos),
            token.pos,
        ),
        kind => ScenarioError::at(
            "TEMPLATE_UNEXPECTED_TOKEN",
            format!(
                "Unexpected token \"{}\" ({}) at position {}.",
                token.literal, kind, token.pos
            ),
            token.pos,
        ),
    }
}
