use crate::token::{Token, TokenKind};

/// Splits template text into tokens.
///
/// Starts in raw-text mode and switches into placeholder mode after `{{`,
/// back again after `}}`. Once the input is exhausted every call returns
/// [`TokenKind::Eof`].
#[derive(Debug, Clone)]
pub struct Scanner {
    chars: Vec<char>,
    offset: usize,
    in_placeholder: bool,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            offset: 0,
            in_placeholder: false,
        }
    }

    /// 1-based position of the next unread character.
    fn pos(&self) -> usize {
        self.offset + 1
    }

    fn read(&mut self) -> Option<char> {
        let ch = self.chars.get(self.offset).copied()?;
        self.offset += 1;
        Some(ch)
    }

    fn unread(&mut self, ch: Option<char>) {
        if ch.is_some() {
            self.offset -= 1;
        }
    }

    fn skip_spaces(&mut self) {
        loop {
            let ch = self.read();
            if ch != Some(' ') {
                self.unread(ch);
                return;
            }
        }
    }

    pub fn scan(&mut self) -> Token {
        if !self.in_placeholder {
            let token = self.scan_raw_string();
            if token.kind == TokenKind::LDBrace {
                self.in_placeholder = true;
            }
            return token;
        }

        self.skip_spaces();
        let start = self.pos();
        let Some(ch) = self.read() else {
            return Token::new(TokenKind::Eof, "", start);
        };
        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBrack,
            ']' => TokenKind::RBrack,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Period,
            '+' => TokenKind::Add,
            '}' => {
                let next = self.read();
                if next == Some('}') {
                    self.in_placeholder = false;
                    return Token::new(TokenKind::RDBrace, "}}", start);
                }
                self.unread(next);
                TokenKind::Illegal
            }
            '"' => return self.scan_string(start),
            ch if ch.is_ascii_digit() => return self.scan_int(ch, start),
            ch if ch.is_alphabetic() => return self.scan_ident(ch, start),
            _ => TokenKind::Illegal,
        };
        Token::new(kind, ch.to_string(), start)
    }

    fn scan_raw_string(&mut self) -> Token {
        let start = self.pos();
        let mut text = String::new();
        loop {
            match self.read() {
                None => {
                    if text.is_empty() {
                        return Token::new(TokenKind::Eof, "", start);
                    }
                    break;
                }
                Some('{') => {
                    let next = self.read();
                    if next == Some('{') {
                        if text.is_empty() {
                            return Token::new(TokenKind::LDBrace, "{{", start);
                        }
                        self.unread(next);
                        self.unread(Some('{'));
                        break;
                    }
                    self.unread(next);
                    text.push('{');
                }
                Some(ch) => text.push(ch),
            }
        }
        Token::new(TokenKind::String, text, start)
    }

    fn scan_string(&mut self, start: usize) -> Token {
        let mut text = String::new();
        loop {
            match self.read() {
                // unterminated
                None => return Token::new(TokenKind::Illegal, text, start),
                Some('"') => break,
                Some('\\') => match self.read() {
                    Some(escaped @ ('"' | '\\')) => text.push(escaped),
                    Some(other) => {
                        text.push('\\');
                        text.push(other);
                    }
                    None => return Token::new(TokenKind::Illegal, text, start),
                },
                Some(ch) => text.push(ch),
            }
        }
        Token::new(TokenKind::String, text, start)
    }

    fn scan_int(&mut self, head: char, start: usize) -> Token {
        let mut text = String::from(head);
        loop {
            let ch = self.read();
            match ch {
                Some(digit) if digit.is_ascii_digit() => text.push(digit),
                _ => {
                    self.unread(ch);
                    break;
                }
            }
        }
        if head == '0' && text.len() > 1 {
            return Token::new(TokenKind::Illegal, text, start);
        }
        Token::new(TokenKind::Int, text, start)
    }

    fn scan_ident(&mut self, head: char, start: usize) -> Token {
        let mut text = String::from(head);
        loop {
            let ch = self.read();
            match ch {
                Some(next) if next == '-' || next == '_' || next.is_alphanumeric() => {
                    text.push(next)
                }
                _ => {
                    self.unread(ch);
                    break;
                }
            }
        }
        Token::new(TokenKind::Ident, text, start)
    }
}

impl Iterator for Scanner {
    type Item = Token;

    /// Yields tokens up to, but not including, end of input.
    fn next(&mut self) -> Option<Token> {
        let token = self.scan();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}
