// src/parser.rs
//! Path expression tokenizer.
//!
//! An expression is a run of segments: `.` separators, `[key]` brackets and
//! bare keys. A bare key is an identifier, a decimal integer or a
//! double-quoted string. Inside brackets a decimal float literal is also a
//! key. Whitespace between tokens is skipped.

use itertools::Itertools;

use crate::errors::SyntaxError;

const IDENT: &str = "identifier";
const NUMBER: &str = "number";
const STRING: &str = "string";

/// Splits `expr` into its keys, left to right.
///
/// An expression without any key (`""`, `"."`, `"..."`) yields a single
/// empty key, which resolves to the input unchanged.
pub fn parse(expr: &str) -> Result<Vec<String>, SyntaxError> {
    Parser::new(expr).parse_keys()
}

pub(crate) struct Parser<'a> {
    s: &'a str,
    i: usize,
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(s: &'a str) -> Self {
        Self {
            s,
            i: 0,
            line: 1,
            column: 1,
        }
    }

    pub(crate) fn parse_keys(&mut self) -> Result<Vec<String>, SyntaxError> {
        let mut keys = Vec::new();
        loop {
            self.skip_ws();
            match self.peek_char() {
                None => break,
                Some('.') => self.bump(),
                Some('[') => keys.push(self.parse_bracketed_key()?),
                Some(_) => keys.push(self.parse_key(false)?),
            }
        }
        if keys.is_empty() {
            keys.push(String::new());
        }
        Ok(keys)
    }

    fn parse_bracketed_key(&mut self) -> Result<String, SyntaxError> {
        self.expect('[')?;
        self.skip_ws();
        let key = self.parse_key(true)?;
        self.skip_ws();
        self.expect(']')?;
        Ok(key)
    }

    /// One identifier, number or quoted string.
    fn parse_key(&mut self, bracketed: bool) -> Result<String, SyntaxError> {
        match self.peek_char() {
            Some(c) if c == '_' || c.is_alphabetic() => Ok(self.parse_identifier()),
            Some(c) if c.is_ascii_digit() => Ok(self.parse_number(bracketed)),
            Some('"') => self.parse_quoted_string(),
            found => Err(self.unexpected(&[IDENT, NUMBER, STRING], found)),
        }
    }

    fn parse_identifier(&mut self) -> String {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if c == '_' || c.is_alphanumeric() {
                self.bump();
            } else {
                break;
            }
        }
        self.s[start..self.i].to_string()
    }

    /// Digits, plus a fractional part when `allow_fraction` is set. Outside
    /// brackets a `.` is always a separator.
    fn parse_number(&mut self, allow_fraction: bool) -> String {
        let start = self.i;
        self.eat_digits();
        if allow_fraction
            && self.peek_char() == Some('.')
            && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.bump();
            self.eat_digits();
        }
        self.s[start..self.i].to_string()
    }

    fn eat_digits(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// A double-quoted literal with the quotes stripped. `\"` stands for a
    /// quote; every other backslash is kept verbatim.
    fn parse_quoted_string(&mut self) -> Result<String, SyntaxError> {
        let (line, column) = (self.line, self.column);
        self.expect('"')?;
        let mut out = String::new();
        while let Some(c) = self.peek_char() {
            match c {
                '"' => {
                    self.bump();
                    return Ok(out);
                }
                '\n' => break,
                '\\' => {
                    self.bump();
                    if self.consume_char('"') {
                        out.push('"');
                    } else {
                        out.push('\\');
                    }
                }
                _ => {
                    self.bump();
                    out.push(c);
                }
            }
        }
        Err(SyntaxError::new("string literal not terminated", line, column))
    }

    fn expect(&mut self, c: char) -> Result<(), SyntaxError> {
        if self.consume_char(c) {
            Ok(())
        } else {
            let wanted = format!("\"{c}\"");
            Err(self.unexpected(&[wanted.as_str()], self.peek_char()))
        }
    }

    fn consume_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.s[self.i..].chars().nth(n)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek_char() {
            self.i += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek_char() {
            if matches!(c, ' ' | '\t' | '\r' | '\n') {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// Error at the current position naming what was expected and what is there.
    fn unexpected(&self, expected: &[&str], found: Option<char>) -> SyntaxError {
        let found = match found {
            Some(c) => format!("\"{c}\""),
            None => "EOF".to_string(),
        };
        let message = format!("expected {}, found {}", one_of(expected), found);
        SyntaxError::new(message, self.line, self.column)
    }
}

fn one_of(kinds: &[&str]) -> String {
    match kinds.split_last() {
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => format!("{} or {}", rest.iter().join(", "), last),
        None => "nothing".to_string(),
    }
}
