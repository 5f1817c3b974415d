use crate::scanner;

use std::fmt;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Kind {
    Lexical,
    Syntax,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Location {
    Line,
    AtEnd,
    At(String),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Diagnostic {
    pub kind: Kind,
    pub line: usize,
    pub col: i64,
    pub location: Location,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.location {
            Location::Line => write!(f, "[line {}] Error: {}", self.line, self.message),
            Location::AtEnd => write!(f, "[line {}] Error at end: {}", self.line, self.message),
            Location::At(lexeme) => write!(
                f,
                "[line {}] Error at '{}': {}",
                self.line, lexeme, self.message
            ),
        }
    }
}

/*
Collects every lexical and syntax error of one run. A fresh collector is used
per run; the caller decides what to do once scanning and parsing are over.
*/
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn report_line(&mut self, line: usize, col: i64, message: &str) {
        self.errors.push(Diagnostic {
            kind: Kind::Lexical,
            line,
            col,
            location: Location::Line,
            message: message.into(),
        })
    }

    pub fn report_token(&mut self, token: &scanner::Token, message: &str) {
        let location = match token.ty {
            scanner::TokenType::Eof => Location::AtEnd,
            _ => Location::At(token.lexeme.clone()),
        };

        self.errors.push(Diagnostic {
            kind: Kind::Syntax,
            line: token.line,
            col: token.col,
            location,
            message: message.into(),
        })
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.errors.iter()
    }
}
