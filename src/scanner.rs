use crate::diagnostics;

use std::collections::HashMap;

pub const UNTERMINATED_STRING: &str = "Unterminated string.";

#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub enum TokenType {
    // Single-character tokens.
    LeftParen,
    RightParen,
    Comma,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    String,
    Number,

    // Keywords.
    And,
    Else,
    False,
    Nil,
    Or,
    Print,
    True,
    Cond,
    Cons,
    Define,
    Car,
    Cdr,

    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub ty: TokenType,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub line: usize,
    pub col: i64,
}

pub fn scan_tokens(input: &str, diagnostics: &mut diagnostics::Diagnostics) -> Vec<Token> {
    let mut scanner: Scanner = Scanner {
        source: input.chars().collect(),
        ..Default::default()
    };

    scanner.scan_tokens(diagnostics);

    scanner.tokens
}

struct Scanner {
    source: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
    col: i64,
    start_col: i64,
    keywords: HashMap<&'static str, TokenType>,
}

impl Default for Scanner {
    fn default() -> Scanner {
        Scanner {
            source: Vec::new(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            col: 0,
            start_col: 0,
            keywords: vec![
                ("and", TokenType::And),
                ("Cond", TokenType::Cond),
                ("Define", TokenType::Define),
                ("'t", TokenType::Else),
                ("false", TokenType::False),
                ("nil", TokenType::Nil),
                ("or", TokenType::Or),
                ("print", TokenType::Print),
                ("true", TokenType::True),
                ("Cons", TokenType::Cons),
                ("car", TokenType::Car),
                ("cdr", TokenType::Cdr),
            ]
            .into_iter()
            .collect(),
        }
    }
}

impl Scanner {
    fn scan_tokens(&mut self, diagnostics: &mut diagnostics::Diagnostics) {
        while !self.done() {
            self.start = self.current;
            self.start_col = self.col;
            self.scan_token(diagnostics);
        }

        self.tokens.push(Token {
            ty: TokenType::Eof,
            lexeme: String::new(),
            literal: None,
            line: self.line,
            col: self.col,
        })
    }

    fn advance(&mut self) -> char {
        self.current += 1;
        self.col += 1;

        self.source[self.current - 1]
    }

    fn add_token(&mut self, token_type: TokenType) {
        self.add_token_literal(token_type, None)
    }

    fn add_token_literal(&mut self, token_type: TokenType, literal: Option<Literal>) {
        let text = self.source[self.start..self.current].iter().collect();

        self.tokens.push(Token {
            ty: token_type,
            lexeme: text,
            literal,
            line: self.line,
            col: self.start_col,
        })
    }

    fn scan_token(&mut self, diagnostics: &mut diagnostics::Diagnostics) {
        let c = self.advance();

        match c {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            ',' => self.add_token(TokenType::Comma),
            '-' => self.add_token(TokenType::Minus),
            '+' => self.add_token(TokenType::Plus),
            ';' => self.add_token(TokenType::Semicolon),
            '*' => self.add_token(TokenType::Star),
            '=' => {
                let matches_eq = self.matches('=');
                self.add_token(if matches_eq {
                    TokenType::EqualEqual
                } else {
                    TokenType::Equal
                })
            }
            '<' => {
                let matches_eq = self.matches('=');
                self.add_token(if matches_eq {
                    TokenType::LessEqual
                } else {
                    TokenType::Less
                })
            }
            '>' => {
                let matches_eq = self.matches('=');
                self.add_token(if matches_eq {
                    TokenType::GreaterEqual
                } else {
                    TokenType::Greater
                })
            }
            '/' => {
                if self.matches('/') {
                    while self.peek() != '\n' && !self.done() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenType::Slash)
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => {
                self.line += 1;
                self.col = 0
            }
            '"' => self.string(diagnostics),
            '\'' => self.quoted_keyword(diagnostics),
            _ => {
                if Scanner::is_decimal_digit(c) {
                    self.number(diagnostics)
                } else if Scanner::is_alpha(c) {
                    self.identifier()
                } else {
                    diagnostics.report_line(self.line, self.start_col, "Unexpected character.")
                }
            }
        }
    }

    fn is_alpha(c: char) -> bool {
        c.is_ascii_alphabetic() || c == '_'
    }

    fn is_decimal_digit(c: char) -> bool {
        c.is_ascii_digit()
    }

    fn is_alphanumeric(c: char) -> bool {
        Scanner::is_alpha(c) || Scanner::is_decimal_digit(c)
    }

    fn consume_word(&mut self) {
        while Scanner::is_alphanumeric(self.peek()) {
            self.advance();
        }
    }

    fn identifier(&mut self) {
        self.consume_word();

        let literal_val: String = self.source[self.start..self.current].iter().collect();

        let token_type = match self.keywords.get(literal_val.as_str()) {
            Some(kw_token_type) => *kw_token_type,
            None => TokenType::Identifier,
        };

        self.add_token(token_type)
    }

    // A quote followed by a word is only meaningful when the whole spelling
    // is a keyword ('t). Otherwise the quote alone is rejected.
    fn quoted_keyword(&mut self, diagnostics: &mut diagnostics::Diagnostics) {
        if Scanner::is_alpha(self.peek()) {
            let saved_current = self.current;
            let saved_col = self.col;
            self.consume_word();

            let word: String = self.source[self.start..self.current].iter().collect();
            if let Some(kw_token_type) = self.keywords.get(word.as_str()) {
                let token_type = *kw_token_type;
                self.add_token(token_type);
                return;
            }

            self.current = saved_current;
            self.col = saved_col;
        }

        diagnostics.report_line(self.line, self.start_col, "Unexpected character.")
    }

    fn number(&mut self, diagnostics: &mut diagnostics::Diagnostics) {
        while Scanner::is_decimal_digit(self.peek()) {
            self.advance();
        }

        if self.peek() == '.' && Scanner::is_decimal_digit(self.peek_next()) {
            self.advance();
        }

        while Scanner::is_decimal_digit(self.peek()) {
            self.advance();
        }

        let val: String = self.source[self.start..self.current].iter().collect();
        match val.parse::<f64>() {
            Ok(n) => self.add_token_literal(TokenType::Number, Some(Literal::Number(n))),
            Err(err) => diagnostics.report_line(
                self.line,
                self.start_col,
                &format!("Invalid number literal {}: {}.", val, err),
            ),
        }
    }

    fn string(&mut self, diagnostics: &mut diagnostics::Diagnostics) {
        while self.peek() != '"' && !self.done() {
            if self.advance() == '\n' {
                self.line += 1;
                self.col = 0;
            }
        }

        if self.done() {
            diagnostics.report_line(self.line, self.col, UNTERMINATED_STRING);
            return;
        }

        // closing quote
        self.advance();

        let val: String = self.source[self.start + 1..self.current - 1].iter().collect();

        self.add_token_literal(TokenType::String, Some(Literal::Str(val)))
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            '\0'
        } else {
            self.source[self.current + 1]
        }
    }

    fn peek(&self) -> char {
        if self.done() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    fn matches(&mut self, c: char) -> bool {
        if self.done() {
            return false;
        }

        if self.source[self.current] != c {
            return false;
        }

        self.current += 1;
        self.col += 1;
        true
    }

    fn done(&self) -> bool {
        self.current >= self.source.len()
    }
}
