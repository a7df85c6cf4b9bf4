use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::Chars;
use lazy_static::lazy_static;
use crate::util;


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPos {
    pub line: i32,
    pub column: i32,
}

impl TokenPos {
    pub fn new(line: i32, column: i32) -> TokenPos {
        TokenPos { line, column }
    }

    pub fn begin() -> TokenPos {
        TokenPos::new(1, 1)
    }
}

impl Display for TokenPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {} column {}]", self.line, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenType {
    Illegal,

    ParenthesisLeft, ParenthesisRight,
    BracketLeft, BracketRight,
    SquareBracketLeft, SquareBracketRight,
    Comma, Semicolon, Colon,

    Assign, Equal,
    Not, NotEqual,
    Greater, Less,

    Plus, Minus,
    Multiply, Divide,

    Identifier,
    Int,
    String,

    // Keywords
    Function,
    Let,
    True, False,
    If, Else,
    Return,

    // EOF
    Eof,
}

impl Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            TokenType::Illegal => "illegal",
            TokenType::ParenthesisLeft => "(",
            TokenType::ParenthesisRight => ")",
            TokenType::BracketLeft => "{",
            TokenType::BracketRight => "}",
            TokenType::SquareBracketLeft => "[",
            TokenType::SquareBracketRight => "]",
            TokenType::Comma => ",",
            TokenType::Semicolon => ";",
            TokenType::Colon => ":",
            TokenType::Assign => "=",
            TokenType::Equal => "==",
            TokenType::Not => "!",
            TokenType::NotEqual => "!=",
            TokenType::Greater => ">",
            TokenType::Less => "<",
            TokenType::Plus => "+",
            TokenType::Minus => "-",
            TokenType::Multiply => "*",
            TokenType::Divide => "/",
            TokenType::Identifier => "identifier",
            TokenType::Int => "integer",
            TokenType::String => "string",
            TokenType::Function => "fn",
            TokenType::Let => "let",
            TokenType::True => "true",
            TokenType::False => "false",
            TokenType::If => "if",
            TokenType::Else => "else",
            TokenType::Return => "return",
            TokenType::Eof => "EOF",
        })
    }
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = HashMap::from([
        ("fn", TokenType::Function),
        ("let", TokenType::Let),
        ("true", TokenType::True),
        ("false", TokenType::False),
        ("if", TokenType::If),
        ("else", TokenType::Else),
        ("return", TokenType::Return),
    ]);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    token_type: TokenType,
    source: String,
    start: TokenPos, end: TokenPos,
}

impl Token {
    pub fn new(token_type: TokenType, source: String, start: TokenPos, end: TokenPos) -> Token {
        Token {
            token_type, source,
            start, end
        }
    }

    pub fn eof() -> Token {
        Token {
            token_type: TokenType::Eof,
            source: String::new(),
            start: TokenPos::begin(), end: TokenPos::begin(),
        }
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn source(&self) -> &str { &self.source }
    pub fn start(&self) -> &TokenPos { &self.start }
    pub fn end(&self) -> &TokenPos { &self.end }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::Eof => f.write_str("EOF"),
            TokenType::String => write!(f, "\"{}\"", self.source),
            _ => f.write_str(&self.source),
        }
    }
}

/// Pull-based tokenizer. Never fails: unknown characters come back as
/// [`TokenType::Illegal`] and an exhausted input yields [`TokenType::Eof`] forever.
pub struct Lexer<'source> {
    input: &'source str,

    chars: Chars<'source>,
    peek_1: Option<char>,

    start_index: usize,
    current_index: usize,

    start_pos: TokenPos,
    current_pos: TokenPos,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Lexer<'source> {
        Lexer {
            input: source,

            chars: source.chars(),
            peek_1: None,

            start_index: 0,
            current_index: 0,

            start_pos: TokenPos::begin(),
            current_pos: TokenPos::begin(),
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start_index = self.current_index;
        self.start_pos = self.current_pos;

        let c = match self.consume() {
            Some(c) => c,
            None => return self.make_token(TokenType::Eof),
        };

        match c {
            '(' => self.make_token(TokenType::ParenthesisLeft),
            ')' => self.make_token(TokenType::ParenthesisRight),
            '{' => self.make_token(TokenType::BracketLeft),
            '}' => self.make_token(TokenType::BracketRight),
            '[' => self.make_token(TokenType::SquareBracketLeft),
            ']' => self.make_token(TokenType::SquareBracketRight),
            ',' => self.make_token(TokenType::Comma),
            ';' => self.make_token(TokenType::Semicolon),
            ':' => self.make_token(TokenType::Colon),

            '=' => if self.expect('=') { self.make_token(TokenType::Equal) } else {
                self.make_token(TokenType::Assign)
            },
            '!' => if self.expect('=') { self.make_token(TokenType::NotEqual) } else {
                self.make_token(TokenType::Not)
            },
            '>' => self.make_token(TokenType::Greater),
            '<' => self.make_token(TokenType::Less),

            '+' => self.make_token(TokenType::Plus),
            '-' => self.make_token(TokenType::Minus),
            '*' => self.make_token(TokenType::Multiply),
            '/' => self.make_token(TokenType::Divide),

            '"' => self.scan_string(),
            c if util::is_numeric(c) => self.scan_number(),
            c if util::is_alphabetic(c) => self.scan_identifier(),

            _ => self.make_token(TokenType::Illegal),
        }
    }

    fn scan_string(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }

            self.consume();
        }

        let content_end = self.current_index;
        self.consume(); // the trailing '"', if the string was terminated

        // Don't add leading and trailing '"' characters to token
        Token {
            token_type: TokenType::String,
            source: self.input[(self.start_index + 1)..content_end].to_owned(),
            start: self.start_pos, end: self.current_pos,
        }
    }

    fn scan_number(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_numeric(c) {
                break;
            }

            self.consume();
        }

        self.make_token(TokenType::Int)
    }

    fn scan_identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_alphanumeric(c) {
                break;
            }

            self.consume();
        }

        let name = &self.input[self.start_index..self.current_index];
        let token_type = KEYWORDS.get(name).copied().unwrap_or(TokenType::Identifier);

        Token { source: name.to_owned(), token_type, start: self.start_pos, end: self.current_pos }
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token {
            token_type,
            source: self.input[self.start_index..self.current_index].to_owned(),

            start: self.start_pos, end: self.current_pos,
        }
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek_1.take().or_else(|| self.chars.next())?;
        self.current_index += c.len_utf8();

        if c == '\n' {
            self.current_pos.line += 1;
            self.current_pos.column = 1;
        } else {
            self.current_pos.column += 1;
        }

        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        if self.peek_1.is_none() {
            self.peek_1 = self.chars.next();
        }

        self.peek_1
    }

    fn expect(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.consume();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !matches!(c, ' ' | '\t' | '\r' | '\n') {
                return;
            }

            self.consume();
        }
    }
}

/// Yields tokens up to, but not including, the end of input.
impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();

        if token.token_type() == TokenType::Eof {
            None
        } else {
            Some(token)
        }
    }
}
