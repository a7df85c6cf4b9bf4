use std::collections::HashMap;
use std::rc::Rc;
use lazy_static::lazy_static;
use crate::interpreter::ast::{Block, Expr, FunctionLiteral, Identifier, Program, Stmt};
use crate::interpreter::lexer::{Lexer, Token, TokenType};


#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,      // == !=
    LessGreater, // < >
    Sum,         // + -
    Product,     // * /
    Prefix,      // -x !x
    Call,        // f(x) a[i]
}

lazy_static! {
    static ref PRECEDENCES: HashMap<TokenType, Precedence> = HashMap::from([
        (TokenType::Equal, Precedence::Equals),
        (TokenType::NotEqual, Precedence::Equals),
        (TokenType::Less, Precedence::LessGreater),
        (TokenType::Greater, Precedence::LessGreater),
        (TokenType::Plus, Precedence::Sum),
        (TokenType::Minus, Precedence::Sum),
        (TokenType::Multiply, Precedence::Product),
        (TokenType::Divide, Precedence::Product),
        (TokenType::ParenthesisLeft, Precedence::Call),
        (TokenType::SquareBracketLeft, Precedence::Call),
    ]);
}

type PrefixParseFn<'source> = fn(&mut Parser<'source>) -> Option<Expr>;
type InfixParseFn<'source> = fn(&mut Parser<'source>, Expr) -> Option<Expr>;

/// Pratt parser over a [`Lexer`].
///
/// Never aborts: diagnostics are collected in [`Parser::errors`] and parsing
/// resumes after the construct that failed.
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    current: Token, peek: Token,

    errors: Vec<String>,
}

impl<'source> Parser<'source> {
    pub fn new(lexer: Lexer<'source>) -> Parser<'source> {
        let mut parser = Parser {
            lexer,
            current: Token::eof(), peek: Token::eof(),
            errors: Vec::new(),
        };

        parser.consume();
        parser.consume();
        parser
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    // Statement parsing

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.check(TokenType::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }

            self.consume();
        }

        tracing::debug!(statements = statements.len(), errors = self.errors.len(), "parsed program");
        Program { statements }
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.current.token_type() {
            TokenType::Let => self.parse_let_statement(),
            TokenType::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    // let <identifier> = <expression>;
    fn parse_let_statement(&mut self) -> Option<Stmt> {
        let token = self.current.clone();

        // Each missing piece is reported on its own, so one bad `let` can yield several errors
        let name = if self.expect_peek(TokenType::Identifier) {
            Some(Identifier::new(self.current.clone()))
        } else { None };

        self.expect_peek(TokenType::Assign);
        self.consume();

        let value = self.parse_expression(Precedence::Lowest);
        self.skip_statement_end();

        name.map(|name| Stmt::Let { token, name, value })
    }

    // return [<expression>];
    fn parse_return_statement(&mut self) -> Option<Stmt> {
        let token = self.current.clone();

        if self.peek_is(TokenType::Semicolon) || self.peek_is(TokenType::BracketRight) || self.peek_is(TokenType::Eof) {
            self.skip_statement_end();
            return Some(Stmt::Return { token, value: None });
        }

        self.consume();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_statement_end();

        Some(Stmt::Return { token, value: Some(value) })
    }

    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let token = self.current.clone();
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.skip_statement_end();

        Some(Stmt::Expression { token, expr })
    }

    // { <statement>* }
    fn parse_block(&mut self) -> Block {
        let token = self.current.clone();
        let mut statements = Vec::new();

        self.consume();

        while !self.check(TokenType::BracketRight) && !self.check(TokenType::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }

            self.consume();
        }

        if self.check(TokenType::Eof) {
            self.expected_error(TokenType::BracketRight, TokenType::Eof);
        }

        Block { token, statements }
    }

    // Expression parsing

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        let prefix = match Self::prefix_parse_fn(self.current.token_type()) {
            Some(prefix) => prefix,
            None => {
                self.error(format!("no prefix parse function for `{}` found", self.current));
                return None;
            },
        };

        let mut left = prefix(self)?;

        while !self.peek_is(TokenType::Semicolon) && precedence < self.peek_precedence() {
            let infix = match Self::infix_parse_fn(self.peek.token_type()) {
                Some(infix) => infix,
                None => return Some(left),
            };

            self.consume();
            left = infix(self, left)?;
        }

        Some(left)
    }

    fn prefix_parse_fn(token_type: TokenType) -> Option<PrefixParseFn<'source>> {
        let parse_fn: PrefixParseFn<'source> = match token_type {
            TokenType::Identifier => Self::parse_identifier,
            TokenType::Int => Self::parse_integer_literal,
            TokenType::String => Self::parse_string_literal,
            TokenType::True | TokenType::False => Self::parse_boolean_literal,
            TokenType::Not | TokenType::Minus => Self::parse_prefix_expression,
            TokenType::ParenthesisLeft => Self::parse_grouped_expression,
            TokenType::If => Self::parse_if_expression,
            TokenType::Function => Self::parse_function_literal,
            TokenType::SquareBracketLeft => Self::parse_array_literal,
            TokenType::BracketLeft => Self::parse_hash_literal,
            _ => return None,
        };

        Some(parse_fn)
    }

    fn infix_parse_fn(token_type: TokenType) -> Option<InfixParseFn<'source>> {
        let parse_fn: InfixParseFn<'source> = match token_type {
            TokenType::Plus | TokenType::Minus
            | TokenType::Multiply | TokenType::Divide
            | TokenType::Equal | TokenType::NotEqual
            | TokenType::Less | TokenType::Greater => Self::parse_infix_expression,
            TokenType::ParenthesisLeft => Self::parse_call_expression,
            TokenType::SquareBracketLeft => Self::parse_index_expression,
            _ => return None,
        };

        Some(parse_fn)
    }

    fn parse_identifier(&mut self) -> Option<Expr> {
        Some(Expr::Identifier(Identifier::new(self.current.clone())))
    }

    fn parse_integer_literal(&mut self) -> Option<Expr> {
        let token = self.current.clone();

        match token.source().parse::<i64>() {
            Ok(value) => Some(Expr::Integer { token, value }),
            Err(_) => {
                self.error(format!("could not parse `{}` as integer", token.source()));
                None
            },
        }
    }

    fn parse_string_literal(&mut self) -> Option<Expr> {
        let token = self.current.clone();
        let value = token.source().to_owned();

        Some(Expr::String { token, value })
    }

    fn parse_boolean_literal(&mut self) -> Option<Expr> {
        Some(Expr::Boolean { token: self.current.clone(), value: self.check(TokenType::True) })
    }

    // <prefix><expression>
    fn parse_prefix_expression(&mut self) -> Option<Expr> {
        let operator = self.current.clone();

        self.consume();
        let right = self.parse_expression(Precedence::Prefix)?;

        Some(Expr::Prefix { operator, right: Box::new(right) })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.consume();
        let expr = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::ParenthesisRight) {
            return None;
        }

        Some(expr)
    }

    // if (<condition>) <block> [else <block>]
    fn parse_if_expression(&mut self) -> Option<Expr> {
        let token = self.current.clone();

        if !self.expect_peek(TokenType::ParenthesisLeft) {
            return None;
        }

        self.consume();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::ParenthesisRight) || !self.expect_peek(TokenType::BracketLeft) {
            return None;
        }

        let consequence = self.parse_block();
        let mut alternative = None;

        if self.peek_is(TokenType::Else) {
            self.consume();

            if !self.expect_peek(TokenType::BracketLeft) {
                return None;
            }

            alternative = Some(self.parse_block());
        }

        Some(Expr::If { token, condition: Box::new(condition), consequence, alternative })
    }

    // fn (<params>) <block>
    fn parse_function_literal(&mut self) -> Option<Expr> {
        let token = self.current.clone();

        if !self.expect_peek(TokenType::ParenthesisLeft) {
            return None;
        }

        let params = self.parse_function_parameters()?;

        if !self.expect_peek(TokenType::BracketLeft) {
            return None;
        }

        let body = self.parse_block();
        Some(Expr::Function(Rc::new(FunctionLiteral { token, params, body })))
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut params = Vec::new();

        if self.peek_is(TokenType::ParenthesisRight) {
            self.consume();
            return Some(params);
        }

        if !self.expect_peek(TokenType::Identifier) {
            return None;
        }

        params.push(Identifier::new(self.current.clone()));

        while self.peek_is(TokenType::Comma) {
            self.consume();

            if !self.expect_peek(TokenType::Identifier) {
                return None;
            }

            params.push(Identifier::new(self.current.clone()));
        }

        if !self.expect_peek(TokenType::ParenthesisRight) {
            return None;
        }

        Some(params)
    }

    fn parse_array_literal(&mut self) -> Option<Expr> {
        let token = self.current.clone();
        let elements = self.parse_expression_list(TokenType::SquareBracketRight)?;

        Some(Expr::Array { token, elements })
    }

    // { <key>: <value>, ... }
    fn parse_hash_literal(&mut self) -> Option<Expr> {
        let token = self.current.clone();
        let mut pairs = Vec::new();

        while !self.peek_is(TokenType::BracketRight) {
            self.consume();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(TokenType::Colon) {
                return None;
            }

            self.consume();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.peek_is(TokenType::BracketRight) && !self.expect_peek(TokenType::Comma) {
                return None;
            }
        }

        if !self.expect_peek(TokenType::BracketRight) {
            return None;
        }

        Some(Expr::Hash { token, pairs })
    }

    // <expression> <infix-operator> <expression>
    fn parse_infix_expression(&mut self, left: Expr) -> Option<Expr> {
        let operator = self.current.clone();
        let precedence = self.current_precedence();

        self.consume();
        let right = self.parse_expression(precedence)?;

        Some(Expr::Infix { left: Box::new(left), operator, right: Box::new(right) })
    }

    fn parse_call_expression(&mut self, callee: Expr) -> Option<Expr> {
        let token = self.current.clone();
        let args = self.parse_expression_list(TokenType::ParenthesisRight)?;

        Some(Expr::Call { token, callee: Box::new(callee), args })
    }

    fn parse_index_expression(&mut self, target: Expr) -> Option<Expr> {
        let token = self.current.clone();

        self.consume();
        let index = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::SquareBracketRight) {
            return None;
        }

        Some(Expr::Index { token, target: Box::new(target), index: Box::new(index) })
    }

    fn parse_expression_list(&mut self, end: TokenType) -> Option<Vec<Expr>> {
        let mut list = Vec::new();

        if self.peek_is(end) {
            self.consume();
            return Some(list);
        }

        self.consume();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenType::Comma) {
            self.consume();

            if self.peek_is(end) {
                break;
            }

            self.consume();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }

    // Token handling

    fn consume(&mut self) {
        self.current = std::mem::replace(&mut self.peek, self.lexer.next_token());
    }

    fn expect_peek(&mut self, token_type: TokenType) -> bool {
        if self.peek_is(token_type) {
            self.consume();
            return true;
        }

        self.expected_error(token_type, self.peek.token_type());
        false
    }

    #[inline]
    fn skip_statement_end(&mut self) {
        if self.peek_is(TokenType::Semicolon) {
            self.consume();
        }
    }

    #[inline]
    fn check(&self, token_type: TokenType) -> bool {
        self.current.token_type() == token_type
    }

    #[inline]
    fn peek_is(&self, token_type: TokenType) -> bool {
        self.peek.token_type() == token_type
    }

    fn peek_precedence(&self) -> Precedence {
        PRECEDENCES.get(&self.peek.token_type()).copied().unwrap_or(Precedence::Lowest)
    }

    fn current_precedence(&self) -> Precedence {
        PRECEDENCES.get(&self.current.token_type()).copied().unwrap_or(Precedence::Lowest)
    }

    // Error handling

    fn expected_error(&mut self, expected: TokenType, actual: TokenType) {
        self.error(format!("expected next token to be `{}`, but got `{}` instead", expected, actual));
    }

    fn error(&mut self, message: String) {
        tracing::trace!(at = %self.current.start(), %message, "parse error");
        self.errors.push(message);
    }
}
