pub mod lexer;
pub mod ast;
pub mod parser;
pub mod object;
pub mod environment;
pub mod error;
pub mod builtins;
pub mod evaluator;

use crate::interpreter::ast::Program;
use crate::interpreter::lexer::Lexer;
use crate::interpreter::parser::Parser;

/// Parses `source` into a program. Errors are collected rather than
/// fatal, so the returned program holds every statement that parsed.
pub fn parse(source: &str) -> (Program, Vec<String>) {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();

    (program, parser.into_errors())
}
