use thiserror::Error;
use crate::interpreter::object::ObjectType;

/// A failed evaluation. The `Display` text is the message shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),
    #[error("unknown operator: {operator}{right}")]
    UnknownPrefixOperator {
        operator: String,
        right: ObjectType,
    },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: ObjectType,
        operator: String,
        right: ObjectType,
    },
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: ObjectType,
        operator: String,
        right: ObjectType,
    },
    #[error("not a function: {0}")]
    NotAFunction(ObjectType),
    #[error("unusable as hash key: {0}")]
    UnusableAsHashKey(ObjectType),
    #[error("index operator not supported: {0}")]
    IndexNotSupported(ObjectType),
    #[error("division by zero")]
    DivisionByZero,
    #[error("wrong number of arguments. got={got}, wanted={wanted}")]
    WrongArgumentCount {
        got: usize,
        wanted: usize,
    },
    #[error("argument to `{function}` not supported, got {got}")]
    UnsupportedArgument {
        function: &'static str,
        got: ObjectType,
    },
    #[error("argument to `{function}` must be {expected}, got {got}")]
    ArgumentType {
        function: &'static str,
        expected: ObjectType,
        got: ObjectType,
    },
    #[error("failed to write output: {0}")]
    Output(String),
}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::Output(err.to_string())
    }
}
