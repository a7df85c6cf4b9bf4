use std::fmt::{Display, Formatter};
use std::rc::Rc;
use crate::interpreter::lexer::Token;

/// Any node the evaluator can be pointed at.
#[derive(Clone, Copy, Debug)]
pub enum Node<'a> {
    Program(&'a Program),
    Stmt(&'a Stmt),
    Expr(&'a Expr),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Identifier {
    pub token: Token,
}

impl Identifier {
    pub fn new(token: Token) -> Identifier {
        Identifier { token }
    }

    pub fn name(&self) -> &str {
        self.token.source()
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub token: Token, // `{`
    pub statements: Vec<Stmt>,
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ {} }}", self.statements.iter()
            .map(|stmt| stmt.to_string())
            .collect::<Vec<String>>().join(" "))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Let {
        token: Token,
        name: Identifier,
        value: Option<Expr>,
    },
    Return {
        token: Token,
        value: Option<Expr>,
    },
    Expression {
        token: Token, // first token of the expression
        expr: Expr,
    },
    Block(Block),
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Let { token, name, value } => write!(f, "{} {} = {};", token.source(), name,
                value.as_ref().map(|value| value.to_string()).unwrap_or_default()),
            Stmt::Return { token, value: Some(value) } => write!(f, "{} {};", token.source(), value),
            Stmt::Return { token, value: None } => write!(f, "{};", token.source()),
            Stmt::Expression { expr, .. } => write!(f, "{}", expr),
            Stmt::Block(block) => write!(f, "{}", block),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionLiteral {
    pub token: Token, // `fn`
    pub params: Vec<Identifier>,
    pub body: Block,
}

impl Display for FunctionLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}) {}", self.token.source(), self.params.iter()
            .map(|param| param.name().to_owned())
            .collect::<Vec<String>>().join(", "), self.body)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Identifier(Identifier),
    Integer {
        token: Token,
        value: i64,
    },
    Boolean {
        token: Token,
        value: bool,
    },
    String {
        token: Token,
        value: String,
    },
    Array {
        token: Token,
        elements: Vec<Expr>,
    },
    Hash {
        token: Token,
        pairs: Vec<(Expr, Expr)>,
    },

    Prefix {
        operator: Token,
        right: Box<Expr>,
    },
    Infix {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    If {
        token: Token,
        condition: Box<Expr>,
        consequence: Block,
        alternative: Option<Block>,
    },
    Function(Rc<FunctionLiteral>),
    Call {
        token: Token, // `(`
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Index {
        token: Token, // `[`
        target: Box<Expr>,
        index: Box<Expr>,
    },
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Identifier(identifier) => write!(f, "{}", identifier),
            Expr::Integer { value, .. } => write!(f, "{}", value),
            Expr::Boolean { value, .. } => write!(f, "{}", value),
            Expr::String { value, .. } => write!(f, "\"{}\"", value),
            Expr::Array { elements, .. } => write!(f, "[{}]", elements.iter()
                .map(|element| element.to_string()).collect::<Vec<String>>()
                .join(", ")),
            Expr::Hash { pairs, .. } => write!(f, "{{{}}}", pairs.iter()
                .map(|(key, value)| format!("{}: {}", key, value)).collect::<Vec<String>>()
                .join(", ")),
            Expr::Prefix { operator, right } => write!(f, "({}{})", operator.source(), right),
            Expr::Infix { left, operator, right } => write!(f, "({} {} {})", left, operator.source(), right),
            Expr::If { condition, consequence, alternative, .. } => {
                write!(f, "if ({}) {}", condition, consequence)?;

                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }

                Ok(())
            },
            Expr::Function(literal) => write!(f, "{}", literal),
            Expr::Call { callee, args, .. } => write!(f, "{}({})", callee, args.iter()
                .map(|arg| arg.to_string())
                .collect::<Vec<String>>().join(", ")),
            Expr::Index { target, index, .. } => write!(f, "({}[{}])", target, index),
        }
    }
}
