use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use crate::interpreter::ast::{Block, Expr, Node, Program, Stmt};
use crate::interpreter::builtins;
use crate::interpreter::environment::{Environment, RecursionToParent};
use crate::interpreter::error::RuntimeError;
use crate::interpreter::object::{Function, HashObject, HashPair, Object, ObjectType};

#[cfg(test)]
mod tests;

/// Non-local exits that unwind through blocks until something handles them.
#[derive(Debug, PartialEq)]
pub enum Signal {
    /// Caught at the nearest function call, or at the top of the program.
    Return(Object),
    /// Never caught; ends the whole program.
    Error(RuntimeError),
}

impl From<RuntimeError> for Signal {
    fn from(err: RuntimeError) -> Self {
        Signal::Error(err)
    }
}

type EvalResult = Result<Object, Signal>;

/// Tree-walking evaluator. `puts` writes to `output`.
pub struct Evaluator<W: Write> {
    output: W,
}

impl<W: Write> Evaluator<W> {
    pub fn new(output: W) -> Evaluator<W> {
        Evaluator { output }
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Evaluates a whole program. A top-level `return` yields its value;
    /// a failure yields the [`Object::Error`] that stopped it.
    pub fn evaluate_program(&mut self, program: &Program, env: &Rc<RefCell<Environment>>) -> Object {
        tracing::debug!(statements = program.statements.len(), "evaluating program");

        let result = match self.eval_statements(&program.statements, env) {
            Ok(value) | Err(Signal::Return(value)) => value,
            Err(Signal::Error(err)) => Object::Error(err),
        };

        tracing::debug!(result = %result.object_type(), "program finished");
        result
    }

    /// Evaluates any node. Unlike [`Evaluator::evaluate_program`], a `return`
    /// inside a statement or expression comes back as [`Object::Return`].
    pub fn evaluate(&mut self, node: Node<'_>, env: &Rc<RefCell<Environment>>) -> Object {
        let result = match node {
            Node::Program(program) => return self.evaluate_program(program, env),
            Node::Stmt(stmt) => self.eval_statement(stmt, env),
            Node::Expr(expr) => self.eval_expr(expr, env),
        };

        match result {
            Ok(value) => value,
            Err(Signal::Return(value)) => Object::Return(Box::new(value)),
            Err(Signal::Error(err)) => Object::Error(err),
        }
    }

    // Statements

    fn eval_statements(&mut self, statements: &[Stmt], env: &Rc<RefCell<Environment>>) -> EvalResult {
        let mut result = Object::NULL;

        for stmt in statements {
            tracing::trace!(statement = %stmt, "evaluating statement");
            result = self.eval_statement(stmt, env)?;
        }

        Ok(result)
    }

    fn eval_statement(&mut self, stmt: &Stmt, env: &Rc<RefCell<Environment>>) -> EvalResult {
        match stmt {
            Stmt::Let { name, value, .. } => {
                let value = match value {
                    Some(value) => self.eval_expr(value, env)?,
                    None => Object::NULL,
                };

                Ok(env.borrow_mut().set(name.name(), value))
            },
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.eval_expr(value, env)?,
                    None => Object::NULL,
                };

                Err(Signal::Return(value))
            },
            Stmt::Expression { expr, .. } => self.eval_expr(expr, env),
            Stmt::Block(block) => self.eval_block(block, env),
        }
    }

    fn eval_block(&mut self, block: &Block, env: &Rc<RefCell<Environment>>) -> EvalResult {
        self.eval_statements(&block.statements, env)
    }

    // Expressions

    fn eval_expr(&mut self, expr: &Expr, env: &Rc<RefCell<Environment>>) -> EvalResult {
        match expr {
            Expr::Identifier(identifier) => self.eval_identifier(identifier.name(), env),
            Expr::Integer { value, .. } => Ok(Object::Integer(*value)),
            Expr::Boolean { value, .. } => Ok(Object::from(*value)),
            Expr::String { value, .. } => Ok(Object::string(value.as_str())),
            Expr::Array { elements, .. } => Ok(Object::array(self.eval_expressions(elements, env)?)),
            Expr::Hash { pairs, .. } => self.eval_hash_literal(pairs, env),
            Expr::Prefix { operator, right } => {
                let right = self.eval_expr(right, env)?;
                Ok(Self::eval_prefix_expr(operator.source(), right)?)
            },
            Expr::Infix { left, operator, right } => {
                let left = self.eval_expr(left, env)?;
                let right = self.eval_expr(right, env)?;
                Ok(Self::eval_infix_expr(operator.source(), left, right)?)
            },
            Expr::If { condition, consequence, alternative, .. } => {
                let condition = self.eval_expr(condition, env)?;

                if condition.is_truthy() {
                    self.eval_block(consequence, env)
                } else if let Some(alternative) = alternative {
                    self.eval_block(alternative, env)
                } else {
                    Ok(Object::NULL)
                }
            },
            Expr::Function(literal) => Ok(Object::Function(Rc::new(Function {
                literal: Rc::clone(literal),
                env: Rc::clone(env),
            }))),
            Expr::Call { callee, args, .. } => {
                let callee = self.eval_expr(callee, env)?;
                let args = self.eval_expressions(args, env)?;
                self.apply_function(callee, args)
            },
            Expr::Index { target, index, .. } => {
                let target = self.eval_expr(target, env)?;
                let index = self.eval_expr(index, env)?;
                Ok(Self::eval_index_expr(target, index)?)
            },
        }
    }

    fn eval_identifier(&mut self, name: &str, env: &Rc<RefCell<Environment>>) -> EvalResult {
        let found = env.borrow().find_variable(name, RecursionToParent::Always);

        if let Some(value) = found {
            return Ok(value);
        }

        match builtins::lookup(name) {
            Some(builtin) => Ok(Object::Builtin(builtin)),
            None => Err(RuntimeError::IdentifierNotFound(name.to_owned()).into()),
        }
    }

    fn eval_expressions(&mut self, exprs: &[Expr], env: &Rc<RefCell<Environment>>) -> Result<Vec<Object>, Signal> {
        exprs.iter().map(|expr| self.eval_expr(expr, env)).collect()
    }

    fn eval_hash_literal(&mut self, pairs: &[(Expr, Expr)], env: &Rc<RefCell<Environment>>) -> EvalResult {
        let mut hash = HashObject::default();

        for (key_expr, value_expr) in pairs {
            let key = self.eval_expr(key_expr, env)?;
            let hash_key = key.hash_key()
                .ok_or_else(|| RuntimeError::UnusableAsHashKey(key.object_type()))?;
            let value = self.eval_expr(value_expr, env)?;

            hash.pairs.insert(hash_key, HashPair { key, value });
        }

        Ok(Object::Hash(Rc::new(hash)))
    }

    fn eval_prefix_expr(operator: &str, right: Object) -> Result<Object, RuntimeError> {
        match (operator, &right) {
            ("!", _) => Ok(Object::from(!right.is_truthy())),
            ("-", Object::Integer(value)) => Ok(Object::Integer(value.wrapping_neg())),
            _ => Err(RuntimeError::UnknownPrefixOperator { operator: operator.to_owned(), right: right.object_type() }),
        }
    }

    fn eval_infix_expr(operator: &str, left: Object, right: Object) -> Result<Object, RuntimeError> {
        match (&left, &right) {
            (Object::String(left), _) if operator == "+" => Self::eval_string_concatenation(left, &right),
            _ if left.object_type() != right.object_type() => Err(RuntimeError::TypeMismatch {
                left: left.object_type(), operator: operator.to_owned(), right: right.object_type(),
            }),
            (Object::Integer(left), Object::Integer(right)) => Self::eval_integer_infix_expr(operator, *left, *right),
            _ if operator == "==" => Ok(Object::from(left == right)),
            _ if operator == "!=" => Ok(Object::from(left != right)),
            _ => Err(RuntimeError::UnknownInfixOperator {
                left: left.object_type(), operator: operator.to_owned(), right: right.object_type(),
            }),
        }
    }

    fn eval_string_concatenation(left: &str, right: &Object) -> Result<Object, RuntimeError> {
        match right {
            Object::String(right) => Ok(Object::string(format!("{}{}", left, right))),
            Object::Integer(right) => Ok(Object::string(format!("{}{}", left, right))),
            Object::Boolean(right) => Ok(Object::string(format!("{}{}", left, right))),
            other => Err(RuntimeError::UnknownInfixOperator {
                left: ObjectType::String,
                operator: String::from("+"),
                right: other.object_type(),
            }),
        }
    }

    fn eval_integer_infix_expr(operator: &str, left: i64, right: i64) -> Result<Object, RuntimeError> {
        Ok(match operator {
            "+" => Object::Integer(left.wrapping_add(right)),
            "-" => Object::Integer(left.wrapping_sub(right)),
            "*" => Object::Integer(left.wrapping_mul(right)),
            "/" if right == 0 => return Err(RuntimeError::DivisionByZero),
            "/" => Object::Integer(left.wrapping_div(right)),
            "<" => Object::from(left < right),
            ">" => Object::from(left > right),
            "==" => Object::from(left == right),
            "!=" => Object::from(left != right),
            _ => return Err(RuntimeError::UnknownInfixOperator {
                left: ObjectType::Integer,
                operator: operator.to_owned(),
                right: ObjectType::Integer,
            }),
        })
    }

    fn eval_index_expr(target: Object, index: Object) -> Result<Object, RuntimeError> {
        match (&target, &index) {
            (Object::Array(elements), Object::Integer(i)) => Ok(usize::try_from(*i).ok()
                .and_then(|i| elements.get(i))
                .cloned()
                .unwrap_or(Object::NULL)),
            (Object::Hash(hash), _) => {
                let key = index.hash_key()
                    .ok_or_else(|| RuntimeError::UnusableAsHashKey(index.object_type()))?;

                Ok(hash.get(&key).cloned().unwrap_or(Object::NULL))
            },
            _ => Err(RuntimeError::IndexNotSupported(target.object_type())),
        }
    }

    fn apply_function(&mut self, callee: Object, args: Vec<Object>) -> EvalResult {
        match callee {
            Object::Function(function) => {
                let params = &function.literal.params;

                if params.len() != args.len() {
                    return Err(RuntimeError::WrongArgumentCount { got: args.len(), wanted: params.len() }.into());
                }

                tracing::debug!(function = %function.literal, args = args.len(), "calling function");

                let scope = Environment::new_enclosed(Rc::clone(&function.env));

                {
                    let mut scope = scope.borrow_mut();

                    for (param, arg) in params.iter().zip(args) {
                        scope.set(param.name(), arg);
                    }
                }

                match self.eval_block(&function.literal.body, &scope) {
                    Ok(value) | Err(Signal::Return(value)) => Ok(value),
                    Err(err) => Err(err),
                }
            },
            Object::Builtin(builtin) => {
                tracing::debug!(builtin = builtin.name, args = args.len(), "calling builtin");
                Ok((builtin.func)(&args, &mut self.output)?)
            },
            other => Err(RuntimeError::NotAFunction(other.object_type()).into()),
        }
    }
}
