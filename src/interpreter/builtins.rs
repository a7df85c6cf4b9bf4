use std::collections::HashMap;
use std::io::Write;
use lazy_static::lazy_static;
use crate::interpreter::error::RuntimeError;
use crate::interpreter::object::{Builtin, Object, ObjectType};

lazy_static! {
    static ref BUILTINS: HashMap<&'static str, Builtin> = [
        Builtin { name: "len", func: len },
        Builtin { name: "first", func: first },
        Builtin { name: "last", func: last },
        Builtin { name: "rest", func: rest },
        Builtin { name: "push", func: push },
        Builtin { name: "puts", func: puts },
    ].into_iter().map(|builtin| (builtin.name, builtin)).collect();
}

pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.get(name).copied()
}

fn expect_arg_count(args: &[Object], wanted: usize) -> Result<(), RuntimeError> {
    if args.len() != wanted {
        return Err(RuntimeError::WrongArgumentCount { got: args.len(), wanted });
    }

    Ok(())
}

fn expect_array<'a>(function: &'static str, arg: &'a Object) -> Result<&'a [Object], RuntimeError> {
    match arg {
        Object::Array(elements) => Ok(elements.as_slice()),
        other => Err(RuntimeError::ArgumentType { function, expected: ObjectType::Array, got: other.object_type() }),
    }
}

fn len(args: &[Object], _: &mut dyn Write) -> Result<Object, RuntimeError> {
    expect_arg_count(args, 1)?;

    match &args[0] {
        Object::String(value) => Ok(Object::Integer(value.chars().count() as i64)),
        Object::Array(elements) => Ok(Object::Integer(elements.len() as i64)),
        other => Err(RuntimeError::UnsupportedArgument { function: "len", got: other.object_type() }),
    }
}

fn first(args: &[Object], _: &mut dyn Write) -> Result<Object, RuntimeError> {
    expect_arg_count(args, 1)?;
    let elements = expect_array("first", &args[0])?;

    Ok(elements.first().cloned().unwrap_or(Object::NULL))
}

fn last(args: &[Object], _: &mut dyn Write) -> Result<Object, RuntimeError> {
    expect_arg_count(args, 1)?;
    let elements = expect_array("last", &args[0])?;

    Ok(elements.last().cloned().unwrap_or(Object::NULL))
}

fn rest(args: &[Object], _: &mut dyn Write) -> Result<Object, RuntimeError> {
    expect_arg_count(args, 1)?;
    let elements = expect_array("rest", &args[0])?;

    match elements.split_first() {
        Some((_, tail)) => Ok(Object::array(tail.to_vec())),
        None => Ok(Object::NULL),
    }
}

fn push(args: &[Object], _: &mut dyn Write) -> Result<Object, RuntimeError> {
    expect_arg_count(args, 2)?;
    let elements = expect_array("push", &args[0])?;

    let mut pushed = Vec::with_capacity(elements.len() + 1);
    pushed.extend_from_slice(elements);
    pushed.push(args[1].clone());

    Ok(Object::array(pushed))
}

fn puts(args: &[Object], out: &mut dyn Write) -> Result<Object, RuntimeError> {
    for arg in args {
        writeln!(out, "{}", arg.inspect())?;
    }

    Ok(Object::NULL)
}
