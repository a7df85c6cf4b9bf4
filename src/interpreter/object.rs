use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::rc::Rc;
use indexmap::IndexMap;
use crate::interpreter::ast::FunctionLiteral;
use crate::interpreter::environment::Environment;
use crate::interpreter::error::RuntimeError;


#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Integer,
    Boolean,
    String,
    Null,
    Array,
    Hash,
    Function,
    Builtin,
    Return,
    Error,
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ObjectType::Integer => "Integer",
            ObjectType::Boolean => "Boolean",
            ObjectType::String => "String",
            ObjectType::Null => "Null",
            ObjectType::Array => "Array",
            ObjectType::Hash => "Hash",
            ObjectType::Function => "Function",
            ObjectType::Builtin => "Builtin",
            ObjectType::Return => "Return",
            ObjectType::Error => "Error",
        })
    }
}

/// Content-derived key of a hashable [`Object`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub object_type: ObjectType,
    pub bits: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HashObject {
    pub pairs: IndexMap<HashKey, HashPair>,
}

impl HashObject {
    pub fn get(&self, key: &HashKey) -> Option<&Object> {
        self.pairs.get(key).map(|pair| &pair.value)
    }
}

/// A closure: the literal plus the scope it was evaluated in.
pub struct Function {
    pub literal: Rc<FunctionLiteral>,
    pub env: Rc<RefCell<Environment>>,
}

impl Debug for Function {
    // The captured scope may hold this very function
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Function({})", self.literal)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

pub type BuiltinFunction = fn(&[Object], &mut dyn Write) -> Result<Object, RuntimeError>;

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFunction,
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
    Null,
    Array(Rc<Vec<Object>>),
    Hash(Rc<HashObject>),
    Function(Rc<Function>),
    Return(Box<Object>),
    Error(RuntimeError),
    Builtin(Builtin),
}

impl Object {
    pub const TRUE: Object = Object::Boolean(true);
    pub const FALSE: Object = Object::Boolean(false);
    pub const NULL: Object = Object::Null;

    pub fn string(value: impl Into<Rc<str>>) -> Object {
        Object::String(value.into())
    }

    pub fn array(elements: Vec<Object>) -> Object {
        Object::Array(Rc::new(elements))
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::String(_) => ObjectType::String,
            Object::Null => ObjectType::Null,
            Object::Array(_) => ObjectType::Array,
            Object::Hash(_) => ObjectType::Hash,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_) => ObjectType::Builtin,
            Object::Return(_) => ObjectType::Return,
            Object::Error(_) => ObjectType::Error,
        }
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }

    /// `None` when the value cannot be used as a hash key.
    pub fn hash_key(&self) -> Option<HashKey> {
        let bits = match self {
            Object::Integer(value) => *value as u64,
            Object::Boolean(value) => u64::from(*value),
            Object::String(value) => {
                let mut hasher = DefaultHasher::new();
                value.hash(&mut hasher);
                hasher.finish()
            },
            _ => return None,
        };

        Some(HashKey { object_type: self.object_type(), bits })
    }

    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        if value { Object::TRUE } else { Object::FALSE }
    }
}

impl From<i64> for Object {
    fn from(value: i64) -> Self {
        Object::Integer(value)
    }
}

impl From<RuntimeError> for Object {
    fn from(err: RuntimeError) -> Self {
        Object::Error(err)
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::String(value) => f.write_str(value),
            Object::Null => f.write_str("null"),
            Object::Array(elements) => write!(f, "[{}]", elements.iter()
                .map(|element| element.to_string()).collect::<Vec<String>>()
                .join(", ")),
            Object::Hash(hash) => write!(f, "{{{}}}", hash.pairs.values()
                .map(|pair| format!("{}: {}", pair.key, pair.value)).collect::<Vec<String>>()
                .join(", ")),
            Object::Function(function) => write!(f, "{}", function.literal),
            Object::Builtin(builtin) => write!(f, "builtin function {}", builtin.name),
            Object::Return(value) => write!(f, "{}", value),
            Object::Error(err) => write!(f, "ERROR: {}", err),
        }
    }
}
