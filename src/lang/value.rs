use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::bytecode::op::Instructions;
use crate::lang::builtins::Builtin;
use crate::lang::node::Expr;

/// Runtime value.
///
/// Every value the virtual machine can put on its stack is one of these
/// variants. Heap values (strings, arrays, hashes, functions, closures) are
/// reference-shared through `Rc`; arrays and hashes additionally allow
/// interior mutation through `RefCell`. Booleans and nil are plain variants,
/// so any code path that "creates" them yields the canonical instance.
#[derive(Debug, Clone)]
pub enum Value {
    /// 64-bit signed integer.
    Integer(i64),

    /// 64-bit IEEE-754 floating-point number.
    Float(f64),

    /// Boolean value.
    Boolean(bool),

    /// The absence of a value.
    Nil,

    /// Immutable UTF-8 string.
    Str(Rc<str>),

    /// Ordered sequence of values, shared by reference.
    Array(Rc<RefCell<Vec<Value>>>),

    /// Hash map from hashable keys to key/value pairs, shared by reference.
    Hash(Rc<RefCell<HashMap<HashKey, HashPair>>>),

    /// A compiled function body, frozen by the compiler.
    Function(Rc<CompiledFunction>),

    /// A compiled function plus its captured free variables.
    Closure(Rc<Closure>),

    /// A native built-in function.
    Builtin(&'static Builtin),

    /// An AST fragment held as a first-class value. Produced only by the
    /// macro expansion collaborator; the VM never constructs one.
    Quote(Rc<Expr>),
}

/// Key under which a hashable value is stored in a hash map.
///
/// Derived `Eq`/`Hash` give a stable, equality-respecting key: string keys
/// hash by content, so two distinct string instances with the same text
/// address the same entry. Floats key on their bit pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Float(u64),
    Boolean(bool),
    Str(Rc<str>),
}

/// A hash map entry. The original key value is kept alongside the value so
/// entries can be printed back in surface form.
#[derive(Debug, Clone)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

/// A function body lowered to bytecode.
#[derive(Debug)]
pub struct CompiledFunction {
    pub instructions: Instructions,
    /// Number of local bindings, parameters included.
    pub num_locals: usize,
    pub num_parameters: usize,
}

/// A compiled function bundled with the values it captured at creation.
#[derive(Debug)]
pub struct Closure {
    pub func: Rc<CompiledFunction>,
    pub free: Vec<Value>,
}

impl Value {
    /// The type name used in runtime error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Float(_) => "FLOAT",
            Value::Boolean(_) => "BOOLEAN",
            Value::Nil => "NIL",
            Value::Str(_) => "STRING",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::Function(_) => "FUNCTION",
            Value::Closure(_) => "CLOSURE",
            Value::Builtin(_) => "BUILTIN",
            Value::Quote(_) => "QUOTE",
        }
    }

    /// Returns the hash key for this value, or `None` if the value is not
    /// hashable. Only integers, floats, booleans, and strings are hashable.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(n) => Some(HashKey::Integer(*n)),
            Value::Float(n) => Some(HashKey::Float(n.to_bits())),
            Value::Boolean(b) => Some(HashKey::Boolean(*b)),
            Value::Str(s) => Some(HashKey::Str(Rc::clone(s))),
            _ => None,
        }
    }

    pub fn is_hashable(&self) -> bool {
        self.hash_key().is_some()
    }
}

impl fmt::Display for Value {
    /// Formats a value the way the REPL prints results.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Nil => write!(f, "nil"),
            Value::Str(s) => write!(f, "{}", s),
            Value::Array(elements) => {
                let elems: Vec<String> =
                    elements.borrow().iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", elems.join(", "))
            }
            Value::Hash(pairs) => {
                let pairs: Vec<String> = pairs
                    .borrow()
                    .values()
                    .map(|p| format!("{}: {}", p.key, p.value))
                    .collect();
                write!(f, "{{{}}}", pairs.join(", "))
            }
            Value::Function(func) => {
                write!(f, "<compiled fn/{}>", func.num_parameters)
            }
            Value::Closure(closure) => {
                write!(f, "<closure fn/{}>", closure.func.num_parameters)
            }
            Value::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name),
            Value::Quote(expr) => write!(f, "QUOTE({})", expr),
        }
    }
}

/// Convenience constructors used by the VM and the builtins.
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s.as_str()))
    }
}
