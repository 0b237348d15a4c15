use std::cell::RefCell;
use std::rc::Rc;

use crate::lang::value::Value;
use crate::runtime::runtime_error::RuntimeError;

/// Signature of a native built-in function. Returning `Ok(None)` makes the
/// VM push `nil`.
pub type BuiltinFn = fn(&[Value]) -> Result<Option<Value>, RuntimeError>;

/// An entry in the built-in function registry.
#[derive(Debug)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

/// The built-in function registry.
///
/// The order is part of the bytecode contract: `GetBuiltin` operands index
/// into this table, and the compiler registers the same names at the same
/// indices in its root symbol table. Do not reorder.
pub static BUILTINS: [Builtin; 6] = [
    Builtin {
        name: "len",
        func: len,
    },
    Builtin {
        name: "puts",
        func: puts,
    },
    Builtin {
        name: "first",
        func: first,
    },
    Builtin {
        name: "last",
        func: last,
    },
    Builtin {
        name: "rest",
        func: rest,
    },
    Builtin {
        name: "push",
        func: push,
    },
];

fn check_arity(args: &[Value], want: usize) -> Result<(), RuntimeError> {
    if args.len() != want {
        return Err(RuntimeError::new(format!(
            "wrong number of arguments. got={}, want={}",
            args.len(),
            want
        )));
    }
    Ok(())
}

/// `len(x)` — byte length of a string, or element count of an array.
fn len(args: &[Value]) -> Result<Option<Value>, RuntimeError> {
    check_arity(args, 1)?;

    match &args[0] {
        Value::Str(s) => Ok(Some(Value::Integer(s.len() as i64))),
        Value::Array(elements) => Ok(Some(Value::Integer(elements.borrow().len() as i64))),
        other => Err(RuntimeError::new(format!(
            "argument to `len` not supported, got {}",
            other.type_name()
        ))),
    }
}

/// `puts(args...)` — prints each argument on its own line, returns nil.
fn puts(args: &[Value]) -> Result<Option<Value>, RuntimeError> {
    for arg in args {
        println!("{}", arg);
    }
    Ok(None)
}

/// `first(array)` — the first element, or nil for an empty array.
fn first(args: &[Value]) -> Result<Option<Value>, RuntimeError> {
    check_arity(args, 1)?;

    match &args[0] {
        Value::Array(elements) => Ok(elements.borrow().first().cloned()),
        other => Err(RuntimeError::new(format!(
            "argument to `first` must be ARRAY, got {}",
            other.type_name()
        ))),
    }
}

/// `last(array)` — the last element, or nil for an empty array.
fn last(args: &[Value]) -> Result<Option<Value>, RuntimeError> {
    check_arity(args, 1)?;

    match &args[0] {
        Value::Array(elements) => Ok(elements.borrow().last().cloned()),
        other => Err(RuntimeError::new(format!(
            "argument to `last` must be ARRAY, got {}",
            other.type_name()
        ))),
    }
}

/// `rest(array)` — a new array of everything but the first element, or nil
/// for an empty array.
fn rest(args: &[Value]) -> Result<Option<Value>, RuntimeError> {
    check_arity(args, 1)?;

    match &args[0] {
        Value::Array(elements) => {
            let elements = elements.borrow();
            if elements.is_empty() {
                return Ok(None);
            }
            let tail: Vec<Value> = elements[1..].to_vec();
            Ok(Some(Value::Array(Rc::new(RefCell::new(tail)))))
        }
        other => Err(RuntimeError::new(format!(
            "argument to `rest` must be ARRAY, got {}",
            other.type_name()
        ))),
    }
}

/// `push(array, value)` — a new array with `value` appended. The original
/// array is left untouched.
fn push(args: &[Value]) -> Result<Option<Value>, RuntimeError> {
    check_arity(args, 2)?;

    match &args[0] {
        Value::Array(elements) => {
            let mut appended = elements.borrow().clone();
            appended.push(args[1].clone());
            Ok(Some(Value::Array(Rc::new(RefCell::new(appended)))))
        }
        other => Err(RuntimeError::new(format!(
            "argument to `push` must be ARRAY, got {}",
            other.type_name()
        ))),
    }
}
