//! Runtime value model.
//!
//! Every value the language can produce or consume is a [`Value`].  Values are
//! immutable once built; compound payloads sit behind `Rc` so that binding,
//! looking up and passing a value around is a cheap pointer copy.

use std::fmt;
use std::rc::Rc;

use crate::ast::{Expr, Lambda};
use crate::class::{ClassInfo, Instance};
use crate::error::Result;

/// Signature of every host‑provided callable.
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value>;

/// A named host callable.  This is the single extension point of the
/// evaluator: class constructors and the prelude are both native functions.
#[derive(Clone)]
pub struct NativeFunction {
    name: Rc<str>,
    func: Rc<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: impl Into<Rc<str>>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + 'static,
    {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the host callable with the raw argument slice.
    #[inline]
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.func)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.func), Rc::as_ptr(&other.func))
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Rc<str>),
    Array(Rc<[Value]>),
    Function(Rc<Lambda>),
    NativeFunction(NativeFunction),
    Class(Rc<ClassInfo>),
    Instance(Rc<Instance>),
}

/// Borrowed view of the things a value can do when it sits in call
/// position.  The dispatcher matches on this rather than on `Value` itself.
#[derive(Debug, Clone, Copy)]
pub enum Callable<'a> {
    Function(&'a Rc<Lambda>),
    Native(&'a NativeFunction),
}

impl Value {
    // ───────────────────────────── constructors ─────────────────────────────

    #[inline]
    pub fn nil() -> Self {
        Value::Nil
    }

    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn float(n: f64) -> Self {
        Value::Float(n)
    }

    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    pub fn array(values: Vec<Value>) -> Self {
        Value::Array(values.into())
    }

    pub fn function(params: Vec<String>, body: Expr) -> Self {
        Value::Function(Lambda::new(params, body))
    }

    pub fn native<F>(name: impl Into<Rc<str>>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + 'static,
    {
        Value::NativeFunction(NativeFunction::new(name, func))
    }

    // ───────────────────────────── capabilities ─────────────────────────────

    /// Boolean coercion used by `if`, `or` and `and`.  Only `nil` and
    /// `false` are falsy.
    pub fn truthiness(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Stable variant name, for diagnostics only.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Function(_) => "function",
            Value::NativeFunction(_) => "native function",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
        }
    }

    /// `Some` when the value may appear in call position.
    pub fn as_callable(&self) -> Option<Callable<'_>> {
        match self {
            Value::Function(function) => Some(Callable::Function(function)),
            Value::NativeFunction(native) => Some(Callable::Native(native)),
            _ => None,
        }
    }

    /// Like `Display`, but strings are quoted.  Used for values nested in
    /// arrays and instances.
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            other => write!(f, "{}", other),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::NativeFunction(a), Value::NativeFunction(b)) => a == b,
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => {
                Rc::ptr_eq(a.class(), b.class()) && a.fields().eq(b.fields())
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),

            Value::Bool(b) => write!(f, "{}", b),

            Value::Int(n) => {
                let mut buf: itoa::Buffer = itoa::Buffer::new();
                f.write_str(buf.format(*n))
            }

            Value::Float(n) => {
                if n.is_finite() && n.fract() == 0.0 {
                    write!(f, "{:.1}", n)
                } else {
                    write!(f, "{}", n)
                }
            }

            Value::String(s) => write!(f, "{}", s),

            Value::Array(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    value.fmt_nested(f)?;
                }
                write!(f, "]")
            }

            Value::Function(function) => write!(f, "<fn({})>", function.params.join(" ")),

            Value::NativeFunction(native) => write!(f, "<native fn {}>", native.name()),

            Value::Class(class) => write!(f, "<class {}>", class.name()),

            Value::Instance(instance) => {
                write!(f, "{}{{", instance.class().name())?;
                for (i, (field, value)) in instance.fields().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: ", field)?;
                    value.fmt_nested(f)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}
