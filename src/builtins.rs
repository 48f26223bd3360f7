//! Native prelude installed into the global scope of a fresh interpreter.

use std::cmp::Ordering;
use std::rc::Rc;

use log::debug;

use crate::environment::GlobalScope;
use crate::error::{LangError, Result};
use crate::value::Value;

/// Register every prelude function in `globals`.
pub fn install(globals: &GlobalScope) {
    debug!("Installing native prelude");

    let natives: [(&str, fn(&[Value]) -> Result<Value>); 13] = [
        ("print", print),
        ("str", concat),
        ("+", add),
        ("-", sub),
        ("*", mul),
        ("/", div),
        ("=", equal),
        ("<", less),
        (">", greater),
        ("not", not),
        ("len", len),
        ("get", get),
        ("class-of", class_of),
    ];

    for (name, func) in natives {
        globals.define(name, Value::native(name, func));
    }
}

fn expect_arity(name: &str, args: &[Value], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(LangError::arity(name, expected, args.len()));
    }

    Ok(())
}

fn print(args: &[Value]) -> Result<Value> {
    let line: Vec<String> = args.iter().map(Value::to_string).collect();
    println!("{}", line.join(" "));

    Ok(Value::Nil)
}

fn concat(args: &[Value]) -> Result<Value> {
    let joined: String = args.iter().map(Value::to_string).collect();

    Ok(Value::string(joined))
}

// ───────────────────────────── arithmetic ─────────────────────────────

/// Apply a binary numeric operator.  `Int op Int` stays an integer (overflow
/// is an error); anything involving a float is computed in floating point.
fn arithmetic(
    name: &str,
    args: &[Value],
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value> {
    expect_arity(name, args, 2)?;

    match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(b)) => int_op(*a, *b)
            .map(Value::Int)
            .ok_or_else(|| {
                LangError::native(format!("{}: integer overflow or division by zero", name))
            }),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(float_op(*a as f64, *b))),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(float_op(*a, *b as f64))),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(float_op(*a, *b))),
        (a, b) => Err(LangError::native(format!(
            "{} expects two numbers, got {} and {}",
            name,
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn add(args: &[Value]) -> Result<Value> {
    if let [Value::String(a), Value::String(b)] = args {
        return Ok(Value::string(format!("{}{}", a, b)));
    }

    arithmetic("+", args, i64::checked_add, |a, b| a + b)
}

fn sub(args: &[Value]) -> Result<Value> {
    arithmetic("-", args, i64::checked_sub, |a, b| a - b)
}

fn mul(args: &[Value]) -> Result<Value> {
    arithmetic("*", args, i64::checked_mul, |a, b| a * b)
}

fn div(args: &[Value]) -> Result<Value> {
    arithmetic("/", args, i64::checked_div, |a, b| a / b)
}

// ───────────────────────────── comparison ─────────────────────────────

fn equal(args: &[Value]) -> Result<Value> {
    expect_arity("=", args, 2)?;

    Ok(Value::Bool(args[0] == args[1]))
}

fn compare(name: &str, args: &[Value]) -> Result<Ordering> {
    expect_arity(name, args, 2)?;

    let ordering: Option<Ordering> = match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (a, b) => {
            return Err(LangError::native(format!(
                "{} cannot compare {} with {}",
                name,
                a.type_name(),
                b.type_name()
            )))
        }
    };

    ordering.ok_or_else(|| LangError::native(format!("{}: comparison with NaN", name)))
}

fn less(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(compare("<", args)? == Ordering::Less))
}

fn greater(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(compare(">", args)? == Ordering::Greater))
}

fn not(args: &[Value]) -> Result<Value> {
    expect_arity("not", args, 1)?;

    Ok(Value::Bool(!args[0].truthiness()))
}

// ───────────────────────────── collections / instances ─────────────────────────────

fn len(args: &[Value]) -> Result<Value> {
    expect_arity("len", args, 1)?;

    let n: usize = match &args[0] {
        Value::String(s) => s.chars().count(),
        Value::Array(values) => values.len(),
        other => {
            return Err(LangError::native(format!(
                "len expects a string or an array, got {}",
                other.type_name()
            )))
        }
    };

    i64::try_from(n)
        .map(Value::Int)
        .map_err(|_| LangError::native("len: length does not fit in an int"))
}

/// `(get instance "field")`
fn get(args: &[Value]) -> Result<Value> {
    expect_arity("get", args, 2)?;

    match (&args[0], &args[1]) {
        (Value::Instance(instance), Value::String(field)) => {
            instance.field(field).cloned().ok_or_else(|| {
                LangError::native(format!(
                    "instance of {} has no field '{}'",
                    instance.class().name(),
                    field
                ))
            })
        }
        (a, b) => Err(LangError::native(format!(
            "get expects an instance and a field name, got {} and {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn class_of(args: &[Value]) -> Result<Value> {
    expect_arity("class-of", args, 1)?;

    match &args[0] {
        Value::Instance(instance) => Ok(Value::Class(Rc::clone(instance.class()))),
        other => Err(LangError::native(format!(
            "class-of expects an instance, got {}",
            other.type_name()
        ))),
    }
}
