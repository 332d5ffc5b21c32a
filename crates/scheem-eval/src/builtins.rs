//! The builtin library: the fixed table of native procedures at the root of
//! every frame chain.
//!
//! The table is built exactly once per process (on first use) and is never
//! mutated afterwards. [`Environment`](crate::env::Environment) installs it
//! as its read-only library frame.

use crate::error::{EvalError, EvalResult};
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use tracing::info;

/// Signature of a native procedure. Arguments arrive already evaluated;
/// `log_output` is the evaluator's captured transcript.
pub type NativeFn = fn(args: &[Value], log_output: &mut Vec<String>) -> EvalResult<Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    Variadic,
}

/// A native procedure from the library table.
#[derive(Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    arity: Arity,
    func: NativeFn,
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Check arity, then run the native function.
    pub fn call(&self, args: &[Value], log_output: &mut Vec<String>) -> EvalResult<Value> {
        if let Arity::Exactly(expected) = self.arity {
            if args.len() != expected {
                return Err(EvalError::ArityMismatch {
                    callee: self.name.to_string(),
                    expected,
                    got: args.len(),
                });
            }
        }
        (self.func)(args, log_output)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

static LIBRARY: LazyLock<BTreeMap<&'static str, Builtin>> = LazyLock::new(|| {
    let table: [(&'static str, Arity, NativeFn); 11] = [
        ("+", Arity::Exactly(2), builtin_add),
        ("-", Arity::Exactly(2), builtin_sub),
        ("*", Arity::Exactly(2), builtin_mul),
        ("/", Arity::Exactly(2), builtin_div),
        ("=", Arity::Exactly(2), builtin_eq),
        ("<", Arity::Exactly(2), builtin_lt),
        (">", Arity::Exactly(2), builtin_gt),
        ("cons", Arity::Exactly(2), builtin_cons),
        ("car", Arity::Exactly(1), builtin_car),
        ("cdr", Arity::Exactly(1), builtin_cdr),
        ("log", Arity::Variadic, builtin_log),
    ];
    table
        .into_iter()
        .map(|(name, arity, func)| (name, Builtin { name, arity, func }))
        .collect()
});

/// Look up a library procedure by name.
pub fn lookup(name: &str) -> Option<Builtin> {
    LIBRARY.get(name).copied()
}

/// Every library procedure, in name order.
pub fn library() -> impl Iterator<Item = Builtin> {
    LIBRARY.values().copied()
}

// ── Argument helpers ─────────────────────────────────────────────────

fn number(op: &str, value: &Value) -> EvalResult<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(EvalError::TypeError(format!(
            "'{op}' expects a number, got {}",
            other.type_name()
        ))),
    }
}

fn numbers(op: &str, args: &[Value]) -> EvalResult<(f64, f64)> {
    Ok((number(op, &args[0])?, number(op, &args[1])?))
}

fn sequence<'a>(op: &str, value: &'a Value) -> EvalResult<&'a [Value]> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(EvalError::TypeError(format!(
            "'{op}' expects a list, got {}",
            other.type_name()
        ))),
    }
}

fn non_empty<'a>(op: &str, value: &'a Value) -> EvalResult<&'a [Value]> {
    let items = sequence(op, value)?;
    if items.is_empty() {
        return Err(EvalError::EmptySequence(op.to_string()));
    }
    Ok(items)
}

// ── Arithmetic ───────────────────────────────────────────────────────

fn builtin_add(args: &[Value], _: &mut Vec<String>) -> EvalResult<Value> {
    let (a, b) = numbers("+", args)?;
    Ok(Value::Number(a + b))
}

fn builtin_sub(args: &[Value], _: &mut Vec<String>) -> EvalResult<Value> {
    let (a, b) = numbers("-", args)?;
    Ok(Value::Number(a - b))
}

fn builtin_mul(args: &[Value], _: &mut Vec<String>) -> EvalResult<Value> {
    let (a, b) = numbers("*", args)?;
    Ok(Value::Number(a * b))
}

/// Division by zero yields an infinity or NaN, never an error.
fn builtin_div(args: &[Value], _: &mut Vec<String>) -> EvalResult<Value> {
    let (a, b) = numbers("/", args)?;
    Ok(Value::Number(a / b))
}

// ── Comparison ───────────────────────────────────────────────────────

fn builtin_eq(args: &[Value], _: &mut Vec<String>) -> EvalResult<Value> {
    Ok(Value::Bool(args[0] == args[1]))
}

fn builtin_lt(args: &[Value], _: &mut Vec<String>) -> EvalResult<Value> {
    let (a, b) = numbers("<", args)?;
    Ok(Value::Bool(a < b))
}

fn builtin_gt(args: &[Value], _: &mut Vec<String>) -> EvalResult<Value> {
    let (a, b) = numbers(">", args)?;
    Ok(Value::Bool(a > b))
}

// ── Lists ────────────────────────────────────────────────────────────

/// Returns a fresh list; the argument list is left untouched.
fn builtin_cons(args: &[Value], _: &mut Vec<String>) -> EvalResult<Value> {
    let rest = sequence("cons", &args[1])?;
    let mut items = Vec::with_capacity(rest.len() + 1);
    items.push(args[0].clone());
    items.extend_from_slice(rest);
    Ok(Value::List(items))
}

fn builtin_car(args: &[Value], _: &mut Vec<String>) -> EvalResult<Value> {
    let items = non_empty("car", &args[0])?;
    Ok(items[0].clone())
}

fn builtin_cdr(args: &[Value], _: &mut Vec<String>) -> EvalResult<Value> {
    let items = non_empty("cdr", &args[0])?;
    Ok(Value::List(items[1..].to_vec()))
}

// ── Diagnostics ──────────────────────────────────────────────────────

fn builtin_log(args: &[Value], log_output: &mut Vec<String>) -> EvalResult<Value> {
    let line = args
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    info!(target: "scheem::log", "{line}");
    log_output.push(line);
    Ok(Value::Nil)
}
