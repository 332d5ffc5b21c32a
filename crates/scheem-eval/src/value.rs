//! Runtime values.

use crate::builtins::Builtin;
use crate::env::FrameId;
use scheem_types::ast::{Expr, ExprKind};
use std::fmt;
use std::rc::Rc;

/// A Scheem runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    /// Only produced by comparison primitives.
    Bool(bool),
    /// A quoted atom.
    Symbol(String),
    /// Ordered sequence: quoted lists and list-primitive results.
    List(Vec<Value>),
    Closure(Rc<Closure>),
    Builtin(Builtin),
    /// No usable value (the result of `log`).
    Nil,
}

/// A procedure value: parameters and body paired with the frame the
/// `lambda` was evaluated in.
#[derive(Debug)]
pub struct Closure {
    pub params: Vec<String>,
    pub body: Expr,
    pub frame: FrameId,
}

impl Value {
    /// Convert a quoted sub-tree into data without evaluating anything.
    pub fn from_quoted(expr: &Expr) -> Value {
        match &expr.kind {
            ExprKind::Number(n) => Value::Number(*n),
            ExprKind::Symbol(name) => Value::Symbol(name.clone()),
            ExprKind::List(items) => Value::List(items.iter().map(Value::from_quoted).collect()),
        }
    }

    /// Only `false` is false.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Closure(_) => "closure",
            Value::Builtin(_) => "builtin",
            Value::Nil => "nil",
        }
    }

    /// Render as JSON for hosts. Integral numbers become JSON integers;
    /// non-finite numbers become `null`; callables become descriptive strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64 {
                    serde_json::Value::Number(serde_json::Number::from(*n as i64))
                } else {
                    serde_json::json!(*n)
                }
            }
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Symbol(name) => serde_json::Value::String(name.clone()),
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Nil => serde_json::Value::Null,
            Value::Closure(_) | Value::Builtin(_) => serde_json::Value::String(self.to_string()),
        }
    }
}

/// Structural equality: numbers numerically (NaN != NaN), lists and symbols
/// element-wise, closures by identity, builtins by name. Mixed variants are
/// never equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name() == b.name(),
            (Value::Nil, Value::Nil) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Symbol(name) => write!(f, "{name}"),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Value::Closure(_) => write!(f, "<closure>"),
            Value::Builtin(b) => write!(f, "<builtin {}>", b.name()),
            Value::Nil => write!(f, "nil"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[f64]) -> Value {
        Value::List(items.iter().copied().map(Value::Number).collect())
    }

    #[test]
    fn test_truthiness_only_false_is_false() {
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::Nil.is_truthy());
        assert!(Value::List(vec![]).is_truthy());
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(list(&[1.0, 2.0]), list(&[1.0, 2.0]));
        assert_ne!(list(&[1.0, 2.0]), list(&[1.0]));
        assert_eq!(Value::Symbol("a".into()), Value::Symbol("a".into()));
        assert_ne!(Value::Number(0.0), Value::Bool(false));
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn test_display() {
        let v = Value::List(vec![
            Value::Number(3.0),
            Value::List(vec![Value::Symbol("a".into()), Value::Number(0.5)]),
            Value::Bool(true),
        ]);
        assert_eq!(v.to_string(), "(3 (a 0.5) true)");
        assert_eq!(Value::Nil.to_string(), "nil");
    }

    #[test]
    fn test_to_json() {
        let v = Value::List(vec![
            Value::Number(3.0),
            Value::Number(-0.5),
            Value::Symbol("x".into()),
            Value::Nil,
            Value::Number(f64::INFINITY),
        ]);
        assert_eq!(v.to_json(), serde_json::json!([3, -0.5, "x", null, null]));
    }

    #[test]
    fn test_from_quoted_keeps_structure() {
        let expr = Expr::list(vec![
            Expr::number(1.0),
            Expr::list(vec![Expr::symbol("+"), Expr::number(2.0)]),
        ]);
        assert_eq!(
            Value::from_quoted(&expr),
            Value::List(vec![
                Value::Number(1.0),
                Value::List(vec![Value::Symbol("+".into()), Value::Number(2.0)]),
            ])
        );
    }
}
