//! Expression tree for Scheem.
//!
//! The parser produces these once; the evaluator only reads them.
//! Every node carries a [`Span`] for error reporting.

use crate::Span;
use std::fmt;

/// A parsed source file: zero or more top-level expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub exprs: Vec<Expr>,
    pub span: Span,
}

/// A spanned expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Double-precision literal, self-evaluating.
    Number(f64),
    /// Identifier, resolved by lookup.
    Symbol(String),
    /// Parenthesized sequence. Its head decides between special form and
    /// application.
    List(Vec<Expr>),
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn number(n: f64) -> Self {
        Self::new(ExprKind::Number(n), Span::synthetic())
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Symbol(name.into()), Span::synthetic())
    }

    pub fn list(items: Vec<Expr>) -> Self {
        Self::new(ExprKind::List(items), Span::synthetic())
    }

    /// `(quote inner)`, the desugaring of `'inner`.
    pub fn quoted(inner: Expr, span: Span) -> Self {
        let quote = Expr::new(ExprKind::Symbol("quote".into()), span);
        Self::new(ExprKind::List(vec![quote, inner]), span)
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Expr]> {
        match &self.kind {
            ExprKind::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(n) => write!(f, "{n}"),
            ExprKind::Symbol(name) => write!(f, "{name}"),
            ExprKind::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nested() {
        let e = Expr::list(vec![
            Expr::symbol("+"),
            Expr::number(1.0),
            Expr::list(vec![Expr::symbol("f"), Expr::number(-2.5)]),
        ]);
        assert_eq!(e.to_string(), "(+ 1 (f -2.5))");
    }

    #[test]
    fn test_quoted_desugars_to_quote_form() {
        let span = Span::point(1, 1);
        let q = Expr::quoted(Expr::symbol("x"), span);
        let items = q.as_list().unwrap();
        assert_eq!(items[0].as_symbol(), Some("quote"));
        assert_eq!(items[1].as_symbol(), Some("x"));
        assert_eq!(q.to_string(), "(quote x)");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Expr::number(3.0).as_symbol(), None);
        assert!(Expr::symbol("a").as_list().is_none());
        assert_eq!(Expr::list(vec![]).as_list().map(<[Expr]>::len), Some(0));
    }
}
