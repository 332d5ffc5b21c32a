//! Interpreter: source-to-value pipeline around one long-lived evaluator.
//!
//! Owns the frame arena, so definitions made by one `run` are visible to
//! the next. Every top-level form is evaluated in the global frame.

use crate::env::{Environment, FrameId};
use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::value::Value;
use scheem_parser::parse_source;
use scheem_types::ast::{Expr, Program};
use scheem_types::{SourceFile, SyntaxErrors};
use thiserror::Error;
use tracing::debug;

/// Failure of [`Interpreter::run`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    /// The source did not lex or parse. Nothing was evaluated.
    #[error("{0}")]
    Syntax(SyntaxErrors),

    /// A top-level form failed. Forms before it have taken effect.
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl From<SyntaxErrors> for RunError {
    fn from(errors: SyntaxErrors) -> Self {
        Self::Syntax(errors)
    }
}

/// A Scheem session.
///
/// Frames are never freed: every closure call and every `let` allocates
/// one that lives as long as the session, so a long-lived session's memory
/// grows with the work it has run. Drop the `Interpreter` to release them.
pub struct Interpreter {
    eval: Evaluator,
}

impl Interpreter {
    /// Create a session with an empty global frame.
    pub fn new() -> Self {
        Self {
            eval: Evaluator::new(),
        }
    }

    /// Create a session whose global frame starts with `bindings`.
    pub fn with_bindings<I, S>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Self {
            eval: Evaluator::with_env(Environment::with_bindings(bindings)),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate one expression in the global frame.
    pub fn eval(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        let global = self.eval.env.global();
        self.eval.evaluate(expr, global)
    }

    /// Evaluate one expression in an arbitrary frame of this session.
    pub fn eval_in(&mut self, expr: &Expr, frame: FrameId) -> Result<Value, EvalError> {
        self.eval.evaluate(expr, frame)
    }

    /// Evaluate every form of `program` in order. Returns the last value,
    /// or `Nil` for an empty program.
    pub fn run_program(&mut self, program: &Program) -> Result<Value, EvalError> {
        let mut last = Value::Nil;
        for expr in &program.exprs {
            last = self.eval(expr)?;
        }
        Ok(last)
    }

    /// Lex, parse, and evaluate `source`.
    pub fn run(&mut self, name: &str, source: &str) -> Result<Value, RunError> {
        let source_file = SourceFile::new(name, source);
        let parsed = parse_source(&source_file);
        let Some(program) = parsed.program else {
            debug!(file = name, errors = parsed.errors.total_errors, "syntax errors");
            return Err(RunError::Syntax(parsed.errors));
        };
        debug!(file = name, forms = program.exprs.len(), "run");
        Ok(self.run_program(&program)?)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Inspection
    // ══════════════════════════════════════════════════════════════════════

    /// Read a name from the global frame (falling back to the library).
    pub fn get(&self, name: &str) -> Option<Value> {
        self.eval.env.read(self.eval.env.global(), name).ok()
    }

    pub fn global(&self) -> FrameId {
        self.eval.env.global()
    }

    pub fn environment(&self) -> &Environment {
        &self.eval.env
    }

    /// Lines captured from `log` so far.
    pub fn log_output(&self) -> &[String] {
        &self.eval.log_output
    }

    /// Drain the captured `log` lines.
    pub fn take_log_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.eval.log_output)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_definitions_persist_across_runs() {
        let mut interp = Interpreter::new();
        interp.run("a.scm", "(def x 2)").unwrap();
        assert_eq!(interp.run("b.scm", "(+ x 1)"), Ok(Value::Number(3.0)));
    }

    #[test]
    fn test_empty_program_is_nil() {
        let mut interp = Interpreter::new();
        assert_eq!(interp.run("empty.scm", ";; nothing"), Ok(Value::Nil));
    }

    #[test]
    fn test_syntax_error_evaluates_nothing() {
        let mut interp = Interpreter::new();
        let err = interp.run("bad.scm", "(def x 1) (+ 1").unwrap_err();
        assert!(matches!(err, RunError::Syntax(_)));
        assert_eq!(interp.get("x"), None);
    }

    #[test]
    fn test_eval_error_keeps_earlier_effects() {
        let mut interp = Interpreter::new();
        let err = interp.run("t.scm", "(def x 1) (car '()) (def y 2)").unwrap_err();
        match err {
            RunError::Eval(e) => assert_eq!(e.kind(), ErrorKind::EmptySequence),
            other => panic!("expected eval error, got {other:?}"),
        }
        assert_eq!(interp.get("x"), Some(Value::Number(1.0)));
        assert_eq!(interp.get("y"), None);
    }

    #[test]
    fn test_each_call_and_let_allocates_a_frame() {
        let mut interp = Interpreter::new();
        interp.run("f.scm", "(def f (lambda (x) x))").unwrap();
        let before = interp.environment().frame_count();
        for _ in 0..10 {
            interp.run("call.scm", "(f 1)").unwrap();
        }
        interp.run("let.scm", "(let ((y 1)) y)").unwrap();
        assert_eq!(interp.environment().frame_count(), before + 11);
    }

    #[test]
    fn test_take_log_output_drains() {
        let mut interp = Interpreter::new();
        interp.run("log.scm", "(log 1 2)").unwrap();
        assert_eq!(interp.take_log_output(), vec!["1 2".to_string()]);
        assert!(interp.log_output().is_empty());
    }
}
