//! Core expression evaluator.

use crate::env::{Environment, FrameId};
use crate::error::{EvalError, EvalResult};
use crate::value::{Closure, Value};
use scheem_types::ast::{Expr, ExprKind};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

/// The closed set of special forms. A list whose head is one of these
/// keywords is never treated as an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialForm {
    Quote,
    Def,
    Set,
    Let,
    Lambda,
    If,
    Seq,
}

impl SpecialForm {
    pub fn from_symbol(name: &str) -> Option<Self> {
        Some(match name {
            "quote" => Self::Quote,
            "def" => Self::Def,
            "set" => Self::Set,
            "let" => Self::Let,
            "lambda" => Self::Lambda,
            "if" => Self::If,
            "seq" => Self::Seq,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::Def => "def",
            Self::Set => "set",
            Self::Let => "let",
            Self::Lambda => "lambda",
            Self::If => "if",
            Self::Seq => "seq",
        }
    }
}

impl fmt::Display for SpecialForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The core evaluator: walks expression trees and produces Values.
pub struct Evaluator {
    /// Frame arena shared by every closure this evaluator creates.
    pub env: Environment,
    /// Captured output from `log`.
    pub log_output: Vec<String>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_env(Environment::new())
    }

    pub fn with_env(env: Environment) -> Self {
        Self {
            env,
            log_output: Vec::new(),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate `expr` in `frame`.
    pub fn evaluate(&mut self, expr: &Expr, frame: FrameId) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::Symbol(name) => self.env.read(frame, name),
            ExprKind::List(items) => self.eval_list(items, frame),
        }
    }

    fn eval_list(&mut self, items: &[Expr], frame: FrameId) -> EvalResult<Value> {
        let Some((head, operands)) = items.split_first() else {
            return Err(EvalError::malformed("application", "cannot apply the empty list"));
        };
        match head.as_symbol().and_then(SpecialForm::from_symbol) {
            Some(form) => self.eval_special_form(form, operands, frame),
            None => self.eval_application(head, operands, frame),
        }
    }

    fn eval_special_form(
        &mut self,
        form: SpecialForm,
        operands: &[Expr],
        frame: FrameId,
    ) -> EvalResult<Value> {
        match form {
            SpecialForm::Quote => self.eval_quote(operands),
            SpecialForm::Def => self.eval_def(operands, frame),
            SpecialForm::Set => self.eval_set(operands, frame),
            SpecialForm::Let => self.eval_let(operands, frame),
            SpecialForm::Lambda => self.eval_lambda(operands, frame),
            SpecialForm::If => self.eval_if(operands, frame),
            SpecialForm::Seq => self.eval_seq(operands, frame),
        }
    }

    // ── Data ─────────────────────────────────────────────────────────────

    fn eval_quote(&mut self, operands: &[Expr]) -> EvalResult<Value> {
        let [datum] = exact::<1>(SpecialForm::Quote, operands)?;
        Ok(Value::from_quoted(datum))
    }

    // ── Bindings ─────────────────────────────────────────────────────────

    fn eval_def(&mut self, operands: &[Expr], frame: FrameId) -> EvalResult<Value> {
        let [target, init] = exact::<2>(SpecialForm::Def, operands)?;
        let name = symbol(SpecialForm::Def, target, "target")?;
        let value = self.evaluate(init, frame)?;
        debug!(symbol = name, value = %value, frame = frame.index(), "def");
        self.env.define(frame, name, value.clone())?;
        Ok(value)
    }

    fn eval_set(&mut self, operands: &[Expr], frame: FrameId) -> EvalResult<Value> {
        let [target, init] = exact::<2>(SpecialForm::Set, operands)?;
        let name = symbol(SpecialForm::Set, target, "target")?;
        let value = self.evaluate(init, frame)?;
        debug!(symbol = name, value = %value, frame = frame.index(), "set");
        self.env.write(frame, name, value)
    }

    /// Every initializer runs in the enclosing frame, so bindings of one
    /// `let` cannot see each other.
    fn eval_let(&mut self, operands: &[Expr], frame: FrameId) -> EvalResult<Value> {
        let [bindings, body] = exact::<2>(SpecialForm::Let, operands)?;
        let bindings = bindings.as_list().ok_or_else(|| {
            EvalError::malformed("let", format!("expected a binding list, got {bindings}"))
        })?;

        let mut values = Vec::with_capacity(bindings.len());
        for binding in bindings {
            let (name, init) = match binding.as_list() {
                Some([name, init]) => (symbol(SpecialForm::Let, name, "binding name")?, init),
                _ => {
                    return Err(EvalError::malformed(
                        "let",
                        format!("expected a (name value) binding, got {binding}"),
                    ))
                }
            };
            values.push((name.to_string(), self.evaluate(init, frame)?));
        }

        let child = self.env.push_frame_with(frame, values);
        self.evaluate(body, child)
    }

    // ── Procedures ───────────────────────────────────────────────────────

    fn eval_lambda(&mut self, operands: &[Expr], frame: FrameId) -> EvalResult<Value> {
        let [params, body] = exact::<2>(SpecialForm::Lambda, operands)?;
        let params = params
            .as_list()
            .ok_or_else(|| {
                EvalError::malformed("lambda", format!("expected a parameter list, got {params}"))
            })?
            .iter()
            .map(|p| symbol(SpecialForm::Lambda, p, "parameter").map(str::to_string))
            .collect::<EvalResult<Vec<_>>>()?;

        Ok(Value::Closure(Rc::new(Closure {
            params,
            body: body.clone(),
            frame,
        })))
    }

    fn eval_application(
        &mut self,
        head: &Expr,
        operands: &[Expr],
        frame: FrameId,
    ) -> EvalResult<Value> {
        let callee = self.evaluate(head, frame)?;
        let mut args = Vec::with_capacity(operands.len());
        for operand in operands {
            args.push(self.evaluate(operand, frame)?);
        }
        let name = match head.as_symbol() {
            Some(name) => name.to_string(),
            None => head.to_string(),
        };
        self.apply_named(&name, &callee, args)
    }

    /// Apply an already-evaluated callable to already-evaluated arguments.
    pub fn apply(&mut self, callee: &Value, args: Vec<Value>) -> EvalResult<Value> {
        self.apply_named(&callee.to_string(), callee, args)
    }

    fn apply_named(&mut self, name: &str, callee: &Value, args: Vec<Value>) -> EvalResult<Value> {
        match callee {
            Value::Closure(closure) => {
                if args.len() != closure.params.len() {
                    return Err(EvalError::ArityMismatch {
                        callee: name.to_string(),
                        expected: closure.params.len(),
                        got: args.len(),
                    });
                }
                trace!(callee = name, args = args.len(), "apply closure");
                let bindings = closure.params.iter().cloned().zip(args);
                let call_frame = self.env.push_frame_with(closure.frame, bindings);
                self.evaluate(&closure.body, call_frame)
            }
            Value::Builtin(builtin) => builtin.call(&args, &mut self.log_output),
            other => Err(EvalError::TypeError(format!(
                "cannot apply {name}: {} is not a procedure",
                other.type_name()
            ))),
        }
    }

    // ── Control Flow ─────────────────────────────────────────────────────

    fn eval_if(&mut self, operands: &[Expr], frame: FrameId) -> EvalResult<Value> {
        let [test, consequent, alternative] = exact::<3>(SpecialForm::If, operands)?;
        if self.evaluate(test, frame)?.is_truthy() {
            self.evaluate(consequent, frame)
        } else {
            self.evaluate(alternative, frame)
        }
    }

    fn eval_seq(&mut self, operands: &[Expr], frame: FrameId) -> EvalResult<Value> {
        let Some((last, init)) = operands.split_last() else {
            return Err(EvalError::malformed("seq", "expected at least 1 expression"));
        };
        for expr in init {
            self.evaluate(expr, frame)?;
        }
        self.evaluate(last, frame)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Shape helpers
// ══════════════════════════════════════════════════════════════════════════

fn exact<const N: usize>(form: SpecialForm, operands: &[Expr]) -> EvalResult<&[Expr; N]> {
    operands.try_into().map_err(|_| {
        EvalError::malformed(
            form.keyword(),
            format!("expected {N} operand(s), got {}", operands.len()),
        )
    })
}

fn symbol<'a>(form: SpecialForm, expr: &'a Expr, role: &str) -> EvalResult<&'a str> {
    expr.as_symbol().ok_or_else(|| {
        EvalError::malformed(form.keyword(), format!("{role} must be a symbol, got {expr}"))
    })
}
