//! Runtime error types for the Scheem evaluator.

use thiserror::Error;

/// Evaluation error. Every variant is fail-fast: the evaluator never
/// recovers from one internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Read or write of a name absent from the whole frame chain.
    #[error("unbound identifier: {0}")]
    UnboundIdentifier(String),

    /// A procedure called with the wrong number of arguments.
    #[error("arity mismatch: {callee} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        callee: String,
        expected: usize,
        got: usize,
    },

    /// An operand of the wrong value variant.
    #[error("type error: {0}")]
    TypeError(String),

    /// `car`/`cdr` applied to an empty sequence. Carries the primitive's name.
    #[error("empty sequence passed to {0}")]
    EmptySequence(String),

    /// A special form with the wrong shape, or an empty application.
    #[error("malformed {form}: {reason}")]
    MalformedForm { form: String, reason: String },

    /// `def` targeting the builtin library frame.
    #[error("cannot define {0} in the builtin library")]
    ReadOnlyFrame(String),
}

/// Coarse classification of an [`EvalError`], for hosts that branch on the
/// kind without caring about the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnboundIdentifier,
    ArityMismatch,
    TypeError,
    EmptySequence,
    MalformedForm,
    ReadOnlyFrame,
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnboundIdentifier(_) => ErrorKind::UnboundIdentifier,
            Self::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            Self::TypeError(_) => ErrorKind::TypeError,
            Self::EmptySequence(_) => ErrorKind::EmptySequence,
            Self::MalformedForm { .. } => ErrorKind::MalformedForm,
            Self::ReadOnlyFrame(_) => ErrorKind::ReadOnlyFrame,
        }
    }

    pub(crate) fn malformed(form: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedForm {
            form: form.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
