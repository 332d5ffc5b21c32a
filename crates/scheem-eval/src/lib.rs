//! Scheem tree-walking evaluator.
//!
//! Evaluates parsed expression trees under a chain of frames rooted at the
//! builtin library. [`Interpreter`] wraps the whole source-to-value
//! pipeline; [`Evaluator`] and [`Environment`] are exposed for hosts that
//! hold their own expression trees.

pub mod builtins;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod interpreter;
pub mod value;

pub use builtins::{Arity, Builtin};
pub use env::{Environment, FrameId};
pub use error::{ErrorKind, EvalError, EvalResult};
pub use evaluator::{Evaluator, SpecialForm};
pub use interpreter::{Interpreter, RunError};
pub use value::{Closure, Value};
