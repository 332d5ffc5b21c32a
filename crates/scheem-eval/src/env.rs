//! Frame arena for the Scheem evaluator.
//!
//! Frames live in one arena and refer to their enclosing frame by
//! [`FrameId`]. Closures hold a `FrameId` too, so many children and many
//! closures can share (and mutate through) the same ancestor frame.
//!
//! Frame 0 is always the builtin library. It terminates every chain and is
//! never a `define` or `write` target.

use crate::builtins;
use crate::error::{EvalError, EvalResult};
use crate::value::Value;
use std::collections::BTreeMap;

/// Handle to a frame inside an [`Environment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(usize);

impl FrameId {
    /// The builtin library frame.
    pub const LIBRARY: FrameId = FrameId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Frame {
    bindings: BTreeMap<String, Value>,
    outer: Option<FrameId>,
}

/// Arena of frames.
///
/// Frames are only ever appended; none is freed before the arena is dropped.
///
/// Passing a `FrameId` minted by a different `Environment` panics.
#[derive(Debug)]
pub struct Environment {
    frames: Vec<Frame>,
    global: FrameId,
}

impl Environment {
    /// Create an arena holding the library frame and an empty global frame
    /// directly beneath it.
    pub fn new() -> Self {
        let library = Frame {
            bindings: builtins::library()
                .map(|b| (b.name().to_string(), Value::Builtin(b)))
                .collect(),
            outer: None,
        };
        let mut env = Self {
            frames: vec![library],
            global: FrameId::LIBRARY,
        };
        env.global = env.push_frame(FrameId::LIBRARY);
        env
    }

    /// Create an environment whose global frame is seeded with `bindings`.
    pub fn with_bindings<I, S>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let mut env = Self::new();
        let global = env.global;
        env.frames[global.0]
            .bindings
            .extend(bindings.into_iter().map(|(k, v)| (k.into(), v)));
        env
    }

    /// The top-level user frame.
    pub fn global(&self) -> FrameId {
        self.global
    }

    pub fn library(&self) -> FrameId {
        FrameId::LIBRARY
    }

    /// Allocate an empty frame enclosed by `outer`.
    pub fn push_frame(&mut self, outer: FrameId) -> FrameId {
        self.push_frame_with(outer, std::iter::empty())
    }

    /// Allocate a frame enclosed by `outer`, pre-populated with `bindings`.
    /// Later duplicates of a name overwrite earlier ones.
    pub fn push_frame_with<I>(&mut self, outer: FrameId, bindings: I) -> FrameId
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        debug_assert!(outer.0 < self.frames.len());
        let id = FrameId(self.frames.len());
        self.frames.push(Frame {
            bindings: bindings.into_iter().collect(),
            outer: Some(outer),
        });
        id
    }

    /// Resolve `name`, walking outward from `frame` to the library.
    pub fn read(&self, frame: FrameId, name: &str) -> EvalResult<Value> {
        let mut current = Some(frame);
        while let Some(id) = current {
            let f = &self.frames[id.0];
            if let Some(value) = f.bindings.get(name) {
                return Ok(value.clone());
            }
            current = f.outer;
        }
        Err(EvalError::UnboundIdentifier(name.to_string()))
    }

    /// Overwrite the first existing binding of `name`, walking outward from
    /// `frame`. Library bindings are not writable, and no binding is ever
    /// created.
    pub fn write(&mut self, frame: FrameId, name: &str, value: Value) -> EvalResult<Value> {
        let mut current = Some(frame);
        while let Some(id) = current {
            if id == FrameId::LIBRARY {
                break;
            }
            let f = &mut self.frames[id.0];
            if let Some(slot) = f.bindings.get_mut(name) {
                *slot = value.clone();
                return Ok(value);
            }
            current = f.outer;
        }
        Err(EvalError::UnboundIdentifier(name.to_string()))
    }

    /// Create or overwrite `name` in `frame` itself.
    pub fn define(&mut self, frame: FrameId, name: &str, value: Value) -> EvalResult<()> {
        if frame == FrameId::LIBRARY {
            return Err(EvalError::ReadOnlyFrame(name.to_string()));
        }
        self.frames[frame.0].bindings.insert(name.to_string(), value);
        Ok(())
    }

    /// `true` if `frame` itself (not its ancestors) binds `name`.
    pub fn binds_locally(&self, frame: FrameId, name: &str) -> bool {
        self.frames[frame.0].bindings.contains_key(name)
    }

    pub fn outer(&self, frame: FrameId) -> Option<FrameId> {
        self.frames[frame.0].outer
    }

    /// Bindings of `frame` itself, in name order.
    pub fn bindings(&self, frame: FrameId) -> impl Iterator<Item = (&str, &Value)> {
        self.frames[frame.0]
            .bindings
            .iter()
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
