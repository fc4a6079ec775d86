//! Call frames and the call stack.
//!
//! One `Frame` per active invocation of a user function. The frame owns the
//! invocation's local bindings and its control signal: a `return` marks only
//! its own frame as `Returned`, so statement sequences of that invocation stop
//! advancing while callers keep running once the frame is popped.
//!
//! `CallStack` enforces the configured depth limit on `push()` and snapshots
//! itself into an `EvalBacktrace` at error sites.

use cwalk_ir::{DeclId, NodeId, Program};
use rustc_hash::FxHashMap;

use crate::{BacktraceFrame, EvalBacktrace, EvalError, EvalErrorKind, Value};

/// Control state of one invocation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Signal {
    /// Statements execute in order.
    #[default]
    Running,
    /// A return was taken with this value; nothing else in the invocation runs.
    Returned(Value),
}

/// Storage and resume context of one invocation.
#[derive(Clone, Debug)]
pub struct Frame {
    function: DeclId,
    call_site: Option<NodeId>,
    statement: Option<NodeId>,
    locals: FxHashMap<DeclId, Value>,
    signal: Signal,
}

impl Frame {
    /// Fresh frame for `function`, entered from `call_site` (`None` for the
    /// entry point).
    pub fn new(function: DeclId, call_site: Option<NodeId>) -> Self {
        Frame {
            function,
            call_site,
            statement: None,
            locals: FxHashMap::default(),
            signal: Signal::Running,
        }
    }

    pub fn function(&self) -> DeclId {
        self.function
    }

    pub fn call_site(&self) -> Option<NodeId> {
        self.call_site
    }

    /// Statement currently executing in this invocation.
    pub fn statement(&self) -> Option<NodeId> {
        self.statement
    }

    pub fn set_statement(&mut self, statement: NodeId) {
        self.statement = Some(statement);
    }

    /// Create or shadow a local binding.
    pub fn bind(&mut self, decl: DeclId, value: Value) {
        self.locals.insert(decl, value);
    }

    pub fn lookup(&self, decl: DeclId) -> Option<Value> {
        self.locals.get(&decl).copied()
    }

    /// Overwrite an existing binding. Returns `false` if `decl` is unbound.
    pub fn assign(&mut self, decl: DeclId, value: Value) -> bool {
        match self.locals.get_mut(&decl) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }

    #[inline]
    pub fn has_returned(&self) -> bool {
        matches!(self.signal, Signal::Returned(_))
    }

    pub fn set_returned(&mut self, value: Value) {
        self.signal = Signal::Returned(value);
    }

    /// Value delivered to the call site: the returned value, or 0 when the
    /// body ran off its end.
    pub fn result(&self) -> Value {
        match self.signal {
            Signal::Returned(value) => value,
            Signal::Running => 0,
        }
    }
}

/// Live stack of invocations; the last frame is the active one.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<Frame>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `max_depth` of `None` means unlimited.
    pub fn new(max_depth: Option<usize>) -> Self {
        CallStack {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame, checking the depth limit.
    ///
    /// The frame is NOT pushed on overflow.
    pub fn push(&mut self, frame: Frame) -> Result<(), EvalError> {
        if let Some(limit) = self.max_depth {
            if self.frames.len() >= limit {
                return Err(EvalErrorKind::StackOverflow { limit }.into());
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// The active frame.
    pub fn current(&self) -> Result<&Frame, EvalError> {
        self.frames
            .last()
            .ok_or_else(|| EvalErrorKind::NoActiveFrame.into())
    }

    pub fn current_mut(&mut self) -> Result<&mut Frame, EvalError> {
        self.frames
            .last_mut()
            .ok_or_else(|| EvalErrorKind::NoActiveFrame.into())
    }

    /// Whether the active invocation has taken a return.
    #[inline]
    pub fn returning(&self) -> bool {
        self.frames.last().is_some_and(Frame::has_returned)
    }

    /// Snapshot of the stack, innermost frame first.
    pub fn capture(&self, program: &Program) -> EvalBacktrace {
        let frames = self
            .frames
            .iter()
            .rev()
            .map(|frame| BacktraceFrame {
                function: program
                    .get_decl(frame.function)
                    .map_or_else(|| frame.function.to_string(), |decl| decl.name.clone()),
                call_site: frame.call_site,
                statement: frame.statement,
            })
            .collect();
        EvalBacktrace::new(frames)
    }

    /// Attach a backtrace of the current stack unless the error already has one.
    pub fn attach_backtrace(&self, err: EvalError, program: &Program) -> EvalError {
        if self.frames.is_empty() || err.backtrace.is_some() {
            return err;
        }
        err.with_backtrace(self.capture(program))
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new(None)
    }
}
