//! Error types for loading and evaluating programs.
//!
//! Two families, kept apart:
//! - `LoadError`: the program is rejected before any statement runs
//!   (no entry point, unsupported global initializer, dangling ids).
//! - `EvalError`: a runtime fault in a program that loaded fine (bad pointer,
//!   arity mismatch, unsupported operator...). Carries a backtrace of the
//!   call stack at the fault site.
//!
//! Nothing here aborts the process; only the driver binary decides to exit.

use std::fmt;

use cwalk_ir::{DanglingId, DeclId, NodeId};

/// Result of evaluating one expression.
pub type EvalResult<T = crate::Value> = Result<T, EvalError>;

/// Faults raised by the heap model.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HeapError {
    #[error("invalid allocation size {size}")]
    InvalidSize { size: i64 },
    #[error("heap address space exhausted allocating {size} bytes")]
    Exhausted { size: i64 },
    #[error("access to unmapped address {address:#x}")]
    Unmapped { address: i64 },
    #[error("access to address {address:#x} after its block was freed")]
    UseAfterFree { address: i64 },
    #[error("free of {address:#x}, which is not the base of a live allocation")]
    InvalidFree { address: i64 },
    #[error("double free of {address:#x}")]
    DoubleFree { address: i64 },
}

/// Failures of the `GET` builtin's input source.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("end of input while reading an integer")]
    EndOfInput,
    #[error("expected an integer, got `{token}`")]
    NotAnInteger { token: String },
    #[error("failed to read input: {message}")]
    Io { message: String },
}

/// Typed category of a runtime fault.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("unbound identifier `{name}` ({decl})")]
    UnboundDeclaration { name: String, decl: DeclId },
    #[error(transparent)]
    Heap(#[from] HeapError),
    #[error("unsupported operator `{op}`")]
    UnsupportedOperator { op: &'static str },
    #[error("{name} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("function `{name}` has no body")]
    MissingBody { name: String },
    #[error("expression {node:?} is not assignable")]
    InvalidAssignmentTarget { node: NodeId },
    #[error("malformed AST at {node:?}: {detail}")]
    MalformedAst { node: NodeId, detail: &'static str },
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("call depth limit of {limit} exceeded")]
    StackOverflow { limit: usize },
    #[error("no active call frame")]
    NoActiveFrame,
}

/// One frame of a captured backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// Name of the function the frame belongs to.
    pub function: String,
    /// Call expression that created the frame; `None` for the entry frame.
    pub call_site: Option<NodeId>,
    /// Statement the frame was executing.
    pub statement: Option<NodeId>,
}

/// Snapshot of the call stack, innermost frame first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in &self.frames {
            write!(f, "\n  in {}", frame.function)?;
            if let Some(statement) = frame.statement {
                write!(f, " at {statement:?}")?;
            }
            if let Some(call_site) = frame.call_site {
                write!(f, " (called from {call_site:?})")?;
            }
        }
        Ok(())
    }
}

/// A runtime fault plus where it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub backtrace: Option<EvalBacktrace>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> Self {
        Self {
            kind,
            backtrace: None,
        }
    }

    /// Attach a backtrace unless one was captured closer to the fault.
    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        if self.backtrace.is_none() {
            self.backtrace = Some(backtrace);
        }
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(backtrace) = &self.backtrace {
            write!(f, "{backtrace}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            EvalErrorKind::Heap(err) => Some(err),
            EvalErrorKind::Input(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<HeapError> for EvalError {
    fn from(err: HeapError) -> Self {
        Self::new(EvalErrorKind::Heap(err))
    }
}

impl From<InputError> for EvalError {
    fn from(err: InputError) -> Self {
        Self::new(EvalErrorKind::Input(err))
    }
}

/// Reasons a program is rejected at initialization.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("program has no `main` function")]
    MissingEntryPoint,
    #[error("`main` is declared but has no body")]
    EntryWithoutBody,
    #[error("global `{name}` has an initializer that is not an integer literal")]
    UnsupportedGlobalInitializer { name: String },
    #[error("malformed program: {0}")]
    Malformed(DanglingId),
    #[error("cannot allocate global array `{name}`: {source}")]
    GlobalArray { name: String, source: HeapError },
}

/// Anything that can stop a one-shot run.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

// Constructors used across the evaluator.

pub fn unbound_declaration(name: &str, decl: DeclId) -> EvalError {
    EvalErrorKind::UnboundDeclaration {
        name: name.to_owned(),
        decl,
    }
    .into()
}

pub fn unsupported_operator(op: &'static str) -> EvalError {
    EvalErrorKind::UnsupportedOperator { op }.into()
}

pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> EvalError {
    EvalErrorKind::ArityMismatch {
        name: name.to_owned(),
        expected,
        got,
    }
    .into()
}

pub fn malformed_ast(node: NodeId, detail: &'static str) -> EvalError {
    EvalErrorKind::MalformedAst { node, detail }.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_appends_backtrace_innermost_first() {
        let err = unbound_declaration("x", DeclId::new(3)).with_backtrace(EvalBacktrace::new(vec![
            BacktraceFrame {
                function: "f".to_owned(),
                call_site: Some(NodeId::new(9)),
                statement: Some(NodeId::new(4)),
            },
            BacktraceFrame {
                function: "main".to_owned(),
                call_site: None,
                statement: None,
            },
        ]));
        assert_eq!(
            err.to_string(),
            "unbound identifier `x` (#3)\n  in f at NodeId(4) (called from NodeId(9))\n  in main"
        );
    }

    #[test]
    fn first_backtrace_wins() {
        let inner = EvalBacktrace::new(vec![BacktraceFrame {
            function: "inner".to_owned(),
            call_site: None,
            statement: None,
        }]);
        let err = EvalError::from(HeapError::DoubleFree { address: 16 })
            .with_backtrace(inner.clone())
            .with_backtrace(EvalBacktrace::default());
        assert_eq!(err.backtrace, Some(inner));
    }

    #[test]
    fn heap_errors_are_sources() {
        use std::error::Error as _;
        let err = EvalError::from(HeapError::Unmapped { address: 0 });
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "access to unmapped address 0x0");
    }
}
