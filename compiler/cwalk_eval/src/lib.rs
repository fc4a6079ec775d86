#![deny(clippy::arithmetic_side_effects)]
//! cwalk Eval - tree-walking evaluator for the cwalk C subset.
//!
//! Consumes an already-typed [`cwalk_ir::Program`] and executes its `main`.
//!
//! # Architecture
//!
//! - `Heap`: word-addressed blocks with generation-checked handles
//! - `Environment`: global store plus routing of locals into the active frame
//! - `CallStack` / `Frame`: per-invocation bindings and return signal
//! - `Interpreter`: dispatch by node kind (`eval` for expressions, `exec`
//!   for statements) and the call protocol
//! - `Builtin`: `GET`, `PRINT`, `MALLOC` and `FREE`
//!
//! Values are plain `i64`s. Integers, characters, booleans and addresses
//! all share the one representation.
//!
//! Runtime faults surface as typed [`EvalError`]s carrying a backtrace;
//! nothing in this crate aborts the process.

mod builtins;
pub mod call_stack;
mod config;
mod diagnostics;
pub mod environment;
pub mod errors;
pub mod heap;
mod input_handler;
pub mod interpreter;
mod print_handler;
mod stack;

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
#[allow(
    clippy::arithmetic_side_effects,
    reason = "expected addresses are spelled as plain arithmetic"
)]
mod tests;

use cwalk_ir::Program;

/// Runtime value of every expression.
pub type Value = i64;

pub use builtins::{Builtin, ENTRY_POINT};
pub use call_stack::{CallStack, Frame, Signal};
pub use config::{EvalConfig, DEFAULT_MAX_CALL_DEPTH};
pub use diagnostics::EvalStats;
pub use environment::{Environment, GlobalStore};
pub use errors::{
    BacktraceFrame, EvalBacktrace, EvalError, EvalErrorKind, EvalResult, HeapError, InputError,
    LoadError, RunError,
};
pub use heap::{Allocation, Heap, HEAP_BASE};
pub use input_handler::{
    closed_handler, scripted_handler, stdin_handler, BufferInputHandler, InputHandlerImpl,
    SharedInputHandler, StdinInputHandler,
};
pub use interpreter::{evaluate_binary, Interpreter, InterpreterBuilder};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler, StdoutPrintHandler,
};
pub use stack::ensure_sufficient_stack;

/// Load `program` and run its `main` against stdin and stdout.
pub fn run_program(program: &Program) -> Result<Value, RunError> {
    let mut interpreter = Interpreter::new(program)?;
    Ok(interpreter.run()?)
}
