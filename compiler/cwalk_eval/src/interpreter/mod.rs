//! Tree-walking interpreter.
//!
//! # Architecture
//!
//! Dispatch is by node kind, split by position:
//!
//! - `expr.rs`: `eval(NodeId) -> EvalResult<Value>` for expressions
//! - `stmt.rs`: `exec(NodeId) -> EvalResult<()>` for statements
//! - `call.rs`: the call protocol for user functions and builtins
//!
//! Every evaluation returns its value directly; no per-node side table is
//! kept, so revisiting a node in a later loop iteration or a recursive
//! invocation never observes a stale result.
//!
//! # Borrow Pattern
//!
//! `NodeKind` is `Copy`, and the program is borrowed for `'p` independently
//! of `&mut self`, so each arm copies the kind out and recurses freely.
//!
//! # Control flow
//!
//! `return` sets `Signal::Returned` on the active frame. Blocks and loops
//! check the active frame's signal after every step and stop advancing; the
//! call protocol pops the frame and turns the signal into the call's value.

mod builder;
mod call;
mod expr;
mod stmt;

pub use builder::InterpreterBuilder;
pub use expr::evaluate_binary;

use cwalk_ir::{DeclKind, Program, Storage, Ty, WORD_SIZE};

use crate::diagnostics::EvalStats;
use crate::environment::Environment;
use crate::heap::Heap;
use crate::input_handler::SharedInputHandler;
use crate::print_handler::SharedPrintHandler;
use crate::{EvalResult, LoadError, Value};

/// Evaluator state for one program run.
pub struct Interpreter<'p> {
    pub(crate) env: Environment<'p>,
    pub(crate) heap: Heap,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) input_handler: SharedInputHandler,
    pub(crate) stats: EvalStats,
}

impl<'p> Interpreter<'p> {
    /// Interpreter for `program` with the default configuration: stdout,
    /// stdin and the default call depth limit.
    pub fn new(program: &'p Program) -> Result<Self, LoadError> {
        InterpreterBuilder::new(program).build()
    }

    /// Execute `main` once and return its value.
    ///
    /// Falling off the end of `main` yields 0.
    pub fn run(&mut self) -> EvalResult {
        let entry = self.env.entry();
        tracing::debug!("entering main");
        self.call_function(entry, &[], None)
    }

    pub fn stats(&self) -> &EvalStats {
        &self.stats
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn env(&self) -> &Environment<'p> {
        &self.env
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn program(&self) -> &'p Program {
        self.env.program()
    }

    /// Give every uninitialized global array its backing block.
    fn allocate_global_arrays(&mut self) -> Result<(), LoadError> {
        let program = self.env.program();
        for &id in program.top_level() {
            let decl = program.decl(id);
            let DeclKind::Var {
                ty: ty @ Ty::Array { .. },
                storage: Storage::Global,
                init: None,
            } = decl.kind
            else {
                continue;
            };
            let base = array_storage(ty)
                .and_then(|size| self.heap.allocate(size))
                .map_err(|source| LoadError::GlobalArray {
                    name: decl.name.clone(),
                    source,
                })?;
            self.env.globals_mut().define(id, base);
        }
        Ok(())
    }
}

/// Bytes of heap storage an array declaration needs: one word slot per
/// element, whatever the element type.
pub(crate) fn array_storage(ty: Ty) -> Result<Value, crate::HeapError> {
    let Ty::Array { len, .. } = ty else {
        return Ok(0);
    };
    i64::from(len)
        .checked_mul(WORD_SIZE)
        .ok_or(crate::HeapError::Exhausted { size: i64::MAX })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
#[allow(
    clippy::arithmetic_side_effects,
    reason = "expected addresses are spelled as plain arithmetic"
)]
