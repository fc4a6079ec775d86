//! Whole-program tests.
//!
//! Programs are assembled with `ProgramBuilder` the way a front end would
//! hand them over, then run with captured output and scripted input.

mod evaluation_order_tests;
mod program_tests;

use cwalk_ir::{Builtins, DeclId, NodeId, Program, ProgramBuilder, Ty};

use crate::{buffer_handler, scripted_handler, EvalResult, InterpreterBuilder};

/// Outcome of one run: `main`'s result and everything `PRINT`ed.
pub(crate) struct Outcome {
    pub result: EvalResult,
    pub output: String,
}

pub(crate) fn run_with_input(program: &Program, input: &str) -> Outcome {
    let print = buffer_handler();
    let mut interpreter = InterpreterBuilder::new(program)
        .print_handler(print.clone())
        .input_handler(scripted_handler(input))
        .build()
        .unwrap();
    let result = interpreter.run();
    Outcome {
        result,
        output: print.get_output(),
    }
}

pub(crate) fn run(program: &Program) -> Outcome {
    run_with_input(program, "")
}

/// Program whose `main` is the block of statements `body` returns.
///
/// `body` may declare further functions and globals on the builder.
pub(crate) fn main_program(
    body: impl FnOnce(&mut ProgramBuilder, Builtins) -> Vec<NodeId>,
) -> Program {
    let mut b = ProgramBuilder::new();
    let builtins = b.builtins();
    let main = b.function("main", Ty::Int, &[]);
    let statements = body(&mut b, builtins);
    let block = b.block(&statements);
    b.define(main, block);
    b.finish()
}

/// `PRINT(value)` as an expression statement.
pub(crate) fn print(b: &mut ProgramBuilder, builtins: Builtins, value: NodeId) -> NodeId {
    b.call(builtins.print, &[value])
}

/// `PRINT(decl)`.
pub(crate) fn print_var(b: &mut ProgramBuilder, builtins: Builtins, decl: DeclId) -> NodeId {
    let value = b.var(decl);
    print(b, builtins, value)
}

/// `decl = value;` with an integer literal.
pub(crate) fn assign_int(b: &mut ProgramBuilder, decl: DeclId, value: i64) -> NodeId {
    let target = b.var(decl);
    let value = b.int(value);
    b.assign(target, value)
}
