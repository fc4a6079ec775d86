//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use cwalk_ir::Program;

use super::Interpreter;
use crate::config::EvalConfig;
use crate::diagnostics::EvalStats;
use crate::environment::Environment;
use crate::heap::Heap;
use crate::input_handler::{stdin_handler, SharedInputHandler};
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::LoadError;

/// Builder for an [`Interpreter`] over one program.
///
/// Defaults: stdout for `PRINT`, stdin for `GET`, and
/// [`EvalConfig::default`].
pub struct InterpreterBuilder<'p> {
    program: &'p Program,
    config: EvalConfig,
    print_handler: Option<SharedPrintHandler>,
    input_handler: Option<SharedInputHandler>,
}

impl<'p> InterpreterBuilder<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            config: EvalConfig::default(),
            print_handler: None,
            input_handler: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the call depth limit. `None` removes it.
    #[must_use]
    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.config.max_call_depth = depth;
        self
    }

    /// Set where `PRINT` writes.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Set where `GET` reads from.
    #[must_use]
    pub fn input_handler(mut self, handler: SharedInputHandler) -> Self {
        self.input_handler = Some(handler);
        self
    }

    /// Initialize the environment and build the interpreter.
    ///
    /// Fails if the program is rejected at load time.
    pub fn build(self) -> Result<Interpreter<'p>, LoadError> {
        let env = Environment::initialize(self.program, self.config.max_call_depth)?;
        let mut interpreter = Interpreter {
            env,
            heap: Heap::new(),
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            input_handler: self.input_handler.unwrap_or_else(stdin_handler),
            stats: EvalStats::default(),
        };
        interpreter.allocate_global_arrays()?;
        Ok(interpreter)
    }
}
