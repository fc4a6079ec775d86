//! The `run` command: load a program file and execute its `main`.

use std::path::Path;

use cwalk_eval::{
    stdin_handler, stdout_handler, EvalConfig, InterpreterBuilder, RunError, SharedInputHandler,
    SharedPrintHandler, Value,
};
use cwalk_ir::Program;

use super::{load_program, DriverError};

/// Options accepted after `cwalk run <file>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Print execution counters to stderr after the run.
    pub stats: bool,
    pub config: EvalConfig,
}

/// Parse `--stats` and `--max-depth=<n|unlimited>`.
pub fn parse_run_options(args: &[String]) -> Result<RunOptions, DriverError> {
    let mut options = RunOptions::default();
    for arg in args {
        if arg == "--stats" {
            options.stats = true;
        } else if let Some(depth) = arg.strip_prefix("--max-depth=") {
            let limit = if depth == "unlimited" {
                None
            } else {
                let n = depth.parse::<usize>().map_err(|_| {
                    DriverError::Usage(format!("invalid --max-depth value '{depth}'"))
                })?;
                Some(n)
            };
            options.config = options.config.with_max_call_depth(limit);
        } else {
            return Err(DriverError::Usage(format!("unknown option '{arg}'")));
        }
    }
    Ok(options)
}

/// Run a program file against stdin and stdout.
pub fn run_file(path: &Path, options: &RunOptions) -> Result<Value, DriverError> {
    let program = load_program(path)?;
    run_loaded(&program, options, stdout_handler(), stdin_handler())
}

/// Run an already-loaded program with explicit I/O handlers.
pub fn run_loaded(
    program: &Program,
    options: &RunOptions,
    print_handler: SharedPrintHandler,
    input_handler: SharedInputHandler,
) -> Result<Value, DriverError> {
    let mut interpreter = InterpreterBuilder::new(program)
        .config(options.config.clone())
        .print_handler(print_handler)
        .input_handler(input_handler)
        .build()
        .map_err(RunError::from)?;
    let result = interpreter.run();
    if options.stats {
        eprintln!("{}", interpreter.stats());
    }
    let value = result.map_err(RunError::from)?;
    tracing::debug!(value, "main returned");
    Ok(value)
}
