//! Driver commands.

mod dump;
mod run;

pub use dump::{dump_file, render_program};
pub use run::{parse_run_options, run_file, run_loaded, RunOptions};

use std::path::Path;

use cwalk_eval::RunError;
use cwalk_ir::{DanglingId, Program};

/// Failure of a driver command.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("{0}")]
    Usage(String),

    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot write '{path}': {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("'{path}' is not a cwalk program: {message}")]
    Decode { path: String, message: String },

    #[error("'{path}' is malformed: {detail}")]
    Malformed { path: String, detail: DanglingId },

    #[error(transparent)]
    Run(#[from] RunError),
}

/// Read and decode a program file, rejecting dangling ids up front.
pub fn load_program(path: &Path) -> Result<Program, DriverError> {
    let display = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|source| DriverError::Read {
        path: display.clone(),
        source,
    })?;
    let program: Program = bincode::deserialize(&bytes).map_err(|err| DriverError::Decode {
        path: display.clone(),
        message: err.to_string(),
    })?;
    program.validate().map_err(|detail| DriverError::Malformed {
        path: display,
        detail,
    })?;
    tracing::debug!(
        nodes = program.node_count(),
        decls = program.decl_count(),
        "program loaded"
    );
    Ok(program)
}

/// Encode `program` into a file `load_program` accepts.
pub fn write_program(path: &Path, program: &Program) -> Result<(), DriverError> {
    let bytes = bincode::serialize(program).map_err(|err| DriverError::Decode {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    std::fs::write(path, bytes).map_err(|source| DriverError::Write {
        path: path.display().to_string(),
        source,
    })
}
