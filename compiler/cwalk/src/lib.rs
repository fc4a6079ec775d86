//! cwalk driver library.
//!
//! Program files hold a [`cwalk_ir::Program`] encoded with `bincode`, as a
//! front end writes them. The `commands` module loads such a file and either
//! runs it or renders it for inspection; `main.rs` only parses arguments.

pub mod commands;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber, once, when `RUST_LOG` is set.
///
/// Program output goes through the print handler, never through this.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
