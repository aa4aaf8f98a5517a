//! Diagnostic logging
//!
//! Operator-facing diagnostics go through `tracing` to stderr, filtered by
//! `RUST_LOG` (default `warn,vfs_shell=info`). This is separate from the
//! action log, which is part of the shell's output.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging() {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,vfs_shell=info"));

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .init();
    });
}
