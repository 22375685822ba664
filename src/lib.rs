//! Reversi (workspace facade crate).
//!
//! Re-exports the dedicated crates under `crates/` as
//! `reversi::{types, core, engine, adapter}` and holds the bits shared by the
//! two binaries.

pub use reversi_adapter as adapter;
pub use reversi_core as core;
pub use reversi_engine as engine;
pub use reversi_types as types;

/// Install the `tracing` subscriber used by the binaries
///
/// Verbosity comes from `RUST_LOG` (default `info`). Logs go to stderr so
/// they do not interleave with the board on stdout.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init();
}
