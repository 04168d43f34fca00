//! Construction-time error type. Per-frame and per-read-chunk work never
//! propagates errors — it logs and continues (see `core::surface` and
//! `core::render_pipeline`).

use std::io;

/// Errors that can occur while constructing core objects.
///
/// Only construction paths return this; steady-state IO and render work
/// is infallible from the caller's perspective (failures are logged).
#[derive(Debug, thiserror::Error)]
pub enum PhanttyError {
    #[error("failed to spawn pseudo-console/shell: {0}")]
    Spawn(#[source] io::Error),

    #[error("failed to load font: {0}")]
    FontLoad(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("no window could be opened")]
    NoWindow,

    #[error("no suitable GPU adapter found")]
    NoAdapter,
}

pub type Result<T> = std::result::Result<T, PhanttyError>;
