#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Logging primitives for the Orbital CLI.
//!
//! Diagnostics are written to stderr so command output on stdout stays clean
//! for piping.

pub mod error;
pub mod init;

pub use error::{Result, TelemetryError};
pub use init::{DEBUG_LOG_LEVEL, DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
