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

//! Environment-backed configuration for the Orbital CLI.
//!
//! Layout: `defaults.rs` (variable names and fallbacks), `loader.rs`
//! (`OrbitalConfig` assembly from the process environment), `credentials.rs`
//! (`id:secret` API key parsing), `error.rs` (`ConfigError`).

pub mod credentials;
pub mod defaults;
pub mod error;
pub mod loader;

pub use credentials::ApiKey;
pub use error::{ConfigError, ConfigResult};
pub use loader::{OrbitalConfig, env_flag_value};
