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

//! HTTP client for the Orbital public API.
//!
//! Layout: `endpoints.rs` (route table), `outcome.rs` (success/failure
//! classification of service responses), `client.rs` (`OrbitalClient` and the
//! `ResultsSource` seam), `error.rs` (transport and decoding errors).
//!
//! Every operation returns `ApiResult<ApiOutcome<T>>`: the outer `Err` means
//! the service could not be reached or answered with something unreadable,
//! while [`ApiOutcome::Failure`] carries an error the service reported.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod outcome;

pub use client::{ClientOptions, OrbitalClient, ResultsSource};
pub use endpoints::Endpoint;
pub use error::{ApiError, ApiResult};
pub use outcome::{ApiOutcome, ServiceFailure};
