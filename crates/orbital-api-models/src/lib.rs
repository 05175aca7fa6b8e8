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
//! Request and response DTOs for the Orbital public API.
//!
//! Besides plain wire types this crate owns the compact text grammars the CLI
//! accepts (postbacks, stock invocations, context maps) so the parsing rules
//! and the payloads they produce stay in one place.

pub mod context;
pub mod error;
pub mod postback;
pub mod query;
pub mod responses;
pub mod stock;
pub mod webhook;

pub use context::ContextMap;
pub use error::{ModelError, ModelResult};
pub use postback::{DeliveryTarget, Postback, PostbackFormat};
pub use query::{ProbeRequest, Query, QueryCreateRequest, TargetOs};
pub use responses::{QueryCreated, ResultsPage, TokenResponse};
pub use stock::{StockInvocation, StockQuery};
pub use webhook::{WebhookConfig, WebhookRequest};
