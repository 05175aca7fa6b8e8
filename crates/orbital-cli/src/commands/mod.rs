//! Command handlers grouped by concern.

pub(crate) mod auth;
pub(crate) mod features;
pub(crate) mod probe;
pub(crate) mod results;
pub(crate) mod stock;
pub(crate) mod webhook;
