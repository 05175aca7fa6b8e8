//! Route table for the Orbital API.

/// Every endpoint the client calls, with its path parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `POST /v0/oauth2/token`
    Token,
    /// `GET /v0/ok`
    Ok,
    /// `POST /v0/probe`
    Probe,
    /// `POST /v0/query`
    QueryCreate,
    /// `DELETE /v0/query/{id}`
    QueryDisable(&'a str),
    /// `GET /v0/jobs/{id}/results`
    Results(&'a str),
    /// `GET /v0/stock`
    Stock,
    /// `POST /v0/webhooks` and `GET /v0/webhooks`
    Webhooks,
    /// `GET|PATCH /v0/webhooks/{id}`
    Webhook(&'a str),
    /// `POST /v0/webhooks/{id}/results/{result}`
    WebhookSendResult {
        /// Saved webhook identifier.
        webhook: &'a str,
        /// Stored result identifier.
        result: &'a str,
    },
    /// `GET /v0/features`
    Features,
    /// `GET /v0/features/{id}`
    Feature(&'a str),
}

impl<'a> Endpoint<'a> {
    /// Path segments appended to the base URL.
    #[must_use]
    pub fn segments(self) -> Vec<&'a str> {
        match self {
            Self::Token => vec!["v0", "oauth2", "token"],
            Self::Ok => vec!["v0", "ok"],
            Self::Probe => vec!["v0", "probe"],
            Self::QueryCreate => vec!["v0", "query"],
            Self::QueryDisable(id) => vec!["v0", "query", id],
            Self::Results(job) => vec!["v0", "jobs", job, "results"],
            Self::Stock => vec!["v0", "stock"],
            Self::Webhooks => vec!["v0", "webhooks"],
            Self::Webhook(id) => vec!["v0", "webhooks", id],
            Self::WebhookSendResult { webhook, result } => {
                vec!["v0", "webhooks", webhook, "results", result]
            }
            Self::Features => vec!["v0", "features"],
            Self::Feature(id) => vec!["v0", "features", id],
        }
    }

    /// Short name used in logs and error messages.
    #[must_use]
    pub const fn operation(self) -> &'static str {
        match self {
            Self::Token => "login",
            Self::Ok => "ok",
            Self::Probe => "probe",
            Self::QueryCreate => "query_create",
            Self::QueryDisable(_) => "query_disable",
            Self::Results(_) => "results",
            Self::Stock => "stock",
            Self::Webhooks => "webhooks",
            Self::Webhook(_) => "webhook",
            Self::WebhookSendResult { .. } => "webhook_sendresult",
            Self::Features => "features_list",
            Self::Feature(_) => "features_get",
        }
    }
}
