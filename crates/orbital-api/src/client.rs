//! `OrbitalClient`: one method per service operation.

use std::time::Duration;

use async_trait::async_trait;
use orbital_api_models::{
    ProbeRequest, QueryCreateRequest, QueryCreated, ResultsPage, StockQuery, TokenResponse,
    WebhookRequest,
};
use orbital_config::ApiKey;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::endpoints::Endpoint;
use crate::error::{ApiError, ApiResult};
use crate::outcome::{ApiOutcome, ServiceFailure};

/// Header carrying the per-invocation trace identifier.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// Settings used to build the underlying HTTP client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the Orbital service.
    pub base_url: Url,
    /// Skip TLS certificate verification.
    pub insecure: bool,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Trace identifier sent with every request.
    pub request_id: Option<String>,
}

/// Thin wrapper over `reqwest` for the Orbital API.
///
/// Cloning is cheap; [`OrbitalClient::with_token`] derives an authenticated
/// copy that shares the same connection pool.
#[derive(Debug, Clone)]
pub struct OrbitalClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl OrbitalClient {
    /// Build a client from options.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the TLS backend cannot be set up.
    pub fn new(options: &ClientOptions) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(value) = options
            .request_id
            .as_deref()
            .and_then(|id| HeaderValue::from_str(id).ok())
        {
            headers.insert(HEADER_REQUEST_ID, value);
        }

        let http = Client::builder()
            .timeout(options.timeout)
            .default_headers(headers)
            .danger_accept_invalid_certs(options.insecure)
            .build()
            .map_err(|source| ApiError::ClientBuild { source })?;

        Ok(Self::from_parts(http, options.base_url.clone()))
    }

    /// Wrap an existing HTTP client.
    #[must_use]
    pub const fn from_parts(http: Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: None,
        }
    }

    /// Copy of this client that sends `Authorization: Bearer <token>`.
    #[must_use]
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    /// Absolute URL of an endpoint; path parameters are percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] when the base URL cannot carry a path.
    pub fn endpoint_url(&self, endpoint: Endpoint<'_>) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(endpoint.segments());
        Ok(url)
    }

    /// Exchange an API key for a session token.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or the reply lacks a token.
    pub async fn login(&self, key: &ApiKey) -> ApiResult<ApiOutcome<TokenResponse>> {
        let endpoint = Endpoint::Token;
        let url = self.endpoint_url(endpoint)?;
        debug!(client_id = key.client_id(), "requesting session token");
        let builder = self
            .http
            .post(url)
            .basic_auth(key.client_id(), Some(key.secret()));
        execute(endpoint, builder).await
    }

    /// Login information for the current token; doubles as a health check.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or replies with invalid JSON.
    pub async fn ok(&self) -> ApiResult<ApiOutcome<Value>> {
        self.get(Endpoint::Ok).await
    }

    /// Stock query catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or the catalog is malformed.
    pub async fn stock(&self) -> ApiResult<ApiOutcome<Vec<StockQuery>>> {
        self.get(Endpoint::Stock).await
    }

    /// Submit an ad-hoc probe.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or replies with invalid JSON.
    pub async fn probe(&self, request: &ProbeRequest) -> ApiResult<ApiOutcome<Value>> {
        self.send_json(Method::POST, Endpoint::Probe, request).await
    }

    /// Create a scheduled query.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or the reply lacks an id.
    pub async fn query_create(
        &self,
        request: &QueryCreateRequest,
    ) -> ApiResult<ApiOutcome<QueryCreated>> {
        self.send_json(Method::POST, Endpoint::QueryCreate, request)
            .await
    }

    /// Disable a scheduled query, returning the raw HTTP status.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable.
    pub async fn query_disable(&self, id: &str) -> ApiResult<StatusCode> {
        let endpoint = Endpoint::QueryDisable(id);
        let url = self.endpoint_url(endpoint)?;
        let response = self
            .request(Method::DELETE, url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                operation: endpoint.operation(),
                source,
            })?;
        debug!(
            operation = endpoint.operation(),
            status = response.status().as_u16(),
            "orbital response"
        );
        Ok(response.status())
    }

    /// One page of results for a job, starting at `cursor` (empty for the first page).
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or replies with invalid JSON.
    pub async fn results(&self, job_id: &str, cursor: &str) -> ApiResult<ApiOutcome<ResultsPage>> {
        let endpoint = Endpoint::Results(job_id);
        let mut url = self.endpoint_url(endpoint)?;
        if !cursor.is_empty() {
            url.query_pairs_mut().append_pair("cursor", cursor);
        }
        execute(endpoint, self.request(Method::GET, url)).await
    }

    /// Create a saved webhook.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or replies with invalid JSON.
    pub async fn webhook_create(&self, request: &WebhookRequest) -> ApiResult<ApiOutcome<Value>> {
        self.send_json(Method::POST, Endpoint::Webhooks, request)
            .await
    }

    /// Replace every field of a saved webhook.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or replies with invalid JSON.
    pub async fn webhook_update(
        &self,
        id: &str,
        request: &WebhookRequest,
    ) -> ApiResult<ApiOutcome<Value>> {
        self.send_json(Method::PATCH, Endpoint::Webhook(id), request)
            .await
    }

    /// Fetch one saved webhook.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or replies with invalid JSON.
    pub async fn webhook_get(&self, id: &str) -> ApiResult<ApiOutcome<Value>> {
        self.get(Endpoint::Webhook(id)).await
    }

    /// Every webhook in the token's organisation.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or replies with invalid JSON.
    pub async fn webhook_list(&self) -> ApiResult<ApiOutcome<Value>> {
        self.get(Endpoint::Webhooks).await
    }

    /// Re-deliver a stored result to a saved webhook.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or replies with invalid JSON.
    pub async fn webhook_sendresult(
        &self,
        webhook_id: &str,
        result_id: &str,
    ) -> ApiResult<ApiOutcome<Value>> {
        let endpoint = Endpoint::WebhookSendResult {
            webhook: webhook_id,
            result: result_id,
        };
        self.send_json(Method::POST, endpoint, &json!({})).await
    }

    /// Fetch one feature.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or replies with invalid JSON.
    pub async fn features_get(&self, id: &str) -> ApiResult<ApiOutcome<Value>> {
        self.get(Endpoint::Feature(id)).await
    }

    /// Every feature in the token's organisation.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or replies with invalid JSON.
    pub async fn features_list(&self) -> ApiResult<ApiOutcome<Value>> {
        self.get(Endpoint::Features).await
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, url = %url, "orbital request");
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T>(&self, endpoint: Endpoint<'_>) -> ApiResult<ApiOutcome<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint_url(endpoint)?;
        execute(endpoint, self.request(Method::GET, url)).await
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        endpoint: Endpoint<'_>,
        body: &B,
    ) -> ApiResult<ApiOutcome<T>>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint_url(endpoint)?;
        let builder = self.request(method, url).json(body);
        execute(endpoint, builder).await
    }
}

async fn execute<T>(
    endpoint: Endpoint<'_>,
    builder: RequestBuilder,
) -> ApiResult<ApiOutcome<T>>
where
    T: DeserializeOwned,
{
    let operation = endpoint.operation();
    let response = builder
        .send()
        .await
        .map_err(|source| ApiError::Transport { operation, source })?;
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|source| ApiError::Transport { operation, source })?;
    debug!(
        operation,
        status = status.as_u16(),
        body = %String::from_utf8_lossy(&bytes),
        "orbital response"
    );

    let body = match decode_body(&bytes) {
        Ok(body) => body,
        Err(source) if status.is_success() => {
            return Err(ApiError::Decode { operation, source });
        }
        Err(_) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
    };

    if let Some(failure) = ServiceFailure::detect(status, &body) {
        return Ok(ApiOutcome::Failure(failure));
    }

    serde_json::from_value(body)
        .map(ApiOutcome::Success)
        .map_err(|source| ApiError::Decode { operation, source })
}

fn decode_body(bytes: &[u8]) -> serde_json::Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        Ok(Value::Null)
    } else {
        serde_json::from_slice(bytes)
    }
}

/// Source of job result pages; the results poller is written against this seam.
#[async_trait]
pub trait ResultsSource: Send + Sync {
    /// Fetch the page that starts at `cursor` (empty for the first page).
    async fn fetch_results(
        &self,
        job_id: &str,
        cursor: &str,
    ) -> ApiResult<ApiOutcome<ResultsPage>>;
}

#[async_trait]
impl ResultsSource for OrbitalClient {
    async fn fetch_results(
        &self,
        job_id: &str,
        cursor: &str,
    ) -> ApiResult<ApiOutcome<ResultsPage>> {
        self.results(job_id, cursor).await
    }
}
