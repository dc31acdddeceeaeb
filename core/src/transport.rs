//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the only seam in the crate that performs I/O. Non-2xx
//! statuses are returned as ordinary `HttpResponse` data so that status
//! interpretation stays in `ObjectClient`; only failures that produce no
//! response at all become a `TransportError`.

use std::future::Future;

use thiserror::Error;
use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// The request never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::NetworkUnavailable(err.0)
    }
}

pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// `Transport` backed by a blocking `ureq` agent, run on tokio's blocking
/// pool. Must be used from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| TransportError(format!("transport task failed: {e}")))?
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

fn execute_blocking(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    debug!(method = %request.method, path = %request.path, "executing request");
    let headers = &request.headers;
    let path = request.path.as_str();

    let result = match (request.method, request.body.as_deref()) {
        (HttpMethod::Get, _) => with_headers(agent.get(path), headers).call(),
        (HttpMethod::Delete, _) => with_headers(agent.delete(path), headers).call(),
        (HttpMethod::Post, Some(body)) => with_headers(agent.post(path), headers).send(body.as_bytes()),
        (HttpMethod::Post, None) => with_headers(agent.post(path), headers).send_empty(),
        (HttpMethod::Put, Some(body)) => with_headers(agent.put(path), headers).send(body.as_bytes()),
        (HttpMethod::Put, None) => with_headers(agent.put(path), headers).send_empty(),
    };
    let mut response = result.map_err(|e| TransportError(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| TransportError(format!("failed to read response body: {e}")))?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
