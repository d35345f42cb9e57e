//! Transport abstraction over the actual HTTP stack
//!
//! The client core is written against an object-safe trait so retry and
//! auth logic can be exercised without a network. `ReqwestTransport` is the
//! production implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::error::HttpError;
use super::request::Method;

/// Fully-assembled outgoing request handed to a transport
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

/// Raw response produced by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON
    pub fn json(&self) -> crate::Result<Value> {
        serde_json::from_str(&self.body).map_err(crate::Error::from)
    }
}

/// Contract for executing a single HTTP attempt.
///
/// A transport reports any completed exchange as `Ok`, whatever the status;
/// only failures that never produced a status (connect errors, timeouts)
/// surface as `Err`. The retry loop decides what to do with both.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> Result<HttpResponse, HttpError>;
}

/// Production transport backed by reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Use a pre-configured reqwest client (connection pools, proxies)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: TransportRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .timeout(request.timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(HttpError::from_request_error)?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(HttpError::from_request_error)?;

        Ok(HttpResponse { status, body })
    }
}
