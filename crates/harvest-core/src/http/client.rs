//! Authenticated HTTP client with a retry loop
//!
//! Wraps a base URL and persistent credential material, merges per-call
//! overrides, and executes every request through the retry policy. Terminal
//! non-success statuses surface as [`Error::InvalidResponse`]; exhausted
//! network-level failures propagate the last transport error unchanged.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::sync::OnceCell;

use super::auth::{AuthMaterial, AuthResolver, AuthSource};
use super::error::HttpError;
use super::request::{join_url, Method, RequestOverrides};
use super::retry::{RetryDecision, RetryPolicy};
use super::transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportRequest};
use crate::error::{Error, Result, SchemaIssue};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client base for collector services
pub struct AuthenticatedHttpClient {
    base_url: String,
    auth: AuthSource,
    resolved_auth: OnceCell<AuthMaterial>,
    retry_policy: RetryPolicy,
    default_timeout: Duration,
    transport: Arc<dyn HttpTransport>,
}

impl AuthenticatedHttpClient {
    /// Create a client with static auth material and the production transport
    pub fn new(base_url: impl Into<String>, auth: AuthMaterial) -> Self {
        Self::build(base_url, AuthSource::Static(auth))
    }

    /// Create a client whose auth material is resolved asynchronously on
    /// first use; the resolution runs at most once per client
    pub fn with_resolver(base_url: impl Into<String>, resolver: Box<dyn AuthResolver>) -> Self {
        Self::build(base_url, AuthSource::Deferred(resolver))
    }

    fn build(base_url: impl Into<String>, auth: AuthSource) -> Self {
        Self {
            base_url: base_url.into(),
            auth,
            resolved_auth: OnceCell::new(),
            retry_policy: RetryPolicy::default(),
            default_timeout: DEFAULT_TIMEOUT,
            transport: Arc::new(ReqwestTransport::new()),
        }
    }

    /// Override the retry policy for this client
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Override the default per-request timeout
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Swap the transport (pre-configured reqwest client, test double)
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    async fn auth_material(&self) -> Result<&AuthMaterial> {
        match &self.auth {
            AuthSource::Static(material) => Ok(material),
            AuthSource::Deferred(resolver) => {
                self.resolved_auth
                    .get_or_try_init(|| resolver.resolve())
                    .await
            }
        }
    }

    /// Issue a request through the retry loop.
    ///
    /// A terminal response with a status outside [200,300) surfaces as
    /// [`Error::InvalidResponse`] carrying the endpoint and a status
    /// description, whether or not retries were exhausted on the way there.
    /// A retry loop exhausted on network-level failures propagates the last
    /// transport error unchanged as [`Error::Http`].
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        overrides: RequestOverrides,
    ) -> Result<HttpResponse> {
        let request = self.assemble(method, endpoint, &overrides).await?;
        let max_attempts = self.retry_policy.max_attempts;
        let mut attempt = 1u32;

        loop {
            log::debug!(
                "{method} {} attempt {attempt}/{max_attempts}",
                request.url
            );

            let failure = match self.transport.execute(request.clone()).await {
                Ok(response) if response.is_success() => {
                    log::info!(
                        "{method} {} completed with status {} after {attempt} attempt(s)",
                        request.url,
                        response.status
                    );
                    return Ok(response);
                }
                Ok(response) => HttpError::from_status(response.status, &response.body),
                Err(error) => error,
            };

            match self.retry_policy.decide(attempt, &failure) {
                RetryDecision::Retry { delay } => {
                    log::warn!(
                        "{method} {} attempt {attempt}/{max_attempts} failed ({failure}), retrying in {delay:?}",
                        request.url
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::Fail => {
                    log::error!(
                        "{method} {} failed after {attempt} attempt(s): {failure}",
                        request.url
                    );
                    return Err(terminal_error(endpoint, failure));
                }
            }
        }
    }

    /// Issue a request and validate the JSON payload against a schema.
    ///
    /// Validation is non-throwing internally, so every issue found in the
    /// payload is collected into a single [`Error::InvalidResponse`] rather
    /// than stopping at the first.
    pub async fn request_and_parse(
        &self,
        method: Method,
        endpoint: &str,
        schema: &Value,
        overrides: RequestOverrides,
    ) -> Result<Value> {
        let response = self.request(method, endpoint, overrides).await?;
        let payload: Value = serde_json::from_str(&response.body)?;

        let validator = jsonschema::validator_for(schema).map_err(|error| Error::InvalidResponse {
            endpoint: endpoint.to_string(),
            detail: format!("schema could not be compiled: {error}"),
            issues: Vec::new(),
        })?;

        let issues: Vec<SchemaIssue> = validator
            .iter_errors(&payload)
            .map(|error| SchemaIssue {
                path: error.instance_path.to_string(),
                message: error.to_string(),
            })
            .collect();

        if !issues.is_empty() {
            log::error!(
                "{method} {endpoint} response failed schema validation with {} issue(s)",
                issues.len()
            );
            return Err(Error::InvalidResponse {
                endpoint: endpoint.to_string(),
                detail: format!("response failed schema validation ({} issue(s))", issues.len()),
                issues,
            });
        }

        Ok(payload)
    }

    /// [`request_and_parse`](Self::request_and_parse) followed by typed
    /// deserialization of the validated payload
    pub async fn request_and_deserialize<T>(
        &self,
        method: Method,
        endpoint: &str,
        schema: &Value,
        overrides: RequestOverrides,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let payload = self
            .request_and_parse(method, endpoint, schema, overrides)
            .await?;
        serde_json::from_value(payload).map_err(Error::from)
    }

    async fn assemble(
        &self,
        method: Method,
        endpoint: &str,
        overrides: &RequestOverrides,
    ) -> Result<TransportRequest> {
        let auth = self.auth_material().await?;

        let mut headers: HashMap<String, String> = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        for (name, value) in auth.headers() {
            headers.insert(name.clone(), value.clone());
        }
        for (name, value) in &overrides.headers {
            headers.insert(name.clone(), value.clone());
        }

        Ok(TransportRequest {
            method,
            url: join_url(&self.base_url, endpoint),
            query: overrides.query.clone(),
            headers,
            body: merge_body(auth.body_fields(), overrides.body.as_ref()),
            timeout: overrides.timeout.unwrap_or(self.default_timeout),
        })
    }
}

fn terminal_error(endpoint: &str, failure: HttpError) -> Error {
    match failure.status_code() {
        Some(_) => Error::InvalidResponse {
            endpoint: endpoint.to_string(),
            detail: failure.status_description(),
            issues: Vec::new(),
        },
        None => Error::Http(failure),
    }
}

// Persistent auth body fields overlaid with the per-call body; per-call
// fields win on collisions. A non-object per-call body passes through
// untouched since there is nothing to merge into.
fn merge_body(auth_fields: &Map<String, Value>, override_body: Option<&Value>) -> Option<Value> {
    match override_body {
        Some(Value::Object(fields)) => {
            let mut merged = auth_fields.clone();
            for (name, value) in fields {
                merged.insert(name.clone(), value.clone());
            }
            Some(Value::Object(merged))
        }
        Some(other) => Some(other.clone()),
        None if auth_fields.is_empty() => None,
        None => Some(Value::Object(auth_fields.clone())),
    }
}
