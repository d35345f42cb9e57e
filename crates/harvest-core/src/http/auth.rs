//! Authentication material merged into every outgoing request

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::Result;

/// Credential material applied to every request a client issues.
///
/// Header entries and body fields are merged into each outgoing request,
/// with per-call overrides winning on key collisions. Immutable once
/// constructed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthMaterial {
    headers: HashMap<String, String>,
    body: Map<String, Value>,
}

impl AuthMaterial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bearer-token material: `Authorization: Bearer <token>`
    pub fn bearer(token: &str) -> Self {
        Self::new().with_header("Authorization", format!("Bearer {token}"))
    }

    /// Single-header material, e.g. an `X-Api-Key` credential
    pub fn api_key_header<N, V>(name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self::new().with_header(name, value)
    }

    pub fn with_header<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add a body field sent with every request (e.g. a session token)
    pub fn with_body_field<N>(mut self, name: N, value: Value) -> Self
    where
        N: Into<String>,
    {
        self.body.insert(name.into(), value);
        self
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn body_fields(&self) -> &Map<String, Value> {
        &self.body
    }
}

/// Asynchronous credential resolution (token fetch, session setup).
///
/// A client resolves this at most once; the resulting material is cached
/// and treated as immutable from then on.
#[async_trait]
pub trait AuthResolver: Send + Sync {
    async fn resolve(&self) -> Result<AuthMaterial>;
}

/// Where a client's auth material comes from
pub(crate) enum AuthSource {
    Static(AuthMaterial),
    Deferred(Box<dyn AuthResolver>),
}

impl std::fmt::Debug for AuthSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthSource::Static(material) => f.debug_tuple("Static").field(material).finish(),
            AuthSource::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}
