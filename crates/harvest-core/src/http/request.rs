//! Request descriptors and URL assembly

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde_json::Value;

/// HTTP methods issued by collector clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

/// Per-call options merged over the client's persistent state.
///
/// Override headers win on key collisions with persistent auth headers;
/// override body fields win over persistent auth body fields.
#[derive(Debug, Clone, Default)]
pub struct RequestOverrides {
    pub query: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
    pub timeout: Option<Duration>,
}

impl RequestOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_header<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Join a base URL and an endpoint path with exactly one separating slash
/// added between them.
///
/// An endpoint that already starts with '/' therefore produces a double
/// slash in the final URL. That is observable, documented behavior and is
/// deliberately not normalized away.
pub fn join_url(base: &str, endpoint: &str) -> String {
    if base.ends_with('/') {
        format!("{base}{endpoint}")
    } else {
        format!("{base}/{endpoint}")
    }
}
