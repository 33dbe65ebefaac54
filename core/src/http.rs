//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and interprets `HttpResponse` values
//! without ever touching the network. The host executes the I/O, either by
//! hand or through an implementation of [`Transport`].
//!
//! All fields use owned types (`String`, `Vec`) so a request can be handed to
//! another thread or runtime without lifetime concerns.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved HTTP request described as plain data.
///
/// Built by `MauticClient::build_request` and the resource APIs. Contains no
/// unresolved placeholders: `url` already carries the query string, and the
/// authentication headers are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Per-call timeout in milliseconds. `None` leaves the transport default.
    pub timeout_ms: Option<u64>,
}

/// Everything a transport needs besides the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParts {
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Split off the URL from the rest of the transport parameters.
    pub fn into_parts(self) -> (String, RequestParts) {
        (
            self.url,
            RequestParts {
                method: self.method,
                headers: self.headers,
                body: self.body,
                timeout_ms: self.timeout_ms,
            },
        )
    }
}

/// Response body as handed over by the transport.
///
/// Some HTTP stacks decode JSON themselves; others only return text. Both are
/// accepted by the response interpreter.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    Text(String),
    Json(serde_json::Value),
}

impl From<String> for RawBody {
    fn from(text: String) -> Self {
        RawBody::Text(text)
    }
}

impl From<&str> for RawBody {
    fn from(text: &str) -> Self {
        RawBody::Text(text.to_string())
    }
}

impl From<serde_json::Value> for RawBody {
    fn from(value: serde_json::Value) -> Self {
        RawBody::Json(value)
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the host after executing an `HttpRequest`, then passed to
/// `MauticClient::parse_response`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: RawBody,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<RawBody>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

/// The capability that executes a request over the network.
///
/// Implementations must return non-2xx responses as `Ok`: the status code is
/// not what decides success, the body is. `Err` is reserved for failures
/// where no response was obtained (connection refused, DNS, timeout).
pub trait Transport {
    type Error: std::error::Error + Send + Sync + 'static;

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &T {
    type Error = T::Error;

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        (**self).send(request)
    }
}
