//! Request construction: URL assembly, timeout, authentication, body cleanup.
//!
//! # Design
//! Every step is a pure function from one value to the next. The order is
//! fixed by `RequestBuilder::build`: URL, then timeout, then authentication.
//! Authentication runs last so nothing merged earlier can clobber its
//! headers.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Value};

use crate::error::{MauticError, Result};
use crate::http::{HttpMethod, HttpRequest};
use crate::params::{BodyParams, QueryParams};
use crate::query::{encode_filter_query, encode_query};

const AUTHORIZATION: &str = "Authorization";
const CONTENT_TYPE: &str = "Content-Type";
const JSON: &str = "application/json";

/// Flag telling the API that blank fields in the body are intentional.
pub const OVERWRITE_WITH_BLANK: &str = "overwriteWithBlank";

/// Basic-auth credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `Basic base64(username:password)`.
    pub fn basic_auth_header(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {encoded}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// How a query parameter set is turned into a query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// `key=value` pairs, see [`encode_query`].
    Plain,
    /// `where[i][...]` equality filters, see [`encode_filter_query`].
    Filter,
}

/// Builds transport-ready requests for one API instance.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    credentials: Credentials,
    timeout_ms: Option<u64>,
}

impl RequestBuilder {
    pub fn new(base_url: &str, credentials: Credentials, timeout_ms: Option<u64>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            timeout_ms,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url + "/api" + path`, plus `?query` when the query is non-empty.
    pub fn build_url(&self, path: &str, query: Option<&QueryParams>, mode: QueryMode) -> String {
        let query_string = match (query, mode) {
            (None, _) => String::new(),
            (Some(q), QueryMode::Plain) => encode_query(q),
            (Some(q), QueryMode::Filter) => encode_filter_query(q),
        };
        if query_string.is_empty() {
            format!("{}/api{path}", self.base_url)
        } else {
            format!("{}/api{path}?{query_string}", self.base_url)
        }
    }

    /// Run the full pipeline for one call.
    pub fn build(
        &self,
        method: HttpMethod,
        path: &str,
        query: Option<&QueryParams>,
        mode: QueryMode,
        body: Option<String>,
    ) -> HttpRequest {
        let request = HttpRequest {
            method,
            url: self.build_url(path, query, mode),
            headers: Vec::new(),
            body,
            timeout_ms: None,
        };
        let request = apply_timeout(request, self.timeout_ms);
        apply_authentication(request, &self.credentials)
    }
}

/// Attach `timeout_ms` when it is set and non-zero; otherwise leave the
/// request without a timeout.
pub fn apply_timeout(mut request: HttpRequest, timeout_ms: Option<u64>) -> HttpRequest {
    if let Some(ms) = timeout_ms.filter(|ms| *ms > 0) {
        request.timeout_ms = Some(ms);
    }
    request
}

/// Set the `Authorization` and `Content-Type` headers, replacing earlier
/// values of either so each appears exactly once.
pub fn apply_authentication(mut request: HttpRequest, credentials: &Credentials) -> HttpRequest {
    request.headers.retain(|(name, _)| {
        !name.eq_ignore_ascii_case(AUTHORIZATION) && !name.eq_ignore_ascii_case(CONTENT_TYPE)
    });
    request
        .headers
        .push((AUTHORIZATION.to_string(), credentials.basic_auth_header()));
    request
        .headers
        .push((CONTENT_TYPE.to_string(), JSON.to_string()));
    request
}

/// Drop undefined entries. `null` and `""` are kept.
pub fn remove_undefined_values(params: &BodyParams) -> Map<String, Value> {
    params
        .defined()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Like [`remove_undefined_values`], with `overwriteWithBlank: true` added so
/// the API stores blanked fields instead of ignoring them. Used for contact
/// bodies.
pub fn skip_undefined_values(params: &BodyParams) -> Map<String, Value> {
    let mut cleaned = Map::new();
    cleaned.insert(OVERWRITE_WITH_BLANK.to_string(), Value::Bool(true));
    for (k, v) in params.defined() {
        cleaned.insert(k.to_string(), v.clone());
    }
    cleaned
}

/// Serialize a request body to JSON text.
pub fn to_json_body<T: serde::Serialize + ?Sized>(body: &T) -> Result<String> {
    serde_json::to_string(body).map_err(MauticError::Serialization)
}

/// Accept only `"PUT"` or `"PATCH"` and return it unchanged.
pub fn require_edit_verb(method: &str) -> Result<&str> {
    match method {
        "PUT" | "PATCH" => Ok(method),
        other => Err(MauticError::invalid_argument(format!("invalid method \"{other}\""))),
    }
}

/// Accept only `"company"` or `"contact"` and return it unchanged.
pub fn require_entity_kind(kind: &str) -> Result<&str> {
    match kind {
        "company" | "contact" => Ok(kind),
        other => Err(MauticError::invalid_argument(format!(
            "field type must be \"company\" or \"contact\", got \"{other}\""
        ))),
    }
}

/// [`require_edit_verb`], mapped to the matching `HttpMethod`.
pub(crate) fn edit_method(method: &str) -> Result<HttpMethod> {
    match require_edit_verb(method)? {
        "PUT" => Ok(HttpMethod::Put),
        _ => Ok(HttpMethod::Patch),
    }
}
