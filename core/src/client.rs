//! Stateless request builder and response interpreter for the Mautic API.
//!
//! # Design
//! `MauticClient` holds only what was captured at construction: base URL,
//! credentials, timeout, and log level. Each endpoint is split into a
//! `build_*` method that produces an `HttpRequest` and the shared
//! `parse_response` that consumes an `HttpResponse`. The host executes the
//! round-trip in between, either by hand or through `execute` with a
//! [`Transport`].

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::{ClientConfig, LogLevel};
use crate::contacts::ContactsApi;
use crate::endpoints::{EmailsApi, FormsApi, StatsApi, UsersApi};
use crate::error::{MauticError, Result};
use crate::fields::FieldsApi;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::params::QueryParams;
use crate::request::{Credentials, QueryMode, RequestBuilder};
use crate::resources::{Resource, ResourceApi};
use crate::response;

/// Synchronous, stateless client for the Mautic REST API.
///
/// Cheap to clone and safe to share between threads: nothing in it changes
/// after construction.
#[derive(Debug, Clone)]
pub struct MauticClient {
    builder: RequestBuilder,
    log_level: LogLevel,
}

impl MauticClient {
    pub fn new(config: &ClientConfig) -> Self {
        let credentials = Credentials::new(&config.username, &config.password);
        Self {
            builder: RequestBuilder::new(&config.api_url, credentials, config.timeout_ms()),
            log_level: config.log_level,
        }
    }

    pub fn base_url(&self) -> &str {
        self.builder.base_url()
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Build a request for `path` below `/api`, with a plain query string.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        query: Option<&QueryParams>,
        body: Option<String>,
    ) -> HttpRequest {
        self.builder.build(method, path, query, QueryMode::Plain, body)
    }

    /// Build a GET request whose query is encoded as equality filters.
    pub fn build_filtered_request(&self, path: &str, filter: &QueryParams) -> HttpRequest {
        self.builder
            .build(HttpMethod::Get, path, Some(filter), QueryMode::Filter, None)
    }

    /// Interpret a response: the decoded body on success, a normalized
    /// `MauticError::Api` when the body carries a truthy `errors` field.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value> {
        let result = response::interpret(response);
        match &result {
            Err(MauticError::Api(err)) if self.log_level.logs_errors() => {
                warn!(errors = %err, details = err.details.len(), "mautic API error");
            }
            Err(MauticError::MalformedResponse(err)) if self.log_level.logs_errors() => {
                error!(error = %err, "mautic API returned a malformed body");
            }
            Ok(_) if self.log_level.logs_calls() => debug!("mautic API call succeeded"),
            _ => {}
        }
        result
    }

    /// Send `request` through `transport` and interpret the response.
    ///
    /// A transport failure is returned as `MauticError::Transport` holding the
    /// transport's own error, untouched.
    pub fn execute<T: Transport>(&self, transport: &T, request: HttpRequest) -> Result<Value> {
        let method = request.method;
        let url = request.url.clone();
        if self.log_level.logs_calls() {
            debug!(%method, %url, "calling mautic API");
        }
        let response = match transport.send(request) {
            Ok(response) => response,
            Err(err) => {
                if self.log_level.logs_errors() {
                    error!(%method, %url, error = %err, "mautic API HTTP error");
                }
                return Err(MauticError::Transport(Box::new(err)));
            }
        };
        if self.log_level.logs_calls() {
            debug!(%method, %url, status = response.status, "mautic API responded");
        }
        self.parse_response(response)
    }

    pub fn resource(&self, resource: Resource) -> ResourceApi<'_> {
        ResourceApi::new(self, resource)
    }

    pub fn contacts(&self) -> ContactsApi<'_> {
        ContactsApi::new(self)
    }

    pub fn fields(&self) -> FieldsApi<'_> {
        FieldsApi::new(self)
    }

    pub fn emails(&self) -> EmailsApi<'_> {
        EmailsApi::new(self)
    }

    pub fn forms(&self) -> FormsApi<'_> {
        FormsApi::new(self)
    }

    pub fn stats(&self) -> StatsApi<'_> {
        StatsApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }
}
