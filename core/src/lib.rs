//! Synchronous API client core for the Mautic marketing-automation REST API.
//!
//! # Overview
//! Builds authenticated `HttpRequest` values and interprets `HttpResponse`
//! values without touching the network (host-does-IO pattern). The host
//! executes the HTTP round-trip, by hand or through a [`Transport`], which
//! keeps the core deterministic and testable.
//!
//! # Design
//! - `MauticClient` holds only construction-time configuration and is
//!   shared freely between threads.
//! - Request construction is a fixed pipeline: URL and query string, then
//!   timeout, then authentication headers (`request`).
//! - Responses are classified by the body's `errors` field alone and failures
//!   are normalized into one error shape (`response`).
//! - Parameters are ordered containers whose values may be undefined; the
//!   undefined entries are dropped at encoding time (`params`).
//!
//! ```
//! use mautic_core::{ClientConfig, MauticClient, QueryParams, Resource};
//!
//! let client = MauticClient::new(&ClientConfig::new("https://mautic.example", "x", "y"));
//! let query = QueryParams::new().with("limit", 10);
//! let request = client.resource(Resource::Campaigns).build_list(Some(&query));
//! assert_eq!(request.url, "https://mautic.example/api/campaigns?limit=10");
//! assert_eq!(request.header("Authorization"), Some("Basic eDp5"));
//! ```

pub mod client;
pub mod config;
pub mod contacts;
pub mod endpoints;
pub mod error;
pub mod fields;
pub mod http;
pub mod params;
pub mod query;
pub mod request;
pub mod resources;
pub mod response;

pub use client::MauticClient;
pub use config::{ClientConfig, LogLevel};
pub use contacts::{ContactsApi, DoNotContact};
pub use endpoints::{EmailsApi, FormsApi, StatsApi, UsersApi};
pub use error::{ErrorDetail, MauticError, NormalizedError, Result};
pub use fields::FieldsApi;
pub use http::{HttpMethod, HttpRequest, HttpResponse, RawBody, RequestParts, Transport};
pub use params::{BodyParams, Params, QueryParams, QueryValue, Scalar};
pub use query::{encode_filter_query, encode_query};
pub use request::{
    apply_authentication, apply_timeout, remove_undefined_values, require_edit_verb, require_entity_kind,
    skip_undefined_values, Credentials, QueryMode, RequestBuilder,
};
pub use resources::{Resource, ResourceApi};
pub use response::{classify, normalize_errors, parse_body, Outcome};
