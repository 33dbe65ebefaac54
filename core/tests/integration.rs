//! Contact lifecycle and failure paths against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then executes the core client's
//! requests over real HTTP through a ureq-backed `Transport`. Validates that
//! request building (URL, query encoding, Basic auth, timeout) and response
//! interpretation work end-to-end.

use std::time::Duration;

use mautic_core::{
    BodyParams, ClientConfig, HttpMethod, HttpRequest, HttpResponse, LogLevel, MauticClient, MauticError, QueryParams,
    RequestParts, Resource, Transport,
};
use serde_json::{json, Value};

const USERNAME: &str = "admin";
const PASSWORD: &str = "secret";

/// Executes requests with ureq.
///
/// Disables ureq's status-code-as-error behavior so 4xx/5xx responses come
/// back as data, leaving classification to the core.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

fn prepare<B>(mut builder: ureq::RequestBuilder<B>, parts: &RequestParts) -> ureq::RequestBuilder<B> {
    for (name, value) in &parts.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(ms) = parts.timeout_ms {
        builder = builder
            .config()
            .timeout_global(Some(Duration::from_millis(ms)))
            .build();
    }
    builder
}

impl Transport for UreqTransport {
    type Error = ureq::Error;

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        let (url, parts) = request.into_parts();
        let body = parts.body.clone();
        let mut response = match parts.method {
            HttpMethod::Get => prepare(self.agent.get(&url), &parts).call(),
            HttpMethod::Delete => prepare(self.agent.delete(&url), &parts).call(),
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => {
                let builder = match parts.method {
                    HttpMethod::Post => self.agent.post(&url),
                    HttpMethod::Put => self.agent.put(&url),
                    _ => self.agent.patch(&url),
                };
                let builder = prepare(builder, &parts);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        }?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        Ok(HttpResponse::new(status, body))
    }
}

/// Start the mock server on a random port and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, USERNAME, PASSWORD).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn client(base_url: &str) -> MauticClient {
    MauticClient::new(&ClientConfig::new(base_url, USERNAME, PASSWORD).with_log_level(LogLevel::Verbose))
}

#[test]
fn contact_lifecycle() {
    let base_url = start_server();
    let client = client(&base_url);
    let transport = UreqTransport::new();

    // Step 1: the API can be reached.
    let req = client.resource(Resource::Campaigns).build_list(None);
    let campaigns = client.execute(&transport, req).unwrap();
    assert!(campaigns.get("total").is_some());

    // Step 2: create a contact; undefined fields are dropped, blanks kept.
    let fields = BodyParams::new()
        .with("full_name", "Test User")
        .with("firstname", "Test")
        .with("email", "test@user.test")
        .with("coupon_code_used_for_reg", "")
        .with("is_subscribed_marketing", true)
        .with("direct_transfer_code", Value::Null)
        .with_opt("referrer_code_used", None::<Value>);
    let req = client.contacts().build_create(&fields).unwrap();
    let created = client.execute(&transport, req).unwrap();
    let all = &created["contact"]["fields"]["all"];
    assert_eq!(all["full_name"], "Test User");
    assert_eq!(all["is_subscribed_marketing"], true);
    assert_eq!(all["coupon_code_used_for_reg"], Value::Null);
    assert_eq!(all["direct_transfer_code"], Value::Null);
    assert!(all.get("referrer_code_used").is_none());
    assert!(all.get("overwriteWithBlank").is_none());
    let id = mautic_core::contacts::contact_id(&created).unwrap();

    // Step 3: found by email address.
    let req = client.contacts().build_get_by_email("email:test@user.test");
    let found = client.execute(&transport, req).unwrap();
    assert_eq!(found["total"], "1");
    let first = found["contacts"].as_object().unwrap().values().next().unwrap();
    assert_eq!(first["fields"]["all"]["full_name"], "Test User");

    // Step 4: patch merges a field.
    let patch = BodyParams::new().with("lastname", "User");
    let req = client.contacts().build_edit("PATCH", id, &patch).unwrap();
    let edited = client.execute(&transport, req).unwrap();
    assert_eq!(edited["contact"]["fields"]["all"]["lastname"], "User");
    assert_eq!(edited["contact"]["fields"]["all"]["firstname"], "Test");

    // Step 5: add UTM tags.
    let tags = BodyParams::new()
        .with("utm_medium", "google")
        .with("utm_source", "google")
        .with("utm_campaign", "google ads");
    let req = client.contacts().build_add_utm_tags(id, &tags).unwrap();
    let tagged = client.execute(&transport, req).unwrap();
    assert_eq!(tagged["contact"]["utmtags"][0]["utmMedium"], "google");
    assert_eq!(tagged["contact"]["utmtags"][0]["utmCampaign"], "google ads");

    // Step 6: remove them again.
    let req = client.contacts().build_get(id);
    let fetched = client.execute(&transport, req).unwrap();
    let utm_id = fetched["contact"]["utmtags"][0]["id"].as_i64().unwrap();
    let req = client.contacts().build_remove_utm_tags(id, utm_id);
    let untagged = client.execute(&transport, req).unwrap();
    assert_eq!(untagged["contact"]["utmtags"], json!([]));

    // Step 7: delete; the returned contact has a null id.
    let req = client.contacts().build_delete(id);
    let deleted = client.execute(&transport, req).unwrap();
    assert_eq!(deleted["contact"]["id"], Value::Null);

    // Step 8: get after delete is a normalized API error.
    let req = client.contacts().build_get(id);
    let err = client.execute(&transport, req).unwrap_err();
    assert_eq!(err.to_string(), "404: Item was not found.");
}

#[test]
fn wrong_credentials_surface_as_api_error() {
    let base_url = start_server();
    let client = MauticClient::new(&ClientConfig::new(&base_url, USERNAME, "wrong"));
    let req = client.resource(Resource::Campaigns).build_list(None);
    let err = client.execute(&UreqTransport::new(), req).unwrap_err();
    let api = err.api_error().unwrap();
    assert_eq!(api.details[0].code, "401");
    assert_eq!(api.message, "401: API authorization denied.");
}

#[test]
fn filter_query_reaches_server_unencoded() {
    let base_url = start_server();
    let client = client(&base_url);
    let filter = QueryParams::new().with("email_id", 3).with("is_read", 1);
    let req = client.stats().build_query_table("email_stats", &filter);
    let stats = client.execute(&UreqTransport::new(), req).unwrap();
    assert_eq!(
        stats["where"],
        json!([
            {"col": "email_id", "val": "3", "expr": "eq"},
            {"col": "is_read", "val": "1", "expr": "eq"}
        ])
    );
}

#[test]
fn non_json_body_is_malformed_response() {
    let base_url = start_server();
    let client = client(&base_url);
    let req = client.build_request(HttpMethod::Get, "/broken", None, None);
    let err = client.execute(&UreqTransport::new(), req).unwrap_err();
    assert!(matches!(err, MauticError::MalformedResponse(_)));
}

#[test]
fn elapsed_timeout_is_transport_error() {
    let base_url = start_server();
    let config = ClientConfig::new(&base_url, USERNAME, PASSWORD)
        .with_log_level(LogLevel::Error)
        .with_timeout_in_seconds(0.2);
    let client = MauticClient::new(&config);
    let req = client.build_request(HttpMethod::Get, "/slow", None, None);
    assert_eq!(req.timeout_ms, Some(200));

    match client.execute(&UreqTransport::new(), req).unwrap_err() {
        MauticError::Transport(inner) => assert!(inner.downcast_ref::<ureq::Error>().is_some()),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[test]
fn refused_connection_is_transport_error() {
    // Bind then drop to get a port with nothing listening.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let client = client(&format!("http://{addr}"));
    let req = client.resource(Resource::Segments).build_list(None);
    let err = client.execute(&UreqTransport::new(), req).unwrap_err();
    assert!(matches!(err, MauticError::Transport(_)));
}
