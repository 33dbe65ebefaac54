//! Contact endpoints.
//!
//! Create and edit bodies go through `skip_undefined_values`, which adds the
//! `overwriteWithBlank` flag: without it the API silently ignores fields sent
//! as blank.

use std::fmt::Display;

use serde::Serialize;
use serde_json::{json, Value};

use crate::client::MauticClient;
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest};
use crate::params::{BodyParams, QueryParams};
use crate::request::{edit_method, skip_undefined_values, to_json_body};
use crate::resources::Resource;

const PREFIX: &str = "/contacts";

/// Default do-not-contact reason: added manually.
pub const DNC_REASON_MANUAL: u8 = 3;

/// Body of a do-not-contact request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoNotContact {
    pub channel: String,
    pub reason: u8,
    pub channel_id: Option<i64>,
    pub comments: String,
}

impl Default for DoNotContact {
    fn default() -> Self {
        Self {
            channel: "email".to_string(),
            reason: DNC_REASON_MANUAL,
            channel_id: None,
            comments: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ContactsApi<'a> {
    client: &'a MauticClient,
}

impl<'a> ContactsApi<'a> {
    pub(crate) fn new(client: &'a MauticClient) -> Self {
        Self { client }
    }

    fn get(&self, path: String, query: Option<&QueryParams>) -> HttpRequest {
        self.client.build_request(HttpMethod::Get, &path, query, None)
    }

    fn post(&self, path: String, body: Option<String>) -> HttpRequest {
        self.client.build_request(HttpMethod::Post, &path, None, body)
    }

    pub fn build_get(&self, contact_id: impl Display) -> HttpRequest {
        self.client.resource(Resource::Contacts).build_get(contact_id)
    }

    pub fn build_list(&self, query: Option<&QueryParams>) -> HttpRequest {
        self.client.resource(Resource::Contacts).build_list(query)
    }

    /// Search contacts with a full search expression, passed through as
    /// `search`: `build_get_by_email("email:jo@x.test")`.
    pub fn build_get_by_email(&self, search: &str) -> HttpRequest {
        let query = QueryParams::new().with("search", search);
        self.build_list(Some(&query))
    }

    pub fn build_create(&self, fields: &BodyParams) -> Result<HttpRequest> {
        let body = to_json_body(&skip_undefined_values(fields))?;
        Ok(self.post(format!("{PREFIX}/new"), Some(body)))
    }

    /// `method` must be `"PUT"` or `"PATCH"`.
    pub fn build_edit(&self, method: &str, contact_id: impl Display, fields: &BodyParams) -> Result<HttpRequest> {
        let method = edit_method(method)?;
        let body = to_json_body(&skip_undefined_values(fields))?;
        Ok(self.client.build_request(
            method,
            &format!("{PREFIX}/{contact_id}/edit"),
            None,
            Some(body),
        ))
    }

    pub fn build_delete(&self, contact_id: impl Display) -> HttpRequest {
        self.client.resource(Resource::Contacts).build_delete(contact_id)
    }

    /// `POST /contacts/{id}/points/plus/{points}`, with an optional body
    /// (e.g. `eventName`, `actionName`).
    pub fn build_add_points<B: Serialize + ?Sized>(
        &self,
        contact_id: impl Display,
        points: i64,
        body: Option<&B>,
    ) -> Result<HttpRequest> {
        self.points(contact_id, "plus", points, body)
    }

    pub fn build_subtract_points<B: Serialize + ?Sized>(
        &self,
        contact_id: impl Display,
        points: i64,
        body: Option<&B>,
    ) -> Result<HttpRequest> {
        self.points(contact_id, "minus", points, body)
    }

    fn points<B: Serialize + ?Sized>(
        &self,
        contact_id: impl Display,
        direction: &str,
        points: i64,
        body: Option<&B>,
    ) -> Result<HttpRequest> {
        let body = body.map(to_json_body).transpose()?;
        Ok(self.post(format!("{PREFIX}/{contact_id}/points/{direction}/{points}"), body))
    }

    pub fn build_list_owners(&self) -> HttpRequest {
        self.get(format!("{PREFIX}/list/owners"), None)
    }

    pub fn build_list_fields(&self) -> HttpRequest {
        self.get(format!("{PREFIX}/list/fields"), None)
    }

    pub fn build_list_notes(&self, contact_id: impl Display, query: Option<&QueryParams>) -> HttpRequest {
        self.get(format!("{PREFIX}/{contact_id}/notes"), query)
    }

    pub fn build_segment_memberships(&self, contact_id: impl Display) -> HttpRequest {
        self.get(format!("{PREFIX}/{contact_id}/segments"), None)
    }

    pub fn build_campaign_memberships(&self, contact_id: impl Display) -> HttpRequest {
        self.get(format!("{PREFIX}/{contact_id}/campaigns"), None)
    }

    pub fn build_activity(&self, contact_id: impl Display, query: Option<&QueryParams>) -> HttpRequest {
        self.get(format!("{PREFIX}/{contact_id}/activity"), query)
    }

    pub fn build_companies(&self, contact_id: impl Display) -> HttpRequest {
        self.get(format!("{PREFIX}/{contact_id}/companies"), None)
    }

    pub fn build_devices(&self, contact_id: impl Display) -> HttpRequest {
        self.get(format!("{PREFIX}/{contact_id}/devices"), None)
    }

    pub fn build_add_do_not_contact(&self, contact_id: impl Display, dnc: &DoNotContact) -> Result<HttpRequest> {
        let body = to_json_body(dnc)?;
        Ok(self.post(
            format!("{PREFIX}/{contact_id}/dnc/{}/add", dnc.channel),
            Some(body),
        ))
    }

    pub fn build_remove_do_not_contact(&self, contact_id: impl Display, channel: &str) -> Result<HttpRequest> {
        let body = to_json_body(&json!({ "channel": channel }))?;
        Ok(self.post(format!("{PREFIX}/{contact_id}/dnc/{channel}/remove"), Some(body)))
    }

    /// Attach UTM tags (`utm_source`, `utm_medium`, ...) to a contact.
    pub fn build_add_utm_tags(&self, contact_id: impl Display, tags: &BodyParams) -> Result<HttpRequest> {
        let body = to_json_body(tags)?;
        Ok(self.post(format!("{PREFIX}/{contact_id}/utm/add"), Some(body)))
    }

    pub fn build_remove_utm_tags(&self, contact_id: impl Display, utm_id: impl Display) -> HttpRequest {
        self.post(format!("{PREFIX}/{contact_id}/utm/{utm_id}/remove"), None)
    }
}

/// Extract the contact id from a `{"contact": {"id": ...}}` response.
pub fn contact_id(response: &Value) -> Option<i64> {
    response.get("contact")?.get("id")?.as_i64()
}
