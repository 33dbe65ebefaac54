//! Custom field endpoints, `/fields/{kind}` where kind is `contact` or
//! `company`. Every builder validates the kind before touching the URL.

use std::fmt::Display;

use serde::Serialize;

use crate::client::MauticClient;
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest};
use crate::request::{edit_method, require_entity_kind, to_json_body};

#[derive(Debug, Clone, Copy)]
pub struct FieldsApi<'a> {
    client: &'a MauticClient,
}

impl<'a> FieldsApi<'a> {
    pub(crate) fn new(client: &'a MauticClient) -> Self {
        Self { client }
    }

    pub fn build_get(&self, kind: &str, field_id: impl Display) -> Result<HttpRequest> {
        let kind = require_entity_kind(kind)?;
        Ok(self
            .client
            .build_request(HttpMethod::Get, &format!("/fields/{kind}/{field_id}"), None, None))
    }

    pub fn build_list(&self, kind: &str) -> Result<HttpRequest> {
        let kind = require_entity_kind(kind)?;
        Ok(self
            .client
            .build_request(HttpMethod::Get, &format!("/fields/{kind}"), None, None))
    }

    pub fn build_create<B: Serialize + ?Sized>(&self, kind: &str, body: &B) -> Result<HttpRequest> {
        let kind = require_entity_kind(kind)?;
        Ok(self.client.build_request(
            HttpMethod::Post,
            &format!("/fields/{kind}/new"),
            None,
            Some(to_json_body(body)?),
        ))
    }

    pub fn build_edit<B: Serialize + ?Sized>(
        &self,
        method: &str,
        kind: &str,
        field_id: impl Display,
        body: &B,
    ) -> Result<HttpRequest> {
        let method = edit_method(method)?;
        let kind = require_entity_kind(kind)?;
        Ok(self.client.build_request(
            method,
            &format!("/fields/{kind}/{field_id}/edit"),
            None,
            Some(to_json_body(body)?),
        ))
    }

    pub fn build_delete(&self, kind: &str, field_id: impl Display) -> Result<HttpRequest> {
        let kind = require_entity_kind(kind)?;
        Ok(self.client.build_request(
            HttpMethod::Delete,
            &format!("/fields/{kind}/{field_id}/delete"),
            None,
            None,
        ))
    }
}
