//! Resource groups and their standard endpoints.
//!
//! Most groups share the same URL layout below their prefix:
//!
//! | operation      | request                                   |
//! |----------------|-------------------------------------------|
//! | get            | `GET {prefix}/{id}`                       |
//! | list           | `GET {prefix}?query`                      |
//! | create         | `POST {prefix}/new`                       |
//! | edit           | `PUT` or `PATCH {prefix}/{id}/edit`       |
//! | delete         | `DELETE {prefix}/{id}/delete`             |
//! | add contact    | `POST {prefix}/{id}/contact/{cid}/add`    |
//! | remove contact | `POST {prefix}/{id}/contact/{cid}/remove` |
//!
//! `ResourceApi` builds these for any [`Resource`]. Groups with extra or
//! irregular endpoints get their own API types elsewhere in the crate.

use std::fmt::Display;

use serde::Serialize;

use crate::client::MauticClient;
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest};
use crate::params::QueryParams;
use crate::request::{edit_method, to_json_body};

/// A named group of endpoints sharing a URL prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Assets,
    Campaigns,
    Categories,
    Companies,
    Contacts,
    Dashboard,
    DynamicContent,
    Emails,
    Forms,
    MarketingMessages,
    Notes,
    Notifications,
    Pages,
    PointActions,
    PointTriggers,
    Roles,
    Segments,
    Stages,
    Stats,
    TextMessages,
    Themes,
    Tweets,
    Users,
    Webhooks,
}

impl Resource {
    pub const ALL: [Resource; 24] = [
        Resource::Assets,
        Resource::Campaigns,
        Resource::Categories,
        Resource::Companies,
        Resource::Contacts,
        Resource::Dashboard,
        Resource::DynamicContent,
        Resource::Emails,
        Resource::Forms,
        Resource::MarketingMessages,
        Resource::Notes,
        Resource::Notifications,
        Resource::Pages,
        Resource::PointActions,
        Resource::PointTriggers,
        Resource::Roles,
        Resource::Segments,
        Resource::Stages,
        Resource::Stats,
        Resource::TextMessages,
        Resource::Themes,
        Resource::Tweets,
        Resource::Users,
        Resource::Webhooks,
    ];

    /// URL prefix below `/api`.
    pub fn prefix(self) -> &'static str {
        match self {
            Resource::Assets => "/assets",
            Resource::Campaigns => "/campaigns",
            Resource::Categories => "/categories",
            Resource::Companies => "/companies",
            Resource::Contacts => "/contacts",
            Resource::Dashboard => "/data",
            Resource::DynamicContent => "/dynamiccontents",
            Resource::Emails => "/emails",
            Resource::Forms => "/forms",
            Resource::MarketingMessages => "/messages",
            Resource::Notes => "/notes",
            Resource::Notifications => "/notifications",
            Resource::Pages => "/pages",
            Resource::PointActions => "/points",
            Resource::PointTriggers => "/points/triggers",
            Resource::Roles => "/roles",
            Resource::Segments => "/segments",
            Resource::Stages => "/stages",
            Resource::Stats => "/stats",
            Resource::TextMessages => "/smses",
            Resource::Themes => "/themes",
            Resource::Tweets => "/tweets",
            Resource::Users => "/users",
            Resource::Webhooks => "/hooks",
        }
    }
}

/// Standard endpoints of one resource group.
#[derive(Debug, Clone, Copy)]
pub struct ResourceApi<'a> {
    client: &'a MauticClient,
    resource: Resource,
}

impl<'a> ResourceApi<'a> {
    pub(crate) fn new(client: &'a MauticClient, resource: Resource) -> Self {
        Self { client, resource }
    }

    fn path(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.resource.prefix())
    }

    pub fn build_get(&self, id: impl Display) -> HttpRequest {
        self.client
            .build_request(HttpMethod::Get, &self.path(&format!("/{id}")), None, None)
    }

    pub fn build_list(&self, query: Option<&QueryParams>) -> HttpRequest {
        self.client
            .build_request(HttpMethod::Get, self.resource.prefix(), query, None)
    }

    pub fn build_create<B: Serialize + ?Sized>(&self, body: &B) -> Result<HttpRequest> {
        Ok(self.client.build_request(
            HttpMethod::Post,
            &self.path("/new"),
            None,
            Some(to_json_body(body)?),
        ))
    }

    /// `method` must be `"PUT"` (replace) or `"PATCH"` (merge).
    pub fn build_edit<B: Serialize + ?Sized>(&self, method: &str, id: impl Display, body: &B) -> Result<HttpRequest> {
        let method = edit_method(method)?;
        Ok(self.client.build_request(
            method,
            &self.path(&format!("/{id}/edit")),
            None,
            Some(to_json_body(body)?),
        ))
    }

    pub fn build_delete(&self, id: impl Display) -> HttpRequest {
        self.client
            .build_request(HttpMethod::Delete, &self.path(&format!("/{id}/delete")), None, None)
    }

    pub fn build_add_contact(&self, id: impl Display, contact_id: impl Display) -> HttpRequest {
        self.client.build_request(
            HttpMethod::Post,
            &self.path(&format!("/{id}/contact/{contact_id}/add")),
            None,
            None,
        )
    }

    pub fn build_remove_contact(&self, id: impl Display, contact_id: impl Display) -> HttpRequest {
        self.client.build_request(
            HttpMethod::Post,
            &self.path(&format!("/{id}/contact/{contact_id}/remove")),
            None,
            None,
        )
    }

    /// `GET {prefix}/{suffix}` for the group's one-off listing endpoints,
    /// e.g. `campaigns/{id}/contacts` or `hooks/triggers`.
    pub fn build_get_path(&self, suffix: &str) -> HttpRequest {
        self.client
            .build_request(HttpMethod::Get, &self.path(&format!("/{suffix}")), None, None)
    }
}
