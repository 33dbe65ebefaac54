//! Endpoints that do not fit the standard resource layout: email sending,
//! form submissions, stats tables, and user helpers.

use std::fmt::Display;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::MauticClient;
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest};
use crate::params::QueryParams;
use crate::request::to_json_body;

#[derive(Debug, Clone, Copy)]
pub struct EmailsApi<'a> {
    client: &'a MauticClient,
}

impl<'a> EmailsApi<'a> {
    pub(crate) fn new(client: &'a MauticClient) -> Self {
        Self { client }
    }

    /// Send an email to one contact. The body (e.g. `tokens`, `assetAttachments`)
    /// defaults to `{}`.
    pub fn build_send_to_contact<B: Serialize + ?Sized>(
        &self,
        email_id: impl Display,
        contact_id: impl Display,
        body: Option<&B>,
    ) -> Result<HttpRequest> {
        let body = match body {
            Some(body) => to_json_body(body)?,
            None => to_json_body(&Map::<String, Value>::new())?,
        };
        Ok(self.client.build_request(
            HttpMethod::Post,
            &format!("/emails/{email_id}/contact/{contact_id}/send"),
            None,
            Some(body),
        ))
    }

    /// Send a segment email to its segments.
    pub fn build_send_to_segment(&self, email_id: impl Display) -> HttpRequest {
        self.client
            .build_request(HttpMethod::Post, &format!("/emails/{email_id}/send"), None, None)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormsApi<'a> {
    client: &'a MauticClient,
}

impl<'a> FormsApi<'a> {
    pub(crate) fn new(client: &'a MauticClient) -> Self {
        Self { client }
    }

    /// `DELETE /forms/{id}/fields/delete?fields[]=...`
    pub fn build_delete_fields(&self, form_id: impl Display, query: &QueryParams) -> HttpRequest {
        self.client.build_request(
            HttpMethod::Delete,
            &format!("/forms/{form_id}/fields/delete"),
            Some(query),
            None,
        )
    }

    /// `DELETE /forms/{id}/actions/delete?actions[]=...`
    pub fn build_delete_actions(&self, form_id: impl Display, query: &QueryParams) -> HttpRequest {
        self.client.build_request(
            HttpMethod::Delete,
            &format!("/forms/{form_id}/actions/delete"),
            Some(query),
            None,
        )
    }

    pub fn build_list_submissions(&self, form_id: impl Display) -> HttpRequest {
        self.client
            .build_request(HttpMethod::Get, &format!("/forms/{form_id}/submissions"), None, None)
    }

    pub fn build_list_submissions_for_contact(&self, form_id: impl Display, contact_id: impl Display) -> HttpRequest {
        self.client.build_request(
            HttpMethod::Get,
            &format!("/forms/{form_id}/submissions/contact/{contact_id}"),
            None,
            None,
        )
    }

    pub fn build_get_submission(&self, form_id: impl Display, submission_id: impl Display) -> HttpRequest {
        self.client.build_request(
            HttpMethod::Get,
            &format!("/forms/{form_id}/submissions/{submission_id}"),
            None,
            None,
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StatsApi<'a> {
    client: &'a MauticClient,
}

impl<'a> StatsApi<'a> {
    pub(crate) fn new(client: &'a MauticClient) -> Self {
        Self { client }
    }

    pub fn build_list_tables(&self) -> HttpRequest {
        self.client.build_request(HttpMethod::Get, "/stats", None, None)
    }

    /// Fetch rows from a stats table with a regular query (`start`, `limit`,
    /// or hand-written `where[...]` keys).
    pub fn build_get_table(&self, table: &str, query: Option<&QueryParams>) -> HttpRequest {
        self.client
            .build_request(HttpMethod::Get, &format!("/stats/{table}"), query, None)
    }

    /// Fetch rows where every `column == value` pair of `filter` matches.
    pub fn build_query_table(&self, table: &str, filter: &QueryParams) -> HttpRequest {
        self.client
            .build_filtered_request(&format!("/stats/{table}"), filter)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UsersApi<'a> {
    client: &'a MauticClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a MauticClient) -> Self {
        Self { client }
    }

    pub fn build_get_self(&self) -> HttpRequest {
        self.client.build_request(HttpMethod::Get, "/users/self", None, None)
    }

    pub fn build_check_permissions(&self, user_id: impl Display) -> HttpRequest {
        self.client.build_request(
            HttpMethod::Get,
            &format!("/users/{user_id}/permissioncheck"),
            None,
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::ClientConfig;
    use crate::resources::Resource;

    fn client() -> MauticClient {
        MauticClient::new(&ClientConfig::new("https://mautic.test", "x", "y"))
    }

    #[test]
    fn send_to_contact_defaults_to_empty_object() {
        let req = client().emails().build_send_to_contact::<Value>(2, 5, None).unwrap();
        assert_eq!(req.url, "https://mautic.test/api/emails/2/contact/5/send");
        assert_eq!(req.body.as_deref(), Some("{}"));

        let with_tokens = client()
            .emails()
            .build_send_to_contact(2, 5, Some(&json!({"tokens": {"{name}": "Jo"}})))
            .unwrap();
        let body: Value = serde_json::from_str(with_tokens.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"tokens": {"{name}": "Jo"}}));
    }

    #[test]
    fn send_to_segment_has_no_body() {
        let req = client().emails().build_send_to_segment(2);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "https://mautic.test/api/emails/2/send");
        assert!(req.body.is_none());
    }

    #[test]
    fn form_field_deletion_uses_bracket_arrays() {
        let query = QueryParams::new().with("fields", vec![4, 5]);
        let req = client().forms().build_delete_fields(1, &query);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "https://mautic.test/api/forms/1/fields/delete?fields[]=4&fields[]=5");
    }

    #[test]
    fn form_submissions() {
        let c = client();
        assert_eq!(c.forms().build_list_submissions(1).url, "https://mautic.test/api/forms/1/submissions");
        assert_eq!(
            c.forms().build_list_submissions_for_contact(1, 9).url,
            "https://mautic.test/api/forms/1/submissions/contact/9"
        );
        assert_eq!(
            c.forms().build_get_submission(1, 30).url,
            "https://mautic.test/api/forms/1/submissions/30"
        );
        let actions = QueryParams::new().with("actions", vec![2]);
        assert_eq!(
            c.forms().build_delete_actions(1, &actions).url,
            "https://mautic.test/api/forms/1/actions/delete?actions[]=2"
        );
    }

    #[test]
    fn stats_tables() {
        let c = client();
        assert_eq!(c.stats().build_list_tables().url, "https://mautic.test/api/stats");
        let query = QueryParams::new().with("start", 0).with("limit", 10);
        assert_eq!(
            c.stats().build_get_table("email_stats", Some(&query)).url,
            "https://mautic.test/api/stats/email_stats?start=0&limit=10"
        );
        let filter = QueryParams::new().with("email_id", 1).with("is_read", 1);
        assert_eq!(
            c.stats().build_query_table("email_stats", &filter).url,
            "https://mautic.test/api/stats/email_stats?where[0][col]=email_id&where[0][val]=1&where[0][expr]=eq&where[1][col]=is_read&where[1][val]=1&where[1][expr]=eq"
        );
    }

    #[test]
    fn user_helpers() {
        let c = client();
        assert_eq!(c.users().build_get_self().url, "https://mautic.test/api/users/self");
        assert_eq!(
            c.users().build_check_permissions(3).url,
            "https://mautic.test/api/users/3/permissioncheck"
        );
    }

    #[test]
    fn one_off_group_endpoints() {
        let c = client();
        assert_eq!(
            c.resource(Resource::PointActions).build_get_path("actions/types").url,
            "https://mautic.test/api/points/actions/types"
        );
        assert_eq!(
            c.resource(Resource::PointTriggers).build_get_path("events/types").url,
            "https://mautic.test/api/points/triggers/events/types"
        );
        assert_eq!(c.resource(Resource::Dashboard).build_list(None).url, "https://mautic.test/api/data");
        assert_eq!(c.resource(Resource::Themes).build_get("blank").url, "https://mautic.test/api/themes/blank");
    }
}
