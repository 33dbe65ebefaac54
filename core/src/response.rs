//! Response interpretation: body parsing, success/failure classification, and
//! error normalization.
//!
//! # Design
//! The HTTP status code is deliberately not consulted. The API reports
//! failures through an `errors` field in the body, and that field is the only
//! signal used. A body that is not JSON at all is a `MalformedResponse`.

use serde_json::Value;

use crate::error::{ErrorDetail, MauticError, NormalizedError, Result};
use crate::http::{HttpResponse, RawBody};

/// Outcome of classifying a parsed body.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Value),
    /// Carries the raw `errors` field.
    Failure(Value),
}

/// Decode the body, passing already-decoded JSON through.
pub fn parse_body(raw: RawBody) -> Result<Value> {
    match raw {
        RawBody::Json(value) => Ok(value),
        RawBody::Text(text) => serde_json::from_str(&text).map_err(MauticError::MalformedResponse),
    }
}

/// A truthy `errors` field means failure; anything else is success.
pub fn classify(body: Value) -> Outcome {
    match body.get("errors") {
        Some(errors) if is_truthy(errors) => Outcome::Failure(errors.clone()),
        _ => Outcome::Success(body),
    }
}

/// Normalize an `errors` field into a list of `{code, message}`.
///
/// A lone object becomes a one-element list, an array is taken as is, and
/// anything else yields an empty list.
pub fn normalize_errors(errors: &Value) -> NormalizedError {
    let details = match errors {
        Value::Object(_) => vec![detail(errors)],
        Value::Array(items) => items.iter().map(detail).collect(),
        _ => Vec::new(),
    };
    NormalizedError::new(details)
}

/// Parse, classify, and normalize in one step.
pub fn interpret(response: HttpResponse) -> Result<Value> {
    match classify(parse_body(response.body)?) {
        Outcome::Success(value) => Ok(value),
        Outcome::Failure(errors) => Err(MauticError::Api(normalize_errors(&errors))),
    }
}

fn detail(error: &Value) -> ErrorDetail {
    ErrorDetail {
        code: field_text(error.get("code")),
        message: field_text(error.get("message")),
    }
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_passes_decoded_json_through() {
        let value = json!({"contact": {"id": 5}});
        assert_eq!(parse_body(RawBody::Json(value.clone())).unwrap(), value);
    }

    #[test]
    fn parse_decodes_text() {
        assert_eq!(parse_body(RawBody::from(r#"{"total":"1"}"#)).unwrap(), json!({"total": "1"}));
    }

    #[test]
    fn parse_rejects_non_json() {
        let err = parse_body(RawBody::from("<html>502</html>")).unwrap_err();
        assert!(matches!(err, MauticError::MalformedResponse(_)));
    }

    #[test]
    fn success_returns_body_unchanged() {
        let body = json!({"contact": {"id": 5}});
        assert_eq!(classify(body.clone()), Outcome::Success(body));
    }

    #[test]
    fn falsy_errors_field_is_success() {
        for errors in [json!(null), json!(false), json!(0), json!("")] {
            let body = json!({"errors": errors, "total": 0});
            assert!(matches!(classify(body), Outcome::Success(_)), "{errors}");
        }
    }

    #[test]
    fn empty_array_is_still_a_failure() {
        let outcome = classify(json!({"errors": []}));
        assert_eq!(outcome, Outcome::Failure(json!([])));
        assert_eq!(normalize_errors(&json!([])).message, "");
    }

    #[test]
    fn array_of_errors_is_joined() {
        let err = normalize_errors(&json!([
            {"code": 400, "message": "email: This field is required."},
            {"code": 422, "message": "bad"}
        ]));
        assert_eq!(err.message, "400: email: This field is required., 422: bad");
        assert_eq!(err.details.len(), 2);
        assert_eq!(err.details[1].code, "422");
    }

    #[test]
    fn lone_error_object_is_wrapped() {
        let err = normalize_errors(&json!({"code": 401, "message": "unauthorized"}));
        assert_eq!(err.details.len(), 1);
        assert_eq!(err.message, "401: unauthorized");
    }

    #[test]
    fn malformed_errors_field_gives_empty_list() {
        let err = normalize_errors(&json!("something broke"));
        assert!(err.details.is_empty());
        assert_eq!(err.message, "");
    }

    #[test]
    fn interpret_builds_api_error() {
        let response = HttpResponse::new(200, r#"{"errors":[{"code":1,"message":"bad"}]}"#);
        let err = interpret(response).unwrap_err();
        assert_eq!(err.to_string(), "1: bad");
        assert!(matches!(err, MauticError::Api(_)));
    }

    #[test]
    fn interpret_ignores_status_code() {
        let response = HttpResponse::new(500, json!({"contact": {"id": 5}}));
        assert_eq!(interpret(response).unwrap(), json!({"contact": {"id": 5}}));
    }
}
