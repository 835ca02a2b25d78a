//! JSON body and query string extractors that reject with [`ApiError`].
//!
//! axum's own `Json` and `Query` answer malformed input with a plain-text
//! body (and `400` for queries). These wrappers turn every rejection into
//! the usual `422 validation_error` with per-field details.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Drop-in for `axum::Json` on the request side.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

/// Drop-in for `axum::extract::Query`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => deserialize_error(&err.body_text(), "body"),
            JsonRejection::JsonSyntaxError(_) => {
                ApiError::field("body", "The request body is not valid JSON.")
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::field("body", "The request body must be sent as application/json.")
            }
            other => ApiError::field("body", other.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        deserialize_error(&rejection.body_text(), "query")
    }
}

/// Maps a serde error message onto the offending field.
///
/// Messages look like `<context>: missing field `reason``, or
/// `<context>: status: unknown variant `bogus`, ...` when the error carries
/// a path. Anything else is reported against `fallback`.
fn deserialize_error(text: &str, fallback: &str) -> ApiError {
    if let Some(field) = missing_field(text) {
        return ApiError::field(&field, format!("The {field} field is required."));
    }

    let detail = text.split_once(": ").map_or(text, |(_, rest)| rest);
    match detail.split_once(": ") {
        Some((path, _)) if is_field_path(path) => {
            ApiError::field(path, format!("The {path} field is invalid."))
        }
        _ => ApiError::field(fallback, format!("The {fallback} is invalid: {detail}")),
    }
}

fn missing_field(text: &str) -> Option<String> {
    let (_, rest) = text.split_once("missing field `")?;
    let (name, _) = rest.split_once('`')?;
    Some(name.to_string())
}

fn is_field_path(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_detail(error: ApiError) -> (String, String) {
        match error {
            ApiError::InvalidFields(details) => {
                (details[0].field.clone(), details[0].message.clone())
            }
            other => panic!("Expected InvalidFields, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_field_is_named() {
        let (field, message) = first_detail(deserialize_error(
            "Failed to deserialize the JSON body into the target type: missing field `reason` at line 1 column 52",
            "body",
        ));
        assert_eq!(field, "reason");
        assert_eq!(message, "The reason field is required.");
    }

    #[test]
    fn test_path_prefix_is_named() {
        let (field, message) = first_detail(deserialize_error(
            "Failed to deserialize query string: status: unknown variant `bogus`, expected one of `pending`, `approved`, `rejected`",
            "query",
        ));
        assert_eq!(field, "status");
        assert_eq!(message, "The status field is invalid.");
    }

    #[test]
    fn test_unlocated_error_uses_fallback() {
        let (field, message) = first_detail(deserialize_error(
            "Failed to deserialize query string: invalid type: string \"x\", expected i64",
            "query",
        ));
        assert_eq!(field, "query");
        assert!(message.starts_with("The query is invalid: invalid type"));
    }

    #[test]
    fn test_is_field_path() {
        assert!(is_field_path("employee_id"));
        assert!(is_field_path("items[0].name"));
        assert!(!is_field_path("invalid type"));
        assert!(!is_field_path(""));
    }
}
