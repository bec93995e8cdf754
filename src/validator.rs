use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use campus_erp_core::AppError;

fn format_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reads the part of a serde message between the first pair of backticks.
fn backticked(message: &str, after: &str) -> Option<String> {
    message
        .split(after)
        .nth(1)
        .and_then(|s| s.split('`').nth(1))
        .map(str::to_string)
}

/// JSON body extractor that runs `validator` rules before the handler.
///
/// Malformed bodies are 400s, rule violations are 422s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let error_msg = rejection.body_text();

                if error_msg.contains("missing field") {
                    let field = error_msg
                        .split("missing field `")
                        .nth(1)
                        .and_then(|s| s.split('`').next())
                        .unwrap_or("unknown");
                    return AppError::new(
                        StatusCode::BAD_REQUEST,
                        anyhow!("{} is required", field),
                    );
                }

                if error_msg.contains("unknown variant") {
                    let value = backticked(&error_msg, "unknown variant").unwrap_or_default();
                    return AppError::new(
                        StatusCode::BAD_REQUEST,
                        anyhow!("'{}' is not a valid choice", value),
                    );
                }

                if error_msg.contains("invalid type") {
                    return AppError::new(
                        StatusCode::BAD_REQUEST,
                        anyhow!("Invalid field type in request"),
                    );
                }

                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return AppError::new(
                        StatusCode::BAD_REQUEST,
                        anyhow!("Missing 'Content-Type: application/json' header"),
                    );
                }

                AppError::new(StatusCode::BAD_REQUEST, anyhow!("Invalid request body"))
            })?;

        value.validate().map_err(|errors| {
            AppError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                anyhow!("{}", format_errors(&errors)),
            )
        })?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Dto {
        #[validate(length(min = 1, max = 10))]
        code: String,
        #[validate(range(min = 1))]
        credits: i32,
    }

    fn request(body: &str) -> Request {
        Request::builder()
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let ValidatedJson(dto) =
            ValidatedJson::<Dto>::from_request(request(r#"{"code":"CS101","credits":3}"#), &())
                .await
                .unwrap();
        assert_eq!(dto.code, "CS101");
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let err = ValidatedJson::<Dto>::from_request(request(r#"{"code":"CS101"}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "credits is required");
    }

    #[tokio::test]
    async fn test_rule_violation_is_unprocessable() {
        let err = ValidatedJson::<Dto>::from_request(request(r#"{"code":"","credits":0}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message(), "code is invalid, credits is invalid");
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let req = Request::builder()
            .body(Body::from(r#"{"code":"CS101","credits":3}"#))
            .unwrap();
        let err = ValidatedJson::<Dto>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_backticked() {
        let msg = "status: unknown variant `DONE`, expected one of `OPEN`, `CLOSED`";
        assert_eq!(backticked(msg, "unknown variant"), Some("DONE".to_string()));
    }
}
