use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;
use validator::ValidationErrors;

/// Everything a handler can fail with. Expected read misses are not
/// errors: those endpoints answer 200 with `ok: false` themselves.
#[derive(Debug)]
pub enum ApiError {
    /// Collected field-level messages, reported before any mutation.
    Validation(Vec<String>),
    /// Missing, malformed or expired bearer token.
    NotAuthenticated,
    /// Valid token, but the user it names no longer exists.
    NotAuthorized,
    InvalidCredentials,
    EmailTaken,
    UsernameTaken,
    /// A field value the endpoint cannot interpret, e.g. an unknown
    /// `type`.
    BadRequest,
    /// An id field that does not parse as a UUID.
    BadIdentifier,
    /// A mutation referenced an entity that is gone.
    NotFound(&'static str),
    /// Persistence failure, surfaced with its message, no retry.
    Storage(String),
    Internal(String),
}

/// Convert our errors to the uniform `{ok: false, message}` JSON shape.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(messages) => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(serde_json::json!({
                      "ok": false,
                      "message": messages
                    })),
                )
                    .into_response();
            }
            ApiError::NotAuthenticated => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Not authenticated.".to_string(),
            ),
            ApiError::NotAuthorized => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Not authorized.".to_string(),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::FORBIDDEN,
                "Wrong e-mail or password.".to_string(),
            ),
            ApiError::EmailTaken => (
                StatusCode::FORBIDDEN,
                "E-mail is already registered.".to_string(),
            ),
            ApiError::UsernameTaken => (
                StatusCode::FORBIDDEN,
                "Username is already registered.".to_string(),
            ),
            ApiError::BadRequest => (StatusCode::BAD_REQUEST, "Bad request".to_string()),
            ApiError::BadIdentifier => (StatusCode::BAD_REQUEST, "Bad format of id.".to_string()),
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found.")),
            ApiError::Storage(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(serde_json::json!({
              "ok": false,
              "message": message
            })),
        )
            .into_response()
    }
}

/// Collects every field message from a failed `validate()` call.
pub fn format_validation_errors(errors: &ValidationErrors) -> ApiError {
    let messages = errors
        .field_errors()
        .into_values()
        .flat_map(|field| field.iter())
        .map(|error| {
            error
                .message
                .as_ref()
                .map_or_else(|| error.code.to_string(), ToString::to_string)
        })
        .collect();
    ApiError::Validation(messages)
}
