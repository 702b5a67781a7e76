use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::error;

/// Error surface exposed by the services and the API layer. Domain failures
/// are classified at the point of violation; anything unclassified falls
/// through to `Internal`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Client input is semantically wrong: duplicate username, invalid role,
    /// bad credentials, illegal state transition.
    #[error("{0}")]
    Validation(String),

    /// A referenced user or ride does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A conditional update lost its race: the ride already transitioned.
    #[error("{0}")]
    Conflict(String),

    /// Missing or invalid bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated, but the caller's role does not pass the gate.
    #[error("{0}")]
    Forbidden(String),

    /// Catch-all for infrastructure failures.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    pub timestamp: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match &self {
            ApiError::Internal(err) => {
                error!(error = %err, "unhandled internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        let body = ErrorBody {
            error: code,
            message,
            timestamp,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_expected_statuses() {
        let cases = [
            (ApiError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("raced".into()), StatusCode::CONFLICT),
            (
                ApiError::Unauthorized("no token".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::Forbidden("wrong role".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                ApiError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn body_carries_code_message_and_timestamp() {
        let body = ErrorBody {
            error: "NOT_FOUND",
            message: "Ride not found".into(),
            timestamp: OffsetDateTime::now_utc().format(&Rfc3339).unwrap(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "NOT_FOUND");
        assert_eq!(json["message"], "Ride not found");
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }
}
