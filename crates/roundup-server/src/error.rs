use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roundup_core::error::RoundupError;

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<RoundupError>() {
            match e {
                RoundupError::SubmissionClosed => StatusCode::FORBIDDEN,
                RoundupError::InvalidSubmission(_) => StatusCode::BAD_REQUEST,
                RoundupError::NotInitialized => StatusCode::BAD_REQUEST,
                RoundupError::InvalidMonth { .. }
                | RoundupError::DateOutOfRange { .. }
                | RoundupError::InvalidTime(_)
                | RoundupError::UnknownAction(_)
                | RoundupError::PopulationMissing(_)
                | RoundupError::RunnerNotFound(_)
                | RoundupError::ActionSpawnFailed(_)
                | RoundupError::ActionFailed { .. }
                | RoundupError::NotifyFailed { .. }
                | RoundupError::Io(_)
                | RoundupError::Yaml(_)
                | RoundupError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!("request failed: {:#}", self.0);
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
