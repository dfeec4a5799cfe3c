use axum::{http::StatusCode, response::IntoResponse};
use bsky::FetchError;

/// An error rendered to the client as a plain-text body.
#[derive(Debug)]
pub struct ResponseError {
    pub(crate) status: StatusCode,
    pub(crate) message: String,
}

impl ResponseError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ResponseError {
    fn into_response(self) -> axum::response::Response {
        tracing::warn!(status = %self.status, error = %self.message, "ResponseError");

        (self.status, self.message).into_response()
    }
}

// Upstream failures all surface as 400 with the raw error text, whatever
// their cause.
impl From<FetchError> for ResponseError {
    fn from(err: FetchError) -> Self {
        ResponseError::bad_request(err.to_string())
    }
}
