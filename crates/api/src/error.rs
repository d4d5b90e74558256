//! HTTP-facing errors.
//!
//! Every failure leaves the API as `{"code": <status>, "message": <text>}`.
//! Causes are logged here and never leak into the response body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::Display;
use serde::Serialize;

#[derive(Debug, Display)]
pub enum ApiError {
    #[display("Invalid date format. Use YYYY-MM-DD.")]
    InvalidDate,
    #[display("{_0}")]
    NotFound(&'static str),
    #[display("Internal Server Error")]
    Internal,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl ApiError {
    /// Log an archive failure and hide it behind a 500.
    pub(crate) fn store(err: apod_archive::error::Error) -> Self {
        tracing::error!(error = ?err, "archive query failed");
        Self::Internal
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidDate => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody { code: status.as_u16(), message: self.to_string() };
        (status, Json(body)).into_response()
    }
}
