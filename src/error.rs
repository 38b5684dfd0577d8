use crate::response::ErrorResponse;
use axum::{
    http::{header::ACCESS_CONTROL_ALLOW_ORIGIN, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

const FALLBACK_MESSAGE: &str = "Unexpected error during upload.";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("Unsupported content type, expected multipart/form-data")]
    UnsupportedContentType,
    #[error("Invalid base64 body: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("Multipart parse error: {0}")]
    Multipart(#[from] multer::Error),
    #[error("Missing configuration: {0}")]
    MissingConfiguration(&'static str),
    #[error("Upload exceeds the {0} byte limit")]
    PayloadTooLarge(usize),
    #[error("Failed to read request body: {0}")]
    Body(#[from] axum::Error),
    #[error("No video files found in upload.")]
    NoFilesProvided,
    #[error("{0}")]
    RemoteUpload(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid service account credentials: {0}")]
    Credentials(#[from] jsonwebtoken::errors::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::NoFilesProvided => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let code = self.status_code();

        let mut message = self.to_string();
        if message.trim().is_empty() {
            message = FALLBACK_MESSAGE.to_owned();
        }

        if code.is_server_error() {
            error!("Upload failed: {message}");
        }

        let body = ErrorResponse {
            ok: false,
            error: message,
        };

        (code, [(ACCESS_CONTROL_ALLOW_ORIGIN, "*")], Json(body)).into_response()
    }
}
