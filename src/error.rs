use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The upstream answered with `status: "error"` and a message
    #[error("{message}")]
    Application { status: u16, message: String },

    /// The upstream answered with a non-success status and no usable message
    #[error("API Error ({status}): {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Visualization unavailable: {0}")]
    Visualization(String),
}

impl AppError {
    /// HTTP status used when the error is sent back to the browser
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Application { status, .. } | AppError::UpstreamStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::HttpClient(_) | AppError::InvalidResponse(_) | AppError::Visualization(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message shown in the proxy error body
    fn message(&self) -> String {
        match self {
            AppError::Application { message, .. } => message.clone(),
            AppError::HttpClient(e) => {
                format!("Error contacting recommendation service: {}", e)
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "status": "error",
            "message": self.message(),
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
