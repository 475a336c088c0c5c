use axum::Json;
use axum::http::StatusCode;
use axum::response::{ IntoResponse, Response };
use log::error;
use serde_json::json;
use thiserror::Error;

/// The only message callers ever see, whatever actually went wrong.
pub const GENERIC_ERROR_MESSAGE: &str = "There was an error processing your request";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned status {status}")]
    UpstreamStatus {
        service: &'static str,
        status: StatusCode,
    },

    #[error("{service} response was malformed: {detail}")]
    MalformedUpstream {
        service: &'static str,
        detail: String,
    },

    #[error("message was flagged by the moderation model")]
    Flagged,

    #[error("conversation is {tokens} tokens, over the {limit} token limit")]
    QuotaExceeded { tokens: usize, limit: usize },
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        error!("chat relay request failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": GENERIC_ERROR_MESSAGE })),
        )
            .into_response()
    }
}
