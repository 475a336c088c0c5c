pub mod chat;
pub mod moderation;

use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use std::error::Error as StdError;
use std::time::Duration;

/// Connection settings shared by both OpenAI endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub moderation_url: String,
    pub chat_url: String,
    pub chat_model: String,
    /// No bound is applied when unset; a hung upstream call then hangs the request.
    pub request_timeout: Option<Duration>,
}

pub(crate) fn build_http_client(
    config: &OpenAiConfig
) -> Result<HttpClient, Box<dyn StdError + Send + Sync>> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| format!("Invalid API key format: {}", e))?
    );

    let mut builder = HttpClient::builder().default_headers(headers);
    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }

    builder.build().map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)
}
