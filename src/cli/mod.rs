use clap::Parser;
use std::time::Duration;

use crate::llm::OpenAiConfig;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// API key used as the bearer token for both outbound OpenAI calls.
    #[arg(long, env = "OPENAI_API_KEY", default_value = "")]
    pub openai_api_key: String,

    /// Endpoint for the moderation pre-check.
    #[arg(long, env = "MODERATION_URL", default_value = "https://api.openai.com/v1/moderations")]
    pub moderation_url: String,

    /// Endpoint for streamed chat completions.
    #[arg(long, env = "CHAT_URL", default_value = "https://api.openai.com/v1/chat/completions")]
    pub chat_url: String,

    /// Model name for chat completion.
    #[arg(long, env = "CHAT_MODEL", default_value = "gpt-3.5-turbo")]
    pub chat_model: String,

    /// Timeout in seconds applied to each outbound call. Unbounded when unset.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS")]
    pub upstream_timeout_secs: Option<u64>,

    /// Optional path to the TLS certificate file (PEM format) for serving HTTPS. Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format) for serving HTTPS. Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

impl Args {
    pub fn openai_config(&self) -> OpenAiConfig {
        OpenAiConfig {
            api_key: self.openai_api_key.clone(),
            moderation_url: self.moderation_url.clone(),
            chat_url: self.chat_url.clone(),
            chat_model: self.chat_model.clone(),
            request_timeout: self.upstream_timeout_secs.map(Duration::from_secs),
        }
    }
}
