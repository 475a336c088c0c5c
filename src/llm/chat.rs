use bytes::Bytes;
use futures::{ Stream, StreamExt };
use reqwest::Client as HttpClient;
use serde::Serialize;
use std::error::Error as StdError;
use std::pin::Pin;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use super::OpenAiConfig;
use crate::error::RelayError;
use crate::models::chat::ChatMessage;

const SERVICE: &str = "chat completion";

/// Sampling temperature sent with every completion request.
const TEMPERATURE: f64 = 0.9;

/// Raw upstream body, relayed chunk by chunk without inspection.
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<Bytes, RelayError>> + Send>>;

pub struct ChatCompletionClient {
    http: HttpClient,
    url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    stream: bool,
}

impl ChatCompletionClient {
    pub fn from_config(config: &OpenAiConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Ok(Self {
            http: super::build_http_client(config)?,
            url: config.chat_url.clone(),
            model: config.chat_model.clone(),
        })
    }

    /// POST the conversation with `stream: true` and hand back the body bytes
    /// as they arrive. The status is checked before any byte is relayed.
    pub async fn stream_completion(
        &self,
        messages: &[ChatMessage]
    ) -> Result<CompletionStream, RelayError> {
        let req = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
            stream: true,
        };

        let resp = self.http
            .post(&self.url)
            .json(&req)
            .send()
            .await
            .map_err(|source| RelayError::Transport { service: SERVICE, source })?;

        if !resp.status().is_success() {
            return Err(RelayError::UpstreamStatus {
                service: SERVICE,
                status: resp.status(),
            });
        }

        let (tx, rx) = mpsc::channel::<Result<Bytes, RelayError>>(32);

        tokio::spawn(async move {
            let mut stream = resp.bytes_stream();

            while let Some(chunk) = stream.next().await {
                match chunk {
                    Ok(bytes) => {
                        if tx.send(Ok(bytes)).await.is_err() {
                            // caller hung up
                            return;
                        }
                    }
                    Err(source) => {
                        let _ = tx.send(Err(RelayError::Transport { service: SERVICE, source })).await;
                        return;
                    }
                }
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}
