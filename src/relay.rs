use log::{ info, warn };
use std::error::Error as StdError;

use crate::error::RelayError;
use crate::llm::OpenAiConfig;
use crate::llm::chat::{ ChatCompletionClient, CompletionStream };
use crate::llm::moderation::ModerationClient;
use crate::models::chat::{ ChatMessage, ChatRequest, Role };
use crate::tokens;

/// Instruction message injected ahead of every conversation.
pub const SYSTEM_PROMPT: &str =
    "You are a virtual assistant for a company called Four Leaves Studio. Your name is Tigaron Noragit";

/// Hard ceiling on prompt size. Requests at or over it are rejected outright,
/// never truncated.
pub const TOKEN_LIMIT: usize = 4000;

pub struct ChatRelay {
    config: OpenAiConfig,
    moderation: ModerationClient,
    chat: ChatCompletionClient,
}

impl ChatRelay {
    pub fn from_config(config: OpenAiConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let moderation = ModerationClient::from_config(&config)?;
        let chat = ChatCompletionClient::from_config(&config)?;
        Ok(Self { config, moderation, chat })
    }

    /// Run one request through the full gate sequence and open the
    /// completion stream. At most two outbound calls are made, moderation
    /// strictly before chat.
    pub async fn handle(&self, body: &[u8]) -> Result<CompletionStream, RelayError> {
        if self.config.api_key.is_empty() {
            return Err(RelayError::MissingApiKey);
        }

        let request: ChatRequest = serde_json
            ::from_slice(body)
            .map_err(|e| RelayError::BadRequest(format!("invalid request body: {}", e)))?;

        let last = request.messages
            .last()
            .ok_or_else(|| RelayError::BadRequest("messages must not be empty".to_string()))?;

        let mut token_count = tokens::count_messages(&request.messages);

        let verdict = self.moderation.classify(&last.content).await?;
        if verdict.flagged {
            warn!("last message flagged by moderation: {:?}", verdict.flagged_categories());
            return Err(RelayError::Flagged);
        }

        token_count += tokens::count(SYSTEM_PROMPT);
        if token_count >= TOKEN_LIMIT {
            return Err(RelayError::QuotaExceeded { tokens: token_count, limit: TOKEN_LIMIT });
        }

        let messages = with_system_prompt(request.messages);
        info!(
            "forwarding {} messages ({} tokens) to {}",
            messages.len(),
            token_count,
            self.config.chat_model
        );

        self.chat.stream_completion(&messages).await
    }
}

/// `[system prompt] + original messages`, original order preserved.
fn with_system_prompt(original: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(original.len() + 1);
    messages.push(ChatMessage {
        role: Role::System,
        content: SYSTEM_PROMPT.to_string(),
    });
    messages.extend(original);
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_is_prepended_and_order_preserved() {
        let original = vec![
            ChatMessage { role: Role::User, content: "first".to_string() },
            ChatMessage { role: Role::Assistant, content: "second".to_string() },
            ChatMessage { role: Role::User, content: "third".to_string() },
        ];

        let messages = with_system_prompt(original);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, SYSTEM_PROMPT);
        assert_eq!(messages[1].content, "first");
        assert_eq!(messages[2].content, "second");
        assert_eq!(messages[3].content, "third");
    }

    #[test]
    fn system_prompt_fits_well_under_the_ceiling() {
        assert!(tokens::count(SYSTEM_PROMPT) < TOKEN_LIMIT);
    }
}
