use once_cell::sync::Lazy;
use tiktoken_rs::{ cl100k_base, CoreBPE };

use crate::models::chat::ChatMessage;

// gpt-3.5-turbo vocabulary. Loading parses the embedded ranks once.
static BPE: Lazy<CoreBPE> = Lazy::new(|| cl100k_base().expect("embedded cl100k_base vocabulary"));

/// Number of tokens the upstream model counts for `text`.
pub fn count(text: &str) -> usize {
    BPE.encode_ordinary(text).len()
}

/// Sum of token counts across all message contents.
pub fn count_messages(messages: &[ChatMessage]) -> usize {
    messages.iter().map(|message| count(&message.content)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;

    #[test]
    fn empty_text_counts_zero() {
        assert_eq!(count(""), 0);
    }

    #[test]
    fn plain_text_counts_at_least_one_token_per_word() {
        assert!(count("hello world") >= 2);
    }

    #[test]
    fn message_counts_sum_across_the_conversation() {
        let messages = vec![
            ChatMessage { role: Role::User, content: "hello there".to_string() },
            ChatMessage { role: Role::Assistant, content: "".to_string() },
            ChatMessage { role: Role::User, content: "how are you".to_string() },
        ];
        let total = count_messages(&messages);
        assert_eq!(total, count("hello there") + count("how are you"));
        assert!(total > 0);
    }
}
