use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };
use std::collections::HashMap;
use std::error::Error as StdError;

use super::OpenAiConfig;
use crate::error::RelayError;

const SERVICE: &str = "moderation";

pub struct ModerationClient {
    http: HttpClient,
    url: String,
}

#[derive(Serialize)]
struct ModerationRequest<'a> {
    input: &'a str,
}

#[derive(Deserialize)]
struct ModerationResponse {
    results: Vec<ModerationResult>,
}

/// Verdict for one input, consumed once and discarded.
#[derive(Clone, Debug, Deserialize)]
pub struct ModerationResult {
    pub flagged: bool,
    #[serde(default)]
    pub categories: HashMap<String, bool>,
}

impl ModerationResult {
    pub fn flagged_categories(&self) -> Vec<&str> {
        self.categories
            .iter()
            .filter(|(_, hit)| **hit)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl ModerationClient {
    pub fn from_config(config: &OpenAiConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Ok(Self {
            http: super::build_http_client(config)?,
            url: config.moderation_url.clone(),
        })
    }

    /// Classify `input` against the moderation model.
    pub async fn classify(&self, input: &str) -> Result<ModerationResult, RelayError> {
        let resp = self.http
            .post(&self.url)
            .json(&ModerationRequest { input })
            .send()
            .await
            .map_err(|source| RelayError::Transport { service: SERVICE, source })?;

        if !resp.status().is_success() {
            return Err(RelayError::UpstreamStatus {
                service: SERVICE,
                status: resp.status(),
            });
        }

        let body: ModerationResponse = resp
            .json()
            .await
            .map_err(|source| RelayError::Transport { service: SERVICE, source })?;

        body.results
            .into_iter()
            .next()
            .ok_or_else(|| RelayError::MalformedUpstream {
                service: SERVICE,
                detail: "empty results array".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_flagged_result_with_categories() {
        let body = r#"{"results":[{"flagged":true,"categories":{"hate":true,"violence":false}}]}"#;
        let parsed: ModerationResponse = serde_json::from_str(body).unwrap();
        let result = &parsed.results[0];
        assert!(result.flagged);
        assert_eq!(result.flagged_categories(), vec!["hate"]);
    }

    #[test]
    fn categories_are_optional() {
        let body = r#"{"results":[{"flagged":false}]}"#;
        let parsed: ModerationResponse = serde_json::from_str(body).unwrap();
        assert!(!parsed.results[0].flagged);
        assert!(parsed.results[0].categories.is_empty());
    }

    #[test]
    fn request_body_matches_the_wire_shape() {
        let value = serde_json::to_value(ModerationRequest { input: "some text" }).unwrap();
        assert_eq!(value, serde_json::json!({ "input": "some text" }));
    }
}
