use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::OpenAiConfig;
use crate::http_client::{body_snippet, long_client};

const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 0.7;

/// Turns a system prompt plus a user prompt into post markdown.
pub trait TextGenerator {
    fn generate(&self, system: &str, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat-completions client. Blocking, one request per post.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    config: OpenAiConfig,
}

impl OpenAiGenerator {
    pub fn new(config: OpenAiConfig) -> Self {
        Self { config }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

impl TextGenerator for OpenAiGenerator {
    fn generate(&self, system: &str, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        debug!(model = %self.config.model, "chat completion request");
        let resp = long_client()?
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .context("chat completion request failed")?;

        let status = resp.status();
        let body = resp.text().context("read chat completion body")?;
        if !status.is_success() {
            bail!("chat completion http {}: {}", status, body_snippet(&body));
        }

        let content = parse_chat_content(&body)?;
        info!(chars = content.len(), "generated post text");
        Ok(content)
    }
}

/// First choice's message content from a chat-completions response body.
pub fn parse_chat_content(body: &str) -> Result<String> {
    let parsed: ChatResponse =
        serde_json::from_str(body).context("invalid chat completion json")?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| anyhow!("chat completion returned no content"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_choice() {
        let body = r##"{"choices":[{"message":{"role":"assistant","content":"  # Title\nBody \n"}},{"message":{"content":"second"}}]}"##;
        assert_eq!(parse_chat_content(body).unwrap(), "# Title\nBody");
    }

    #[test]
    fn empty_or_missing_content_is_error() {
        assert!(parse_chat_content(r#"{"choices":[]}"#).is_err());
        assert!(parse_chat_content(r#"{"choices":[{"message":{"content":null}}]}"#).is_err());
        assert!(parse_chat_content(r#"{"choices":[{"message":{"content":"   "}}]}"#).is_err());
        assert!(parse_chat_content("not json").is_err());
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let generator = OpenAiGenerator::new(OpenAiConfig {
            api_key: "k".to_string(),
            model: "gpt-4o".to_string(),
            base_url: "http://localhost:9999/v1/".to_string(),
        });
        assert_eq!(generator.endpoint(), "http://localhost:9999/v1/chat/completions");
    }
}
