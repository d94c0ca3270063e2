use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};
use std::env;
use std::time::Duration;

use crate::generator::prompt::{build_system_prompt, NUMBERED_REQUEST};
use crate::generator::{Generate, MessageContext, Tone};
use crate::web::models::{ChatMessage, ChatRole, Suggestion};

// A client for an OpenAI-compatible chat-completions server.
pub struct LlmGenerator {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
    model_tag: String,
}

impl LlmGenerator {
    pub fn new() -> Result<Self> {
        // Credentials come from the environment, never from code.
        let api_key = env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY is not set (required in llm mode)")?;
        let api_base = env::var("OPENAI_API_BASE")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        // An upstream call that hangs must not hang the request with it.
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        info!(
            "Using chat-completions server at {} (model: {}, timeout: {}s)",
            api_base, model, timeout_secs
        );

        let model_tag = format!("{}-llm", model);
        Ok(Self {
            client,
            api_base,
            api_key,
            model,
            model_tag,
        })
    }

    async fn complete(&self, system_prompt: &str) -> Result<String> {
        let temperature = env::var("TEMPERATURE")
            .ok()
            .and_then(|v| v.parse::<f32>().ok())
            .unwrap_or(0.8);

        let url = format!("{}/v1/chat/completions", self.api_base);

        let messages = vec![
            ChatMessage {
                role: ChatRole::System,
                content: system_prompt.to_string(),
            },
            ChatMessage {
                role: ChatRole::User,
                content: NUMBERED_REQUEST.to_string(),
            },
        ];

        let payload = json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": 500,
            "temperature": temperature,
            "presence_penalty": 0.6,
            "frequency_penalty": 0.3
        });

        debug!("Payload: {}", payload);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "API request failed with {}: {}",
                status,
                error_text
            ));
        }

        let response_json: Value = response.json().await?;
        debug!("Response JSON: {}", response_json);

        let content = response_json
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or_else(|| anyhow::anyhow!("Failed to extract content from response"))?;

        Ok(content.to_string())
    }
}

#[async_trait]
impl Generate for LlmGenerator {
    async fn generate(&self, context: &MessageContext, tone: Tone) -> Result<Vec<Suggestion>> {
        let system_prompt = build_system_prompt(context, tone);
        debug!("System prompt: {}", system_prompt);

        info!("Calling {}...", self.model);
        let raw = self.complete(&system_prompt).await?;
        debug!("Model response: {}", raw);

        let mut contents = parse_numbered_lines(&raw);
        if contents.len() < 3 {
            info!(
                "Only {} usable line(s) parsed, padding from the fallback pool",
                contents.len()
            );
            pad_with_fallback(&mut contents, context, tone);
        }

        Ok(contents
            .into_iter()
            .map(|content| Suggestion::new(content, tone))
            .collect())
    }

    fn model_tag(&self) -> &str {
        &self.model_tag
    }
}

// Keeps lines that start with 1-3, at most three of them, and strips the
// "N." / "N-" / "N)" marker. A bare digit with no marker stays in place.
fn parse_numbered_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| matches!(line.chars().next(), Some('1'..='3')))
        .take(3)
        .map(strip_marker)
        .collect()
}

fn strip_marker(line: &str) -> String {
    let mut chars = line.chars();
    if let (Some(digit), Some(punct)) = (chars.next(), chars.next()) {
        if ('1'..='3').contains(&digit) && matches!(punct, '.' | '-' | ')') {
            return chars.as_str().trim().to_string();
        }
    }
    line.to_string()
}

// Slot i gets fallback entry i; entry 0 covers any overrun.
fn pad_with_fallback(contents: &mut Vec<String>, context: &MessageContext, tone: Tone) {
    let fallback = fallback_pool(context, tone);
    while contents.len() < 3 {
        let entry = fallback
            .get(contents.len())
            .unwrap_or(&fallback[0])
            .clone();
        contents.push(entry);
    }
}

fn fallback_pool(context: &MessageContext, tone: Tone) -> Vec<String> {
    match tone {
        Tone::Casual => vec![
            format!(
                "こんにちは、{}さん！{}歳の{}です😊",
                context.partner_name, context.user_age, context.first_person
            ),
            format!(
                "お疲れさまです！{}の趣味は{}なんです♪",
                context.first_person, context.user_interests
            ),
            format!(
                "{}さん、{}について教えてくださいね！",
                context.partner_name, context.partner_interests
            ),
        ],
        Tone::Polite => vec![
            format!(
                "こんにちは、{}さん。{}歳の{}と申します。",
                context.partner_name, context.user_age, context.first_person
            ),
            format!(
                "お疲れさまでございます。{}の趣味は{}でございます。",
                context.first_person, context.user_interests
            ),
            format!(
                "{}さんの{}について、お聞かせいただけますでしょうか。",
                context.partner_name, context.partner_interests
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::models::GenerateRequest;

    #[test]
    fn parses_numbered_lines_and_strips_markers() {
        let raw = "1. Hello\n2) World\nnoise\n3- Foo";
        assert_eq!(parse_numbered_lines(raw), vec!["Hello", "World", "Foo"]);
    }

    #[test]
    fn ignores_lines_past_the_third() {
        let raw = "1. a\n2. b\n3. c\n1. d";
        assert_eq!(parse_numbered_lines(raw), vec!["a", "b", "c"]);
    }

    #[test]
    fn keeps_a_bare_leading_digit() {
        assert_eq!(parse_numbered_lines("1 Hello"), vec!["1 Hello"]);
    }

    #[test]
    fn padding_fills_empty_slots_from_the_fallback_pool() {
        let ctx = MessageContext::from_request(&GenerateRequest::default());
        let mut contents = vec!["生成された返信".to_string()];
        pad_with_fallback(&mut contents, &ctx, Tone::Casual);
        assert_eq!(contents.len(), 3);
        assert!(contents.iter().all(|c| !c.is_empty()));
        // Slots line up with the pool entries they came from.
        assert_eq!(contents[1], fallback_pool(&ctx, Tone::Casual)[1]);
        assert_eq!(contents[2], fallback_pool(&ctx, Tone::Casual)[2]);
    }

    #[test]
    fn polite_fallback_uses_polite_register() {
        let ctx = MessageContext::from_request(&GenerateRequest::default());
        let mut contents = Vec::new();
        pad_with_fallback(&mut contents, &ctx, Tone::Polite);
        assert_eq!(contents.len(), 3);
        assert!(contents[0].contains("申します"));
    }
}
