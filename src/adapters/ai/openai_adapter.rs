//! OpenAI-compatible adapter for CRON generation and description.
//!
//! Supports OpenAI API, Azure OpenAI, and local Ollama instances.
//! Implements `AiPort` with JSON-mode requests, markdown stripping and schema parsing.

use crate::domain::{
    DescribeCronInput, DescribeCronOutput, DomainError, GenerateCronInput, GenerateCronOutput,
};
use crate::ports::AiPort;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// OpenAI-compatible AI adapter.
///
/// Can be configured to work with:
/// - OpenAI API (api.openai.com)
/// - Azure OpenAI
/// - Ollama (localhost)
/// - Any OpenAI-compatible API
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiAdapter {
    /// Create a new OpenAI adapter.
    ///
    /// # Arguments
    /// * `api_url` - API endpoint (e.g., "https://api.openai.com/v1/chat/completions")
    /// * `api_key` - API key (can be empty for local Ollama)
    /// * `model` - Model name (e.g., "gpt-4o-mini", "llama3.2")
    /// * `timeout` - Per-request deadline; elapsing it yields a "Deadline exceeded" error
    pub fn new(api_url: String, api_key: String, model: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_url,
            api_key,
            model,
        }
    }

    fn generate_system_prompt() -> &'static str {
        r#"You are a CRON expression expert. You generate a CRON expression from the user's natural language description of a schedule.

Rules:
- If the description does not represent a valid schedule, set "isValidSchedule" to false and "cronExpression" to an empty string.
- If the description is valid, set "isValidSchedule" to true and put the CRON expression in "cronExpression".
- Use standard CRON syntax with 5 fields (minute hour day-of-month month day-of-week). Use 6 fields only when the description needs seconds; the seconds field then comes first.

You MUST respond with valid JSON only:
{"cronExpression": "string", "isValidSchedule": true}"#
    }

    fn describe_system_prompt() -> &'static str {
        r#"You are a CRON expression expert. You give a clear, concise natural language description of a CRON expression.

Rules:
- If the input is not a syntactically valid CRON expression (it must have 5 or 6 fields), set "isValidCron" to false and "description" to an empty string.
- If it is valid, set "isValidCron" to true and put a one-sentence description in "description".

You MUST respond with valid JSON only:
{"description": "string", "isValidCron": true}"#
    }

    fn generate_user_prompt(input: &GenerateCronInput) -> String {
        format!("Description: {}", input.description)
    }

    fn describe_user_prompt(input: &DescribeCronInput) -> String {
        format!("CRON Expression: {}", input.cron_expression)
    }

    /// Sanitize JSON response from LLM.
    ///
    /// LLMs sometimes wrap JSON in markdown code blocks. This strips them.
    fn sanitize_json(raw_text: &str) -> String {
        let trimmed = raw_text.trim();

        // Handle markdown code blocks: ```json ... ``` or ``` ... ```
        if let Some(rest) = trimmed.strip_prefix("```") {
            let without_prefix = rest.strip_prefix("json").unwrap_or(rest);
            if let Some(end_idx) = without_prefix.rfind("```") {
                return without_prefix[..end_idx].trim().to_string();
            }
            return without_prefix.trim().to_string();
        }

        // Prose around a single object
        if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
            if start < end {
                return trimmed[start..=end].to_string();
            }
        }

        trimmed.to_string()
    }

    /// Send one JSON-mode chat completion and parse the reply into `T`.
    async fn complete_json<T: DeserializeOwned>(
        &self,
        system: &str,
        user: String,
    ) -> Result<T, DomainError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user,
                },
            ],
            temperature: 0.2,
            response_format: Some(ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::Ai(format!("Deadline exceeded: {}", e))
                } else {
                    DomainError::Ai(format!("HTTP request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "AI API returned error");
            return Err(DomainError::Ai(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Ai(format!("Failed to parse API response: {}", e)))?;

        let raw_content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| DomainError::Ai("No response choices returned".to_string()))?;

        debug!(raw_len = raw_content.len(), "received AI response");

        let clean_json = Self::sanitize_json(&raw_content);
        serde_json::from_str(&clean_json).map_err(|e| {
            warn!(
                error = %e,
                json = %clean_json.chars().take(200).collect::<String>(),
                "JSON parse failed"
            );
            DomainError::Ai(format!("Failed to parse LLM JSON: {}", e))
        })
    }
}

/// OpenAI API request structure.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// OpenAI API response structure.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: String,
}

#[async_trait::async_trait]
impl AiPort for OpenAiAdapter {
    async fn generate_cron(
        &self,
        input: &GenerateCronInput,
    ) -> Result<GenerateCronOutput, DomainError> {
        info!(
            description_len = input.description.len(),
            "sending description to AI for CRON generation"
        );
        let output: GenerateCronOutput = self
            .complete_json(Self::generate_system_prompt(), Self::generate_user_prompt(input))
            .await?;
        info!(
            valid = output.is_valid_schedule,
            cron = %output.cron_expression,
            "CRON generation complete"
        );
        Ok(output)
    }

    async fn describe_cron(
        &self,
        input: &DescribeCronInput,
    ) -> Result<DescribeCronOutput, DomainError> {
        info!(cron = %input.cron_expression, "sending CRON expression to AI for description");
        let output: DescribeCronOutput = self
            .complete_json(Self::describe_system_prompt(), Self::describe_user_prompt(input))
            .await?;
        info!(
            valid = output.is_valid_cron,
            description_len = output.description.len(),
            "CRON description complete"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn adapter(url: String) -> OpenAiAdapter {
        OpenAiAdapter::new(
            url,
            "sk-test".into(),
            "gpt-4o-mini".into(),
            Duration::from_secs(5),
        )
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
    }

    #[test]
    fn test_sanitize_json_clean() {
        let input = r#"{"isValidCron": true}"#;
        assert_eq!(OpenAiAdapter::sanitize_json(input), input);
    }

    #[test]
    fn test_sanitize_json_markdown() {
        let input = r#"```json
{"isValidCron": true}
```"#;
        assert_eq!(
            OpenAiAdapter::sanitize_json(input),
            r#"{"isValidCron": true}"#
        );
    }

    #[test]
    fn test_sanitize_json_markdown_no_lang() {
        let input = r#"```
{"isValidCron": true}
```"#;
        assert_eq!(
            OpenAiAdapter::sanitize_json(input),
            r#"{"isValidCron": true}"#
        );
    }

    #[test]
    fn test_sanitize_json_with_text() {
        let input = r#"Here you go:
{"cronExpression": "0 0 * * *", "isValidSchedule": true}"#;
        assert_eq!(
            OpenAiAdapter::sanitize_json(input),
            r#"{"cronExpression": "0 0 * * *", "isValidSchedule": true}"#
        );
    }

    #[tokio::test]
    async fn test_generate_parses_schema() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("authorization", "Bearer sk-test")
                    .body_contains("json_object")
                    .body_contains("every day at midnight");
                then.status(200).json_body(completion(
                    r#"{"cronExpression":"0 0 * * *","isValidSchedule":true}"#,
                ));
            })
            .await;

        let out = adapter(server.url("/v1/chat/completions"))
            .generate_cron(&GenerateCronInput {
                description: "every day at midnight".into(),
            })
            .await
            .unwrap();
        mock.assert_async().await;
        assert!(out.is_valid_schedule);
        assert_eq!(out.cron_expression, "0 0 * * *");
    }

    #[tokio::test]
    async fn test_describe_parses_fenced_schema() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(completion(
                    "```json\n{\"description\":\"At 08:00 on Monday.\",\"isValidCron\":true}\n```",
                ));
            })
            .await;

        let out = adapter(server.url("/v1/chat/completions"))
            .describe_cron(&DescribeCronInput {
                cron_expression: "0 8 * * 1".into(),
            })
            .await
            .unwrap();
        assert!(out.is_valid_cron);
        assert_eq!(out.description, "At 08:00 on Monday.");
    }

    #[tokio::test]
    async fn test_schema_violation_is_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200)
                    .json_body(completion(r#"{"cron": "0 0 * * *"}"#));
            })
            .await;

        let err = adapter(server.url("/v1/chat/completions"))
            .generate_cron(&GenerateCronInput {
                description: "daily".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Ai(m) if m.contains("Failed to parse LLM JSON")));
    }

    #[tokio::test]
    async fn test_quota_status_keeps_body_text() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(429).json_body(serde_json::json!({
                    "error": {
                        "message": "You exceeded your current quota",
                        "code": "insufficient_quota"
                    }
                }));
            })
            .await;

        let err = adapter(server.url("/v1/chat/completions"))
            .generate_cron(&GenerateCronInput {
                description: "daily".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Ai(m) if m.contains("429") && m.contains("quota")));
    }

    #[tokio::test]
    async fn test_timeout_maps_to_deadline_exceeded() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/slow");
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .json_body(completion(r#"{"description":"x","isValidCron":true}"#));
            })
            .await;

        let slow = OpenAiAdapter::new(
            server.url("/slow"),
            String::new(),
            "llama3.2".into(),
            Duration::from_millis(50),
        );
        let err = slow
            .describe_cron(&DescribeCronInput {
                cron_expression: "* * * * *".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Ai(m) if m.starts_with("Deadline exceeded")));
    }
}
