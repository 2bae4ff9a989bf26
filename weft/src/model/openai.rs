//! OpenAI-compatible chat completions client (feature `openai`).
//!
//! Speaks the `/chat/completions` wire format directly over `reqwest` with
//! raw JSON payloads, so the full message union round-trips: assistant tool
//! calls go out as `tool_calls`, tool results as `role: "tool"` with
//! `tool_call_id`, and `extract` uses `response_format: json_schema`.
//! Works against any endpoint implementing the API (OpenAI, Ollama, vLLM).

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

use super::{ChatModel, ChatResponse, ModelError};
use crate::message::{Message, ToolCall};
use crate::tool::ToolSpec;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible `ChatModel`.
pub struct ChatOpenAI {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
}

impl ChatOpenAI {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(600))
            .build()
            .map_err(|e| ModelError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: None,
        })
    }

    /// Reads `OPENAI_API_KEY`, and optionally `OPENAI_API_BASE` /
    /// `OPENAI_MODEL`, from the environment.
    pub fn from_env() -> Result<Self, ModelError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ModelError::Unavailable("OPENAI_API_KEY is not set".into()))?;
        let mut client = Self::new(
            api_key,
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        )?;
        if let Ok(base) = std::env::var("OPENAI_API_BASE") {
            client.base_url = base;
        }
        Ok(client)
    }

    /// Custom base URL (e.g. a local Ollama or vLLM endpoint).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sampling temperature; lower is more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn messages_to_payload(messages: &[Message]) -> Vec<Value> {
        messages
            .iter()
            .map(|m| match m {
                Message::System { content } => json!({"role": "system", "content": content}),
                Message::User { content } => json!({"role": "user", "content": content}),
                Message::Assistant {
                    content,
                    tool_calls,
                } => {
                    let mut msg = json!({"role": "assistant", "content": content});
                    if !tool_calls.is_empty() {
                        msg["tool_calls"] = Value::Array(
                            tool_calls
                                .iter()
                                .map(|tc| {
                                    json!({
                                        "id": tc.id,
                                        "type": "function",
                                        "function": {
                                            "name": tc.name,
                                            "arguments": tc.arguments.to_string(),
                                        }
                                    })
                                })
                                .collect(),
                        );
                    }
                    msg
                }
                Message::Tool {
                    content,
                    tool_call_id,
                } => json!({
                    "role": "tool",
                    "content": content,
                    "tool_call_id": tool_call_id,
                }),
            })
            .collect()
    }

    fn tools_to_payload(tools: &[ToolSpec]) -> Vec<Value> {
        tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.input_schema,
                    }
                })
            })
            .collect()
    }

    async fn post(&self, payload: Value) -> Result<Value, ModelError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| ModelError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json()
                .await
                .map_err(|e| ModelError::InvalidResponse(e.to_string())),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ModelError::Unavailable(format!(
                    "request failed with {status}: {body}"
                )))
            }
        }
    }

    fn first_message(data: &Value) -> Result<&Value, ModelError> {
        data.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .ok_or_else(|| ModelError::InvalidResponse("response has no choices".into()))
    }
}

#[async_trait]
impl ChatModel for ChatOpenAI {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<ChatResponse, ModelError> {
        let mut payload = json!({
            "model": self.model,
            "messages": Self::messages_to_payload(messages),
        });
        if !tools.is_empty() {
            payload["tools"] = Value::Array(Self::tools_to_payload(tools));
        }
        if let Some(t) = self.temperature {
            payload["temperature"] = json!(t);
        }

        let data = self.post(payload).await?;
        let message = Self::first_message(&data)?;

        let content = message
            .get("content")
            .and_then(|c| c.as_str())
            .unwrap_or_default()
            .to_string();
        let tool_calls = message
            .get("tool_calls")
            .and_then(|tc| tc.as_array())
            .map(|calls| {
                calls
                    .iter()
                    .filter_map(|call| {
                        let id = call.get("id")?.as_str()?;
                        let function = call.get("function")?;
                        let name = function.get("name")?.as_str()?;
                        let arguments = match function.get("arguments") {
                            // The API carries arguments as a JSON string.
                            Some(Value::String(s)) => {
                                serde_json::from_str(s).unwrap_or(json!({}))
                            }
                            Some(other) => other.clone(),
                            None => json!({}),
                        };
                        Some(ToolCall::new(id, name, arguments))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(ChatResponse {
            content,
            tool_calls,
        })
    }

    async fn extract(&self, messages: &[Message], schema: &Value) -> Result<Value, ModelError> {
        let mut payload = json!({
            "model": self.model,
            "messages": Self::messages_to_payload(messages),
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "extraction",
                    "schema": schema,
                    "strict": true,
                }
            }
        });
        if let Some(t) = self.temperature {
            payload["temperature"] = json!(t);
        }

        let data = self.post(payload).await?;
        let message = Self::first_message(&data)?;
        let content = message
            .get("content")
            .and_then(|c| c.as_str())
            .ok_or_else(|| ModelError::InvalidResponse("structured response has no content".into()))?;
        serde_json::from_str(content).map_err(|e| ModelError::InvalidResponse(e.to_string()))
    }
}
