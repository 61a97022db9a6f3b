//! OpenAI-compatible chat completions provider.
//!
//! Works with:
//! - `OpenAI` API
//! - LM Studio, vLLM, Ollama (with `OpenAI` compatibility)
//! - Any `OpenAI`-compatible endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{LlmError, LlmResult};
use crate::provider::{LlmProvider, ProviderConfig};
use crate::types::{
    LlmResponse, LlmToolDefinition, Message, MessageContent, MessageRole, StopReason, ToolCall,
    Usage,
};

const PROVIDER_NAME: &str = "openai-compat";

/// OpenAI-compatible LLM provider.
pub struct OpenAiCompatProvider {
    client: Client,
    model: String,
    max_tokens: usize,
    temperature: f64,
    endpoint: String,
    api_key: Option<String>,
}

impl OpenAiCompatProvider {
    /// Create a provider from a [`ProviderConfig`].
    ///
    /// An empty API key is treated as absent.
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        let api_key = Some(config.api_key).filter(|k| !k.is_empty());
        Self {
            client: Client::new(),
            model: config.model,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            endpoint: completions_endpoint(&config.base_url),
            api_key,
        }
    }

    /// Create a provider for the `OpenAI` API.
    #[must_use]
    pub fn openai(api_key: &str, model: &str) -> Self {
        Self::new(ProviderConfig::new(api_key, model))
    }

    /// Create a custom provider against any base URL.
    #[must_use]
    pub fn custom(base_url: &str, api_key: Option<&str>, model: &str) -> Self {
        Self::new(ProviderConfig::new(api_key.unwrap_or_default(), model).base_url(base_url))
    }

    /// The full chat completions URL requests go to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the request body.
    fn build_request(
        &self,
        messages: &[Message],
        tools: &[LlmToolDefinition],
        system: &str,
    ) -> Value {
        let mut openai_messages = Vec::new();

        if !system.is_empty() {
            openai_messages.push(serde_json::json!({
                "role": "system",
                "content": system
            }));
        }

        for msg in messages {
            openai_messages.push(convert_message(msg));
        }

        let mut request = serde_json::json!({
            "model": self.model,
            "messages": openai_messages,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "stream": false
        });

        if !tools.is_empty() {
            let openai_tools: Vec<Value> = tools
                .iter()
                .map(|t| {
                    // Strict endpoints reject a schema without `properties`.
                    let mut parameters = t.input_schema.clone();
                    if let Some(obj) = parameters.as_object_mut() {
                        obj.entry("properties")
                            .or_insert_with(|| serde_json::json!({}));
                    }
                    serde_json::json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": parameters
                        }
                    })
                })
                .collect();
            request["tools"] = Value::Array(openai_tools);
        }

        request
    }
}

fn completions_endpoint(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/chat/completions")
    }
}

fn convert_message(msg: &Message) -> Value {
    let role = match msg.role {
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
        MessageRole::System => "system",
        MessageRole::Tool => "tool",
    };

    match &msg.content {
        MessageContent::Text(text) => {
            serde_json::json!({
                "role": role,
                "content": text
            })
        },
        MessageContent::ToolCalls(tool_calls) => {
            let openai_tool_calls: Vec<Value> = tool_calls
                .iter()
                .map(|tc| {
                    serde_json::json!({
                        "id": tc.id,
                        "type": "function",
                        "function": {
                            "name": tc.name,
                            "arguments": tc.arguments.to_string()
                        }
                    })
                })
                .collect();

            serde_json::json!({
                "role": "assistant",
                "content": Value::Null,
                "tool_calls": openai_tool_calls
            })
        },
        MessageContent::ToolResult(result) => {
            serde_json::json!({
                "role": "tool",
                "tool_call_id": result.call_id,
                "content": result.content
            })
        },
    }
}

/// Convert a decoded chat completions body into an [`LlmResponse`].
fn parse_response(response: OpenAiResponse) -> LlmResult<LlmResponse> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::MalformedResponse("no choices in response".to_string()))?;

    let (content, has_tool_calls) = match choice.message.tool_calls {
        Some(tool_calls) if !tool_calls.is_empty() => {
            let mut calls = Vec::with_capacity(tool_calls.len());
            for tc in tool_calls {
                let arguments: Value = serde_json::from_str(&tc.function.arguments)
                    .map_err(|e| {
                        LlmError::MalformedResponse(format!("invalid tool arguments JSON: {e}"))
                    })?;
                calls.push(ToolCall {
                    id: tc.id,
                    name: tc.function.name,
                    arguments,
                });
            }
            (MessageContent::ToolCalls(calls), true)
        },
        _ => (
            MessageContent::Text(choice.message.content.unwrap_or_default()),
            false,
        ),
    };

    let stop_reason = match choice.finish_reason.as_deref() {
        Some("length") => StopReason::MaxTokens,
        Some("tool_calls") => StopReason::ToolUse,
        Some("content_filter") => StopReason::StopSequence,
        _ => StopReason::EndTurn,
    };

    let usage = response.usage.unwrap_or_default();
    Ok(LlmResponse {
        message: Message {
            role: MessageRole::Assistant,
            content,
        },
        has_tool_calls,
        stop_reason,
        usage: Usage {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        },
    })
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: &[LlmToolDefinition],
        system: &str,
    ) -> LlmResult<LlmResponse> {
        // Remote endpoints require an API key; local ones typically do not.
        if self.api_key.is_none() && !is_local_url(&self.endpoint) {
            return Err(LlmError::MissingApiKey {
                endpoint: self.endpoint.clone(),
            });
        }

        let request_body = self.build_request(messages, tools, system);

        debug!(
            model = %self.model,
            endpoint = %self.endpoint,
            messages = messages.len(),
            tools = tools.len(),
            "Making chat completion request"
        );

        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json");

        if let Some(ref api_key) = self.api_key {
            let mut auth_value = reqwest::header::HeaderValue::try_from(format!(
                "Bearer {api_key}"
            ))
            .map_err(|e| LlmError::InvalidApiKey(e.to_string()))?;
            auth_value.set_sensitive(true);
            request = request.header("Authorization", auth_value);
        }

        let response = request
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Chat completion API error");
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response: OpenAiResponse = response.json().await?;
        parse_response(response)
    }
}

impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatProvider")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("has_api_key", &self.api_key.is_some())
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAiToolCall {
    id: String,
    function: OpenAiFunctionCall,
}

#[derive(Debug, Deserialize)]
struct OpenAiFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

/// Check whether a URL points to a local endpoint (localhost, 127.0.0.1, etc.)
/// where an API key is typically not required.
fn is_local_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.contains("localhost") || lower.contains("127.0.0.1") || lower.contains("[::1]")
}
