//! Chat completion client for the AI assistant
//!
//! Speaks two wire shapes: the OpenAI-compatible chat/completions API
//! (OpenAI, Together, Groq) and the Hugging Face text-generation
//! inference API. The Hugging Face path attempts exactly one fallback
//! call to a simpler secondary model before giving up.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{AiProvider, ResolvedAiProvider};
use crate::error::{AppError, AppResult};

/// Fixed sampling parameters, shared by both wire shapes
const MAX_TOKENS: u32 = 300;
const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.9;
const FREQUENCY_PENALTY: f32 = 0.1;
const PRESENCE_PENALTY: f32 = 0.1;
const REPETITION_PENALTY: f32 = 1.1;

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// One turn of a chat conversation
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// The text produced by a completion call, tagged with whether the
/// secondary fallback model produced it
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub used_fallback_model: bool,
}

/// OpenAI-compatible request body
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

/// Hugging Face inference request body
#[derive(Debug, Serialize)]
struct TextGenerationRequest<'a> {
    inputs: &'a str,
    parameters: TextGenerationParameters,
}

#[derive(Debug, Serialize)]
struct TextGenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
    repetition_penalty: f32,
    return_full_text: bool,
    do_sample: bool,
}

impl Default for TextGenerationParameters {
    fn default() -> Self {
        Self {
            max_new_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            repetition_penalty: REPETITION_PENALTY,
            return_full_text: false,
            do_sample: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TextGenerationResponse {
    generated_text: Option<String>,
}

/// Client for a hosted chat-completion endpoint
#[derive(Clone)]
pub struct ChatCompletionClient {
    provider: ResolvedAiProvider,
    api_key: String,
    http_client: Client,
}

impl ChatCompletionClient {
    /// Create a new client for the resolved provider
    pub fn new(provider: ResolvedAiProvider, api_key: String) -> Self {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            provider,
            api_key,
            http_client,
        }
    }

    /// Generate a completion for the conversation. The Hugging Face path
    /// retries once against the secondary model; every other provider
    /// fails on the first error.
    pub async fn complete(&self, messages: &[ChatTurn]) -> AppResult<Completion> {
        match self.provider.provider {
            AiProvider::HuggingFace => {
                match self.text_generation(&self.provider.model, messages).await {
                    Ok(text) => Ok(Completion {
                        text,
                        used_fallback_model: false,
                    }),
                    Err(err) => {
                        let fallback = self
                            .provider
                            .provider
                            .fallback_model_name()
                            .ok_or_else(|| AppError::AiApi("No fallback model".to_string()))?;
                        tracing::warn!(
                            "Primary model failed ({}), trying fallback model {}",
                            err,
                            fallback
                        );
                        let text = self.text_generation(fallback, messages).await?;
                        Ok(Completion {
                            text,
                            used_fallback_model: true,
                        })
                    }
                }
            }
            _ => {
                let text = self.chat_completion(messages).await?;
                Ok(Completion {
                    text,
                    used_fallback_model: false,
                })
            }
        }
    }

    /// OpenAI-compatible chat/completions call
    async fn chat_completion(&self, messages: &[ChatTurn]) -> AppResult<String> {
        let url = format!("{}/chat/completions", self.provider.base_url);
        let request = ChatCompletionRequest {
            model: &self.provider.model,
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            frequency_penalty: FREQUENCY_PENALTY,
            presence_penalty: PRESENCE_PENALTY,
        };

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::AiApi(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AiApi(format!("API returned {}: {}", status, body)));
        }

        let data: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::AiApi(format!("Failed to parse response: {}", e)))?;

        let text = data
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AppError::AiApi("Empty response from AI model".to_string()));
        }

        Ok(text.to_string())
    }

    /// Hugging Face text-generation inference call
    async fn text_generation(&self, model: &str, messages: &[ChatTurn]) -> AppResult<String> {
        // The inference API takes a single prompt string
        let inputs = messages
            .iter()
            .map(|turn| turn.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let url = format!("{}/{}", self.provider.base_url, model);
        let request = TextGenerationRequest {
            inputs: &inputs,
            parameters: TextGenerationParameters::default(),
        };

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::AiApi(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AiApi(format!("API returned {}: {}", status, body)));
        }

        let data: Vec<TextGenerationResponse> = response
            .json()
            .await
            .map_err(|e| AppError::AiApi(format!("Failed to parse response: {}", e)))?;

        let text = data
            .first()
            .and_then(|generation| generation.generated_text.as_deref())
            .map(str::trim)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AppError::AiApi("Empty response from AI model".to_string()));
        }

        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_completion_request_body() {
        let messages = vec![ChatTurn::system("You help farmers."), ChatTurn::user("Hi")];
        let request = ChatCompletionRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            frequency_penalty: FREQUENCY_PENALTY,
            presence_penalty: PRESENCE_PENALTY,
        };

        let body: serde_json::Value = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["max_tokens"], 300);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Hi");
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert!((body["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_text_generation_request_body() {
        let request = TextGenerationRequest {
            inputs: "prompt text",
            parameters: TextGenerationParameters::default(),
        };

        let body: serde_json::Value = serde_json::to_value(&request).unwrap();
        assert_eq!(body["inputs"], "prompt text");
        assert_eq!(body["parameters"]["max_new_tokens"], 300);
        assert_eq!(body["parameters"]["return_full_text"], false);
        assert_eq!(body["parameters"]["do_sample"], true);
        assert!((body["parameters"]["repetition_penalty"].as_f64().unwrap() - 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_parse_chat_completion_response() {
        let json = r#"{"choices": [{"message": {"content": "  Plant in spring.  "}}]}"#;
        let data: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            data.choices[0].message.content.as_deref(),
            Some("  Plant in spring.  ")
        );
    }

    #[test]
    fn test_parse_text_generation_response() {
        let json = r#"[{"generated_text": "Plant in spring."}]"#;
        let data: Vec<TextGenerationResponse> = serde_json::from_str(json).unwrap();
        assert_eq!(data[0].generated_text.as_deref(), Some("Plant in spring."));
    }
}
