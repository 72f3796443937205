//! Generative model client.
//!
//! [`TriviaModel`] is the seam between the endpoint and the network; the
//! production implementation talks to the Gemini `generateContent` REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::config::ServerConfig;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The model API answered with a non-success status.
    #[error("model API returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("request to model API failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model returned no text")]
    EmptyResponse,
}

impl ModelError {
    /// Permission and not-found errors mean the model id itself is unusable,
    /// which is the only case worth retrying with another model.
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, ModelError::Upstream { status: 403 | 404, .. })
    }
}

#[async_trait]
pub trait TriviaModel: Send + Sync {
    /// Send `prompt` to `model` and return the raw text of its answer.
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        schema: &Value,
    ) -> Result<String, ModelError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Concatenated text parts of the first candidate.
fn first_candidate_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();

    if text.trim().is_empty() { None } else { Some(text) }
}

/// Pulls `error.message` out of a Gemini error body, or returns the body.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

pub struct GeminiClient {
    http: Client,
    api_base: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &ServerConfig) -> Result<Self, ModelError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base, model)
    }
}

#[async_trait]
impl TriviaModel for GeminiClient {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        schema: &Value,
    ) -> Result<String, ModelError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ModelError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&text),
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        first_candidate_text(parsed).ok_or(ModelError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_candidate_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"[{\"a\":"},{"text":"1}]"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(first_candidate_text(response).as_deref(), Some("[{\"a\":1}]"));
    }

    #[test]
    fn test_first_candidate_text_missing() {
        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(first_candidate_text(empty).is_none());

        let blocked: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(first_candidate_text(blocked).is_none());
    }

    #[test]
    fn test_upstream_message() {
        let body = r#"{"error":{"code":404,"message":"models/foo is not found","status":"NOT_FOUND"}}"#;
        assert_eq!(upstream_message(body), "models/foo is not found");
        assert_eq!(upstream_message(" plain failure "), "plain failure");
    }

    #[test]
    fn test_unavailable_classification() {
        let not_found = ModelError::Upstream {
            status: 404,
            message: String::new(),
        };
        let forbidden = ModelError::Upstream {
            status: 403,
            message: String::new(),
        };
        let overloaded = ModelError::Upstream {
            status: 503,
            message: String::new(),
        };
        assert!(not_found.is_model_unavailable());
        assert!(forbidden.is_model_unavailable());
        assert!(!overloaded.is_model_unavailable());
        assert!(!ModelError::EmptyResponse.is_model_unavailable());
    }

    #[test]
    fn test_request_body_shape() {
        let schema = serde_json::json!({"type": "array"});
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &schema,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["generationConfig"]["responseSchema"]["type"], "array");
    }
}
