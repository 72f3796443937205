//! HTTP client for the generation endpoint.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::models::Question;
use crate::protocol::{ErrorResponse, GENERATE_TRIVIA_PATH, GenerateTriviaRequest};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Non-2xx response, with the server's message when it sent one.
    #[error("{0}")]
    Server(String),
    #[error("Invalid trivia data received")]
    InvalidData,
    #[error("could not reach the trivia server: {0}")]
    Transport(#[from] reqwest::Error),
}

pub struct TriviaClient {
    http: Client,
    endpoint: String,
}

impl TriviaClient {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), GENERATE_TRIVIA_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch_round(
        &self,
        request: &GenerateTriviaRequest,
    ) -> Result<Vec<Question>, FetchError> {
        let response = self.http.post(&self.endpoint).json(request).send().await?;
        let success = response.status().is_success();
        let body = response.text().await?;

        interpret_response(success, &body)
    }
}

fn interpret_response(success: bool, body: &str) -> Result<Vec<Question>, FetchError> {
    if !success {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .map(|e| e.error)
            .unwrap_or_else(|_| "Failed to fetch trivia questions".to_string());
        return Err(FetchError::Server(message));
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value @ Value::Array(_)) => {
            serde_json::from_value(value).map_err(|_| FetchError::InvalidData)
        }
        _ => Err(FetchError::InvalidData),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base() {
        let client = TriviaClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:5000/api/generateTrivia");
    }

    #[test]
    fn test_error_body_message_is_surfaced() {
        let err = interpret_response(false, r#"{"error":"Keywords are required."}"#).unwrap_err();
        assert_eq!(err.to_string(), "Keywords are required.");

        let err = interpret_response(false, "<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch trivia questions");
    }

    #[test]
    fn test_non_array_is_invalid() {
        assert!(matches!(
            interpret_response(true, r#"{"questions":[]}"#),
            Err(FetchError::InvalidData)
        ));
        assert!(matches!(
            interpret_response(true, r#"[{"id": 1}]"#),
            Err(FetchError::InvalidData)
        ));
    }

    #[test]
    fn test_valid_round() {
        let body = r#"[{"id":"1","category":"Space","difficulty":"Hard",
            "question":"Q?","answer":"A","options":["A","B"]}]"#;
        let questions = interpret_response(true, body).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].answer, "A");
    }
}
