//! Payloads exchanged between the trivia client and the generation backend.
//!
//! All messages are JSON over plain HTTP.

use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /api/generateTrivia`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTriviaRequest {
    /// Comma-separated topic keywords. Optional on the wire so a missing field
    /// is reported as a validation error instead of a parse error.
    #[serde(default)]
    pub keywords: Option<String>,

    /// Correct answers in the previous round, `null` before the first one.
    /// Any JSON number is accepted; negatives count as zero.
    #[serde(default, deserialize_with = "deserialize_score")]
    pub last_round_score: Option<u32>,
}

fn deserialize_score<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map(|score| score.max(0.0).floor() as u32))
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Path of the generation endpoint.
pub const GENERATE_TRIVIA_PATH: &str = "/api/generateTrivia";

/// Default backend port.
pub const DEFAULT_PORT: u16 = 5000;

/// Topic keyword limits enforced by the client menu.
pub const MIN_TOPIC_KEYWORDS: usize = 1;
pub const MAX_TOPIC_KEYWORDS: usize = 3;

/// Split a comma-separated keyword string, trimming and dropping empties.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validates the topic typed in the client menu.
///
/// Returns the keywords joined with `", "`, or the message to show the player.
pub fn validate_topic(raw: &str) -> Result<String, &'static str> {
    let keywords = parse_keywords(raw);

    if keywords.len() < MIN_TOPIC_KEYWORDS {
        return Err("Enter at least one keyword in the Trivia Menu.");
    }

    if keywords.len() > MAX_TOPIC_KEYWORDS {
        return Err("Please limit yourself to 3 keywords.");
    }

    Ok(keywords.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_keywords(" space, ,cats ,"), vec!["space", "cats"]);
        assert!(parse_keywords(" , ,").is_empty());
        assert!(parse_keywords("").is_empty());
    }

    #[test]
    fn test_validate_topic() {
        assert_eq!(validate_topic("volcanoes,jazz").unwrap(), "volcanoes, jazz");
        assert_eq!(validate_topic("a, b, c").unwrap(), "a, b, c");
        assert!(validate_topic("  ").is_err());
        assert_eq!(
            validate_topic("a,b,c,d").unwrap_err(),
            "Please limit yourself to 3 keywords."
        );
    }

    #[test]
    fn test_request_serialization() {
        let req = GenerateTriviaRequest {
            keywords: Some("space".to_string()),
            last_round_score: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"lastRoundScore\":null"));

        let parsed: GenerateTriviaRequest = serde_json::from_str("{}").unwrap();
        assert!(parsed.keywords.is_none());
        assert!(parsed.last_round_score.is_none());

        let parsed: GenerateTriviaRequest =
            serde_json::from_str(r#"{"keywords":"cats","lastRoundScore":3}"#).unwrap();
        assert_eq!(parsed.last_round_score, Some(3));
    }

    #[test]
    fn test_negative_score_counts_as_zero() {
        let parsed: GenerateTriviaRequest =
            serde_json::from_str(r#"{"keywords":"cats","lastRoundScore":-2}"#).unwrap();
        assert_eq!(parsed.last_round_score, Some(0));

        let parsed: GenerateTriviaRequest =
            serde_json::from_str(r#"{"keywords":"cats","lastRoundScore":null}"#).unwrap();
        assert!(parsed.last_round_score.is_none());

        assert!(serde_json::from_str::<GenerateTriviaRequest>(r#"{"lastRoundScore":"lots"}"#).is_err());
    }
}
