//! Call, parse, validate and (once) retry.

use serde_json::Value;

use crate::models::{QUESTIONS_PER_ROUND, Question};

use super::config::ModelIds;
use super::llm::{ModelError, TriviaModel};
use super::prompt::trivia_schema;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Primary model was rejected (403/404) and the fallback failed too.
    #[error("model {primary} is unavailable and fallback {fallback} failed: {source}")]
    ModelUnavailable {
        primary: String,
        fallback: String,
        #[source]
        source: ModelError,
    },
    #[error(transparent)]
    Model(ModelError),
    #[error("model output is not valid trivia JSON: {0}")]
    MalformedOutput(String),
    #[error("model returned {actual} questions, expected {expected}")]
    WrongCount { expected: usize, actual: usize },
}

/// Ask the primary model for a round, retrying once on the fallback model
/// when the primary id is forbidden or unknown.
pub async fn generate_round<M>(
    model: &M,
    ids: &ModelIds,
    prompt: &str,
) -> Result<Vec<Question>, GenerateError>
where
    M: TriviaModel + ?Sized,
{
    let schema = trivia_schema();

    let text = match model.generate(&ids.primary, prompt, &schema).await {
        Ok(text) => text,
        Err(err) if err.is_model_unavailable() => {
            tracing::warn!(
                primary = %ids.primary,
                fallback = %ids.fallback,
                error = %err,
                "primary model unavailable, retrying with fallback"
            );
            model
                .generate(&ids.fallback, prompt, &schema)
                .await
                .map_err(|source| GenerateError::ModelUnavailable {
                    primary: ids.primary.clone(),
                    fallback: ids.fallback.clone(),
                    source,
                })?
        }
        Err(err) => return Err(GenerateError::Model(err)),
    };

    let questions = parse_round(&text)?;

    for question in questions.iter().filter(|q| !q.answer_in_options()) {
        tracing::warn!(id = %question.id, "generated answer is not among the options");
    }

    Ok(questions)
}

/// Parse model text into exactly one round of questions.
pub fn parse_round(text: &str) -> Result<Vec<Question>, GenerateError> {
    let value: Value = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| GenerateError::MalformedOutput(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(GenerateError::MalformedOutput(
            "expected a JSON array".to_string(),
        ));
    };

    if items.len() != QUESTIONS_PER_ROUND {
        return Err(GenerateError::WrongCount {
            expected: QUESTIONS_PER_ROUND,
            actual: items.len(),
        });
    }

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value::<Question>(item)
                .map_err(|e| GenerateError::MalformedOutput(e.to_string()))
        })
        .collect()
}

/// Models sometimes wrap JSON in a Markdown fence despite the mime type.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = rest.strip_prefix("json").unwrap_or(rest);
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Scripted model: pops one canned reply per call and records model ids.
    pub(crate) struct ScriptedModel {
        replies: Mutex<VecDeque<Result<String, ModelError>>>,
        pub calls: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub(crate) fn new(replies: Vec<Result<String, ModelError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TriviaModel for ScriptedModel {
        async fn generate(
            &self,
            model: &str,
            _prompt: &str,
            _schema: &Value,
        ) -> Result<String, ModelError> {
            self.calls.lock().unwrap().push(model.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ModelError::EmptyResponse))
        }
    }

    pub(crate) fn upstream(status: u16) -> ModelError {
        ModelError::Upstream {
            status,
            message: format!("status {status}"),
        }
    }

    pub(crate) fn round_json(count: usize) -> String {
        let items: Vec<Value> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "id": format!("q{i}"),
                    "category": "Space",
                    "difficulty": "Easy",
                    "question": format!("Question {i}?"),
                    "answer": "A",
                    "options": ["A", "B", "C", "D"]
                })
            })
            .collect();
        Value::Array(items).to_string()
    }

    #[test]
    fn test_parse_round_accepts_five() {
        let questions = parse_round(&round_json(5)).unwrap();
        assert_eq!(questions.len(), 5);
        assert_eq!(questions[4].id, "q4");
    }

    #[test]
    fn test_parse_round_rejects_wrong_count() {
        assert!(matches!(
            parse_round(&round_json(4)),
            Err(GenerateError::WrongCount { expected: 5, actual: 4 })
        ));
        assert!(matches!(
            parse_round(&round_json(10)),
            Err(GenerateError::WrongCount { actual: 10, .. })
        ));
    }

    #[test]
    fn test_parse_round_rejects_non_array() {
        assert!(matches!(
            parse_round(r#"{"questions": []}"#),
            Err(GenerateError::MalformedOutput(_))
        ));
        assert!(matches!(
            parse_round("not json"),
            Err(GenerateError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_parse_round_rejects_bad_items() {
        let mut items: Vec<Value> = serde_json::from_str(&round_json(5)).unwrap();
        items[2]["difficulty"] = Value::String("Impossible".to_string());
        let text = Value::Array(items).to_string();
        assert!(matches!(
            parse_round(&text),
            Err(GenerateError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```\n[2]```"), "[2]");
        assert_eq!(strip_code_fence("  [3] "), "[3]");
    }

    #[tokio::test]
    async fn test_primary_success_uses_one_call() {
        let model = ScriptedModel::new(vec![Ok(round_json(5))]);
        let ids = ModelIds::default();

        let questions = generate_round(&model, &ids, "prompt").await.unwrap();
        assert_eq!(questions.len(), 5);
        assert_eq!(model.calls(), vec![ids.primary.clone()]);
    }

    #[tokio::test]
    async fn test_not_found_retries_fallback_once() {
        let model = ScriptedModel::new(vec![Err(upstream(404)), Ok(round_json(5))]);
        let ids = ModelIds::default();

        let questions = generate_round(&model, &ids, "prompt").await.unwrap();
        assert_eq!(questions.len(), 5);
        assert_eq!(model.calls(), vec![ids.primary.clone(), ids.fallback.clone()]);
    }

    #[tokio::test]
    async fn test_fallback_failure_stops_after_one_retry() {
        let model = ScriptedModel::new(vec![
            Err(upstream(404)),
            Err(upstream(404)),
            Ok(round_json(5)),
        ]);
        let ids = ModelIds::default();

        let err = generate_round(&model, &ids, "prompt").await.unwrap_err();
        assert!(matches!(err, GenerateError::ModelUnavailable { .. }));
        assert_eq!(model.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_forbidden_also_retries() {
        let model = ScriptedModel::new(vec![Err(upstream(403)), Ok(round_json(5))]);
        let ids = ModelIds::default();

        assert!(generate_round(&model, &ids, "prompt").await.is_ok());
        assert_eq!(model.calls()[1], ids.fallback);
    }

    #[tokio::test]
    async fn test_other_upstream_errors_do_not_retry() {
        let model = ScriptedModel::new(vec![Err(upstream(500)), Ok(round_json(5))]);
        let ids = ModelIds::default();

        let err = generate_round(&model, &ids, "prompt").await.unwrap_err();
        assert!(matches!(err, GenerateError::Model(_)));
        assert_eq!(model.calls().len(), 1);
    }
}
