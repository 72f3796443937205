//! Prompt and response schema sent to the generator.

use serde_json::{Value, json};

use crate::models::{Difficulty, QUESTIONS_PER_ROUND, difficulty_instruction};

pub fn build_prompt(keywords: &[String], last_round_score: Option<u32>) -> String {
    format!(
        "You are a Trivia Question Generator.\n\
         1. You MUST generate exactly {QUESTIONS_PER_ROUND} questions based on the following keywords: {}.\n\
         2. Every question MUST offer 4 options, and its answer MUST be copied verbatim from those options.\n\
         3. Your output MUST strictly adhere to the provided JSON Schema.\n\
         4. Adapt the question difficulty based on this feedback: {}",
        keywords.join(", "),
        difficulty_instruction(last_round_score),
    )
}

pub fn trivia_schema() -> Value {
    let difficulties: Vec<&str> = Difficulty::ALL.iter().map(|d| d.label()).collect();

    json!({
        "type": "array",
        "description": format!(
            "An array containing exactly {QUESTIONS_PER_ROUND} trivia question objects."
        ),
        "items": {
            "type": "object",
            "properties": {
                "id": { "type": "string" },
                "category": { "type": "string" },
                "difficulty": { "type": "string", "enum": difficulties },
                "question": { "type": "string" },
                "answer": { "type": "string" },
                "options": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["id", "category", "difficulty", "question", "answer", "options"]
        }
    })
}
