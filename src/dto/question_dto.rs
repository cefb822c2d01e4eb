use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::question::{CorrectAnswer, QuestionType};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuestionPayload {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[validate(length(min = 1, max = 500, message = "Question text must be 1-500 characters"))]
    pub text: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub correct_answer: Option<CorrectAnswer>,
    #[validate(range(min = 1, max = 100, message = "Points must be between 1 and 100"))]
    pub points: u32,
    #[validate(range(
        min = 10,
        max = 600,
        message = "Time limit must be between 10 and 600 seconds"
    ))]
    pub time_limit_seconds: u32,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveQuestionPayload {
    pub to: u32,
}

// Trims strings and turns empty ones into None
fn trim_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
