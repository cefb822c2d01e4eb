use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub const MIN_CHOICE_OPTIONS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    FillBlank,
}

/// Answer key: an option index or literal text. Indices sent as integral
/// floats (`1.0`) are accepted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Index(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for CorrectAnswer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Index(i64),
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Index(i) => Ok(CorrectAnswer::Index(i)),
            Raw::Number(n) if n.is_finite() && n.fract() == 0.0 => Ok(CorrectAnswer::Index(n as i64)),
            Raw::Number(n) => Err(de::Error::custom(format!(
                "correct answer index must be a whole number, got {}",
                n
            ))),
            Raw::Text(text) => Ok(CorrectAnswer::Text(text)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionBankEntry {
    pub id: Uuid,
    pub question_number: u32,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<CorrectAnswer>,
    pub points: u32,
    pub time_limit_seconds: u32,
    pub explanation: Option<String>,
}
