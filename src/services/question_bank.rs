use uuid::Uuid;
use validator::ValidationErrors;

use crate::config::DEFAULT_MAX_QUESTIONS_PER_DRAFT;
use crate::dto::question_dto::QuestionPayload;
use crate::error::{Error, Result};
use crate::models::question::{CorrectAnswer, QuestionBankEntry, QuestionType, MIN_CHOICE_OPTIONS};
use crate::utils::validation::{collect, field_error, finish, is_blank};

/// Ordered questions of one draft. Numbers are always exactly `1..=len`.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    entries: Vec<QuestionBankEntry>,
    limit: usize,
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::with_limit(DEFAULT_MAX_QUESTIONS_PER_DRAFT)
    }
}

impl QuestionBank {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn entries(&self) -> &[QuestionBankEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn total_points(&self) -> u32 {
        self.entries.iter().map(|q| q.points).sum()
    }

    pub fn get(&self, id: Uuid) -> Option<&QuestionBankEntry> {
        self.entries.iter().find(|q| q.id == id)
    }

    pub fn add_question(&mut self, payload: QuestionPayload) -> Result<&QuestionBankEntry> {
        if self.entries.len() >= self.limit {
            let mut errors = ValidationErrors::new();
            errors.add(
                "questions",
                field_error(
                    "too_many_questions",
                    format!("A draft holds at most {} questions", self.limit),
                ),
            );
            return Err(errors.into());
        }

        let normalized = normalize(payload)?;
        let entry = QuestionBankEntry {
            id: Uuid::new_v4(),
            question_number: self.entries.len() as u32 + 1,
            question_type: normalized.question_type,
            text: normalized.text,
            options: normalized.options,
            correct_answer: normalized.correct_answer,
            points: normalized.points,
            time_limit_seconds: normalized.time_limit_seconds,
            explanation: normalized.explanation,
        };
        tracing::debug!(question_id = %entry.id, number = entry.question_number, "Question added");
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn edit_question(&mut self, id: Uuid, payload: QuestionPayload) -> Result<&QuestionBankEntry> {
        let idx = self.position(id)?;
        let normalized = normalize(payload)?;
        let slot = &mut self.entries[idx];
        slot.question_type = normalized.question_type;
        slot.text = normalized.text;
        slot.options = normalized.options;
        slot.correct_answer = normalized.correct_answer;
        slot.points = normalized.points;
        slot.time_limit_seconds = normalized.time_limit_seconds;
        slot.explanation = normalized.explanation;
        Ok(&self.entries[idx])
    }

    pub fn delete_question(&mut self, id: Uuid) -> Result<QuestionBankEntry> {
        let idx = self.position(id)?;
        let removed = self.entries.remove(idx);
        self.renumber();
        tracing::debug!(question_id = %id, remaining = self.entries.len(), "Question deleted");
        Ok(removed)
    }

    /// Moves a question so it ends up with number `to`, shifting the others.
    pub fn move_question(&mut self, id: Uuid, to: u32) -> Result<&QuestionBankEntry> {
        let from = self.position(id)?;
        if to == 0 || to as usize > self.entries.len() {
            let mut errors = ValidationErrors::new();
            errors.add(
                "to",
                field_error(
                    "out_of_range",
                    format!("Position must be between 1 and {}", self.entries.len()),
                ),
            );
            return Err(errors.into());
        }
        let entry = self.entries.remove(from);
        let target = to as usize - 1;
        self.entries.insert(target, entry);
        self.renumber();
        Ok(&self.entries[target])
    }

    fn position(&self, id: Uuid) -> Result<usize> {
        self.entries
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| Error::NotFound(format!("Question {} not found", id)))
    }

    fn renumber(&mut self) {
        for (idx, entry) in self.entries.iter_mut().enumerate() {
            entry.question_number = idx as u32 + 1;
        }
    }
}

/// Validates a payload and brings it into stored shape: trimmed text, blank
/// options dropped (with an index answer remapped onto what remains), and
/// options cleared for types that do not use them.
fn normalize(payload: QuestionPayload) -> Result<QuestionPayload> {
    let mut errors = collect(&payload);

    if is_blank(&payload.text) {
        errors.add("text", field_error("blank", "Question text is required"));
    }

    let mut normalized = payload;
    normalized.text = normalized.text.trim().to_string();

    match normalized.question_type {
        QuestionType::MultipleChoice => {
            let raw = normalized.options.take().unwrap_or_default();
            let kept: Vec<(usize, String)> = raw
                .iter()
                .enumerate()
                .filter(|(_, o)| !is_blank(o))
                .map(|(i, o)| (i, o.trim().to_string()))
                .collect();

            if kept.len() < MIN_CHOICE_OPTIONS {
                errors.add(
                    "options",
                    field_error(
                        "too_few_options",
                        format!("At least {} non-empty options are required", MIN_CHOICE_OPTIONS),
                    ),
                );
            }

            normalized.correct_answer = match normalized.correct_answer.take() {
                None => {
                    errors.add(
                        "correct_answer",
                        field_error("required", "Multiple choice questions need a correct answer"),
                    );
                    None
                }
                Some(CorrectAnswer::Index(i)) => {
                    match kept.iter().position(|(orig, _)| *orig as i64 == i) {
                        Some(pos) => Some(CorrectAnswer::Index(pos as i64)),
                        None => {
                            errors.add(
                                "correct_answer",
                                field_error("unknown_option", "Correct answer must point at a non-empty option"),
                            );
                            None
                        }
                    }
                }
                Some(CorrectAnswer::Text(text)) => {
                    let text = text.trim().to_string();
                    if kept.iter().any(|(_, o)| *o == text) {
                        Some(CorrectAnswer::Text(text))
                    } else {
                        errors.add(
                            "correct_answer",
                            field_error("unknown_option", "Correct answer must match one of the options"),
                        );
                        None
                    }
                }
            };

            normalized.options = Some(kept.into_iter().map(|(_, o)| o).collect());
        }
        QuestionType::TrueFalse => {
            normalized.options = None;
            normalized.correct_answer = match normalized.correct_answer.take() {
                Some(answer) => match true_false_value(&answer) {
                    Some(value) => Some(CorrectAnswer::Text(value.to_string())),
                    None => {
                        errors.add(
                            "correct_answer",
                            field_error("not_boolean", "Correct answer must be true or false"),
                        );
                        None
                    }
                },
                None => {
                    errors.add(
                        "correct_answer",
                        field_error("required", "True/false questions need a correct answer"),
                    );
                    None
                }
            };
        }
        QuestionType::ShortAnswer | QuestionType::FillBlank => {
            normalized.options = None;
            normalized.correct_answer = match normalized.correct_answer.take() {
                Some(CorrectAnswer::Text(text)) if is_blank(&text) => None,
                other => other,
            };
        }
    }

    finish(errors)?;
    Ok(normalized)
}

fn true_false_value(answer: &CorrectAnswer) -> Option<bool> {
    match answer {
        CorrectAnswer::Index(1) => Some(true),
        CorrectAnswer::Index(0) => Some(false),
        CorrectAnswer::Index(_) => None,
        CorrectAnswer::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(text: &str) -> QuestionPayload {
        QuestionPayload {
            question_type: QuestionType::MultipleChoice,
            text: text.to_string(),
            options: Some(vec!["3".into(), "4".into()]),
            correct_answer: Some(CorrectAnswer::Index(1)),
            points: 5,
            time_limit_seconds: 60,
            explanation: None,
        }
    }

    fn short(text: &str) -> QuestionPayload {
        QuestionPayload {
            question_type: QuestionType::ShortAnswer,
            text: text.to_string(),
            options: None,
            correct_answer: None,
            points: 10,
            time_limit_seconds: 120,
            explanation: Some("Any phrasing is fine".into()),
        }
    }

    fn numbers(bank: &QuestionBank) -> Vec<u32> {
        bank.entries().iter().map(|q| q.question_number).collect()
    }

    #[test]
    fn add_assigns_next_number() {
        let mut bank = QuestionBank::default();
        bank.add_question(choice("2+2?")).unwrap();
        let second = bank.add_question(short("Explain gravity")).unwrap();
        assert_eq!(second.question_number, 2);
        assert_eq!(bank.total_points(), 15);
    }

    #[test]
    fn numbers_stay_dense_across_adds_and_deletes() {
        let mut bank = QuestionBank::default();
        let mut ids = Vec::new();
        for round in 0..12 {
            let id = bank.add_question(short(&format!("Q{}", round))).unwrap().id;
            ids.push(id);
            if round % 3 == 2 {
                // drop the oldest surviving question, then a middle one
                let oldest = ids.remove(0);
                bank.delete_question(oldest).unwrap();
                if ids.len() > 2 {
                    let middle = ids.remove(ids.len() / 2);
                    bank.delete_question(middle).unwrap();
                }
            }
            let expected: Vec<u32> = (1..=bank.len() as u32).collect();
            assert_eq!(numbers(&bank), expected);
        }
    }

    #[test]
    fn delete_closes_the_gap() {
        let mut bank = QuestionBank::default();
        let a = bank.add_question(short("A")).unwrap().id;
        let b = bank.add_question(short("B")).unwrap().id;
        let c = bank.add_question(short("C")).unwrap().id;
        bank.delete_question(b).unwrap();
        assert_eq!(bank.get(a).unwrap().question_number, 1);
        assert_eq!(bank.get(c).unwrap().question_number, 2);
    }

    #[test]
    fn edit_keeps_identity_and_number() {
        let mut bank = QuestionBank::default();
        bank.add_question(short("A")).unwrap();
        let id = bank.add_question(short("B")).unwrap().id;
        let edited = bank.edit_question(id, choice("Pick one")).unwrap();
        assert_eq!(edited.id, id);
        assert_eq!(edited.question_number, 2);
        assert_eq!(edited.question_type, QuestionType::MultipleChoice);
    }

    #[test]
    fn rejects_every_bad_field_at_once() {
        let mut bank = QuestionBank::default();
        let bad = QuestionPayload {
            question_type: QuestionType::MultipleChoice,
            text: "   ".into(),
            options: Some(vec!["only".into(), " ".into()]),
            correct_answer: Some(CorrectAnswer::Index(0)),
            points: 0,
            time_limit_seconds: 5,
            explanation: None,
        };
        let err = bank.add_question(bad).unwrap_err();
        assert_eq!(
            err.invalid_fields(),
            vec!["options", "points", "text", "time_limit_seconds"]
        );
        assert!(bank.is_empty());
    }

    #[test]
    fn blank_options_are_dropped_and_index_remapped() {
        let mut bank = QuestionBank::default();
        let payload = QuestionPayload {
            options: Some(vec!["".into(), "Paris".into(), " ".into(), "Rome".into()]),
            correct_answer: Some(CorrectAnswer::Index(3)),
            ..choice("Capital of Italy?")
        };
        let entry = bank.add_question(payload).unwrap();
        assert_eq!(entry.options.as_deref(), Some(&["Paris".to_string(), "Rome".to_string()][..]));
        assert_eq!(entry.correct_answer, Some(CorrectAnswer::Index(1)));
    }

    #[test]
    fn objective_questions_need_an_answer() {
        let mut bank = QuestionBank::default();
        let tf = QuestionPayload {
            question_type: QuestionType::TrueFalse,
            options: None,
            correct_answer: None,
            ..choice("The sky is blue")
        };
        assert_eq!(bank.add_question(tf.clone()).unwrap_err().invalid_fields(), vec!["correct_answer"]);

        let tf = QuestionPayload {
            correct_answer: Some(CorrectAnswer::Text("TRUE".into())),
            options: Some(vec!["leftover".into()]),
            ..tf
        };
        let entry = bank.add_question(tf).unwrap();
        assert_eq!(entry.correct_answer, Some(CorrectAnswer::Text("true".into())));
        assert!(entry.options.is_none());
    }

    #[test]
    fn move_reorders_and_renumbers() {
        let mut bank = QuestionBank::default();
        let a = bank.add_question(short("A")).unwrap().id;
        bank.add_question(short("B")).unwrap();
        let c = bank.add_question(short("C")).unwrap().id;
        bank.move_question(c, 1).unwrap();
        assert_eq!(bank.get(c).unwrap().question_number, 1);
        assert_eq!(bank.get(a).unwrap().question_number, 2);
        assert!(bank.move_question(a, 4).is_err());
        assert_eq!(numbers(&bank), vec![1, 2, 3]);
    }

    #[test]
    fn respects_question_cap() {
        let mut bank = QuestionBank::with_limit(1);
        bank.add_question(short("A")).unwrap();
        let err = bank.add_question(short("B")).unwrap_err();
        assert_eq!(err.invalid_fields(), vec!["questions"]);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut bank = QuestionBank::default();
        assert!(matches!(bank.delete_question(Uuid::new_v4()), Err(Error::NotFound(_))));
    }
}
