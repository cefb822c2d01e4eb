use chrono::{DateTime, Utc};

use super::assessment::{AssessmentKind, AssessmentStatus, NewAssessment};
use super::caller::PublishingCapability;
use crate::services::publishing_service::PublishingScope;
use crate::services::question_bank::QuestionBank;

/// The in-progress entity a wizard accumulates. Lives in memory only and
/// is dropped when the wizard resets or is abandoned.
#[derive(Debug, Clone)]
pub struct AssessmentDraft {
    pub kind: AssessmentKind,
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub pass_percentage: u8,
    pub auto_submit: bool,
    pub auto_evaluate: bool,
    pub shuffle_questions: bool,
    pub show_results_immediately: bool,
    pub allow_review: bool,
    pub questions: QuestionBank,
    pub publishing: PublishingScope,
}

impl AssessmentDraft {
    pub fn new(kind: AssessmentKind, capability: PublishingCapability, max_questions: usize) -> Self {
        Self {
            kind,
            title: String::new(),
            description: String::new(),
            duration_minutes: 0,
            start_time: None,
            end_time: None,
            pass_percentage: 0,
            auto_submit: false,
            auto_evaluate: false,
            shuffle_questions: false,
            show_results_immediately: false,
            allow_review: false,
            questions: QuestionBank::with_limit(max_questions),
            publishing: PublishingScope::new(capability),
        }
    }

    /// A fresh draft of the same kind, cap and publishing capability.
    pub fn emptied(&self) -> Self {
        Self::new(
            self.kind,
            self.publishing.capability().clone(),
            self.questions.limit(),
        )
    }

    pub fn to_new_assessment(&self, status: AssessmentStatus, created_by: &str) -> NewAssessment {
        NewAssessment {
            kind: self.kind,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            duration_minutes: self.duration_minutes,
            start_time: self.start_time,
            end_time: self.end_time,
            pass_percentage: self.pass_percentage,
            auto_submit: self.auto_submit,
            auto_evaluate: self.auto_evaluate,
            shuffle_questions: self.shuffle_questions,
            show_results_immediately: self.show_results_immediately,
            allow_review: self.allow_review,
            questions: self.questions.entries().to_vec(),
            publishing: self.publishing.entries().to_vec(),
            status,
            created_by: created_by.to_string(),
        }
    }
}
