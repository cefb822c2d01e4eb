use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::publishing::PublishingScopeEntry;
use super::question::QuestionBankEntry;

pub const MAX_COURSE_TITLE_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentKind {
    #[default]
    Assessment,
    Course,
    Assignment,
}

impl AssessmentKind {
    pub fn max_title_len(self) -> Option<usize> {
        match self {
            AssessmentKind::Assessment => None,
            AssessmentKind::Course | AssessmentKind::Assignment => Some(MAX_COURSE_TITLE_LEN),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Draft,
    Unpublished,
    Upcoming,
    Ongoing,
    Completed,
}

impl AssessmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AssessmentStatus::Draft => "draft",
            AssessmentStatus::Unpublished => "unpublished",
            AssessmentStatus::Upcoming => "upcoming",
            AssessmentStatus::Ongoing => "ongoing",
            AssessmentStatus::Completed => "completed",
        }
    }
}

/// Everything a finalized entity carries before the repository assigns
/// its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssessment {
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
    pub questions: Vec<QuestionBankEntry>,
    pub publishing: Vec<PublishingScopeEntry>,
    pub status: AssessmentStatus,
    pub created_by: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub body: NewAssessment,
}

impl Assessment {
    pub fn from_saved(record: SavedRecord, body: NewAssessment) -> Self {
        Self {
            id: record.id,
            created_at: record.created_at,
            body,
        }
    }

    pub fn status(&self) -> AssessmentStatus {
        self.body.status
    }

    pub fn targets_institution(&self, institution_id: &str) -> bool {
        self.body
            .publishing
            .iter()
            .any(|entry| entry.institution_id == institution_id)
    }
}
