use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::assessment_dto::AssessmentResponse;
use crate::models::assessment::AssessmentKind;
use crate::models::draft::AssessmentDraft;
use crate::models::publishing::PublishingScopeEntry;
use crate::models::question::QuestionBankEntry;
use crate::services::wizard_service::{WizardController, WizardStep};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenWizardPayload {
    #[serde(default)]
    pub kind: AssessmentKind,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasicInfoPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SettingsPayload {
    #[serde(default)]
    pub duration_minutes: u32,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(range(max = 100, message = "Pass percentage must be between 0 and 100"))]
    pub pass_percentage: u8,
    #[serde(default)]
    pub auto_submit: bool,
    #[serde(default)]
    pub auto_evaluate: bool,
    #[serde(default)]
    pub shuffle_questions: bool,
    #[serde(default)]
    pub show_results_immediately: bool,
    #[serde(default)]
    pub allow_review: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddScopePayload {
    pub institution_id: String,
    #[serde(default)]
    pub class_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateScopePayload {
    #[serde(default)]
    pub class_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SubmitPayload {
    #[serde(default)]
    pub as_draft: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepState {
    pub step: WizardStep,
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftView {
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
    pub total_points: u32,
    pub publishing: Vec<PublishingScopeEntry>,
}

impl From<&AssessmentDraft> for DraftView {
    fn from(draft: &AssessmentDraft) -> Self {
        Self {
            kind: draft.kind,
            title: draft.title.clone(),
            description: draft.description.clone(),
            duration_minutes: draft.duration_minutes,
            start_time: draft.start_time,
            end_time: draft.end_time,
            pass_percentage: draft.pass_percentage,
            auto_submit: draft.auto_submit,
            auto_evaluate: draft.auto_evaluate,
            shuffle_questions: draft.shuffle_questions,
            show_results_immediately: draft.show_results_immediately,
            allow_review: draft.allow_review,
            questions: draft.questions.entries().to_vec(),
            total_points: draft.questions.total_points(),
            publishing: draft.publishing.entries().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardStateResponse {
    pub session_id: Uuid,
    pub step: WizardStep,
    pub steps: Vec<StepState>,
    pub draft: DraftView,
}

impl WizardStateResponse {
    pub fn new(session_id: Uuid, wizard: &WizardController) -> Self {
        Self {
            session_id,
            step: wizard.step(),
            steps: wizard
                .step_validity()
                .into_iter()
                .map(|(step, valid)| StepState { step, valid })
                .collect(),
            draft: DraftView::from(wizard.draft()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub assessment: AssessmentResponse,
    pub wizard: WizardStateResponse,
}
