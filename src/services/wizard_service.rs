use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidationErrors;

use crate::database::repository::AssessmentRepository;
use crate::dto::question_dto::QuestionPayload;
use crate::dto::wizard_dto::{BasicInfoPayload, SettingsPayload};
use crate::error::{Error, Result};
use crate::models::assessment::{Assessment, AssessmentKind};
use crate::models::caller::PublishingCapability;
use crate::models::draft::AssessmentDraft;
use crate::models::publishing::PublishingScopeEntry;
use crate::models::question::QuestionBankEntry;
use crate::services::assessment_service::{finalize, validate_draft};
use crate::utils::validation::{collect, field_error, finish, is_blank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    BasicInfo,
    Settings,
    Questions,
    Publishing,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::BasicInfo,
        WizardStep::Settings,
        WizardStep::Questions,
        WizardStep::Publishing,
        WizardStep::Review,
    ];

    pub fn following(self) -> Option<Self> {
        match self {
            WizardStep::BasicInfo => Some(WizardStep::Settings),
            WizardStep::Settings => Some(WizardStep::Questions),
            WizardStep::Questions => Some(WizardStep::Publishing),
            WizardStep::Publishing => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }

    pub fn preceding(self) -> Option<Self> {
        match self {
            WizardStep::BasicInfo => None,
            WizardStep::Settings => Some(WizardStep::BasicInfo),
            WizardStep::Questions => Some(WizardStep::Settings),
            WizardStep::Publishing => Some(WizardStep::Questions),
            WizardStep::Review => Some(WizardStep::Publishing),
        }
    }
}

/// Linear five-step authoring flow over one draft. Steps only change
/// through `next`, `back` and a successful `submit`.
#[derive(Debug, Clone)]
pub struct WizardController {
    step: WizardStep,
    draft: AssessmentDraft,
}

impl WizardController {
    pub fn new(kind: AssessmentKind, capability: PublishingCapability, max_questions: usize) -> Self {
        Self {
            step: WizardStep::BasicInfo,
            draft: AssessmentDraft::new(kind, capability, max_questions),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &AssessmentDraft {
        &self.draft
    }

    /// Gate for leaving `step` forwards.
    pub fn validate_step(&self, step: WizardStep) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match step {
            WizardStep::BasicInfo => {
                if is_blank(&self.draft.title) {
                    errors.add("title", field_error("blank", "Title is required"));
                }
                if is_blank(&self.draft.description) {
                    errors.add("description", field_error("blank", "Description is required"));
                }
            }
            WizardStep::Settings => {}
            WizardStep::Questions => {
                if self.draft.questions.is_empty() {
                    errors.add("questions", field_error("empty", "Add at least one question"));
                }
            }
            WizardStep::Publishing => {
                if !self.draft.publishing.is_publishable() {
                    errors.add(
                        "publishing",
                        field_error("empty", "Select at least one institution to publish to"),
                    );
                }
            }
            WizardStep::Review => return validate_draft(&self.draft, false),
        }
        finish(errors)
    }

    pub fn step_validity(&self) -> Vec<(WizardStep, bool)> {
        WizardStep::ALL
            .iter()
            .map(|&step| (step, self.validate_step(step).is_ok()))
            .collect()
    }

    pub fn update_basic_info(&mut self, payload: BasicInfoPayload) -> Result<()> {
        if let Some(max) = self.draft.kind.max_title_len() {
            if payload.title.trim().chars().count() > max {
                let mut errors = ValidationErrors::new();
                errors.add(
                    "title",
                    field_error("too_long", format!("Title must be at most {} characters", max)),
                );
                return Err(errors.into());
            }
        }
        self.draft.title = payload.title;
        self.draft.description = payload.description;
        Ok(())
    }

    pub fn update_settings(&mut self, payload: SettingsPayload) -> Result<()> {
        let mut errors = collect(&payload);
        if let (Some(start), Some(end)) = (payload.start_time, payload.end_time) {
            if end <= start {
                errors.add("end_time", field_error("before_start", "End time must be after start time"));
            }
        }
        finish(errors)?;

        let draft = &mut self.draft;
        draft.duration_minutes = payload.duration_minutes;
        draft.start_time = payload.start_time;
        draft.end_time = payload.end_time;
        draft.pass_percentage = payload.pass_percentage;
        draft.auto_submit = payload.auto_submit;
        draft.auto_evaluate = payload.auto_evaluate;
        draft.shuffle_questions = payload.shuffle_questions;
        draft.show_results_immediately = payload.show_results_immediately;
        draft.allow_review = payload.allow_review;
        Ok(())
    }

    pub fn add_question(&mut self, payload: QuestionPayload) -> Result<&QuestionBankEntry> {
        self.draft.questions.add_question(payload)
    }

    pub fn edit_question(&mut self, id: Uuid, payload: QuestionPayload) -> Result<&QuestionBankEntry> {
        self.draft.questions.edit_question(id, payload)
    }

    pub fn delete_question(&mut self, id: Uuid) -> Result<QuestionBankEntry> {
        self.draft.questions.delete_question(id)
    }

    pub fn move_question(&mut self, id: Uuid, to: u32) -> Result<&QuestionBankEntry> {
        self.draft.questions.move_question(id, to)
    }

    pub fn add_scope(&mut self, institution_id: &str, class_ids: Vec<String>) -> Result<&PublishingScopeEntry> {
        self.draft.publishing.add_scope(institution_id, class_ids)
    }

    pub fn update_scope(&mut self, institution_id: &str, class_ids: Vec<String>) -> Result<&PublishingScopeEntry> {
        self.draft.publishing.update_scope(institution_id, class_ids)
    }

    pub fn remove_scope(&mut self, institution_id: &str) -> Result<PublishingScopeEntry> {
        self.draft.publishing.remove_scope(institution_id)
    }

    pub fn next(&mut self) -> Result<WizardStep> {
        let target = self.step.following().ok_or_else(|| {
            Error::InvalidTransition("Review is the last step; submit instead".to_string())
        })?;
        self.validate_step(self.step)?;
        tracing::debug!(from = ?self.step, to = ?target, "Wizard advanced");
        self.step = target;
        Ok(target)
    }

    pub fn back(&mut self) -> Result<WizardStep> {
        let target = self.step.preceding().ok_or_else(|| {
            Error::InvalidTransition("Already at the first step".to_string())
        })?;
        tracing::debug!(from = ?self.step, to = ?target, "Wizard stepped back");
        self.step = target;
        Ok(target)
    }

    /// Finalizes the draft from the review step. On success the wizard
    /// restarts with an empty draft; on failure nothing changes.
    pub fn submit(
        &mut self,
        as_draft: bool,
        created_by: &str,
        now: DateTime<Utc>,
        repository: &dyn AssessmentRepository,
    ) -> Result<Assessment> {
        if self.step != WizardStep::Review {
            return Err(Error::InvalidTransition(
                "Submission is only possible from the review step".to_string(),
            ));
        }
        let assessment = finalize(&self.draft, as_draft, created_by, now, repository)?;
        self.reset();
        Ok(assessment)
    }

    pub fn reset(&mut self) {
        self.draft = self.draft.emptied();
        self.step = WizardStep::BasicInfo;
    }
}
