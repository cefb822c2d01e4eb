use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::ValidationErrors;

use crate::database::repository::AssessmentRepository;
use crate::dto::assessment_dto::{AssessmentListQuery, AssessmentResponse};
use crate::error::{Error, Result};
use crate::models::assessment::{Assessment, AssessmentStatus};
use crate::models::caller::{CallerContext, PublishingCapability, Role};
use crate::models::draft::AssessmentDraft;
use crate::services::status_service::{derive_assessment_status, status_badge, DisplayStatus};
use crate::services::wizard_service::WizardController;
use crate::utils::time::Clock;
use crate::utils::validation::{field_error, finish, is_blank};

/// Every reason `draft` cannot be finalized, keyed by field.
pub fn validate_draft(draft: &AssessmentDraft, as_draft: bool) -> std::result::Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if is_blank(&draft.title) {
        errors.add("title", field_error("blank", "Title is required"));
    } else if let Some(max) = draft.kind.max_title_len() {
        if draft.title.trim().chars().count() > max {
            errors.add(
                "title",
                field_error("too_long", format!("Title must be at most {} characters", max)),
            );
        }
    }
    if is_blank(&draft.description) {
        errors.add("description", field_error("blank", "Description is required"));
    }
    if draft.duration_minutes == 0 {
        errors.add(
            "duration_minutes",
            field_error("not_positive", "Duration must be at least 1 minute"),
        );
    }
    if draft.pass_percentage > 100 {
        errors.add(
            "pass_percentage",
            field_error("out_of_range", "Pass percentage must be between 0 and 100"),
        );
    }
    if let (Some(start), Some(end)) = (draft.start_time, draft.end_time) {
        if end <= start {
            errors.add("end_time", field_error("before_start", "End time must be after start time"));
        }
    }

    if !as_draft {
        if !draft.publishing.is_publishable() {
            errors.add(
                "publishing",
                field_error("empty", "Select at least one institution to publish to"),
            );
        }
        if draft.questions.is_empty() {
            errors.add("questions", field_error("empty", "Add at least one question"));
        }
        if draft.start_time.is_none() {
            errors.add("start_time", field_error("required", "Start time is required to publish"));
        }
        if draft.end_time.is_none() {
            errors.add("end_time", field_error("required", "End time is required to publish"));
        }
    }

    finish(errors)
}

/// Turns a draft into a persisted assessment. Nothing is saved unless every
/// check passes.
pub fn finalize(
    draft: &AssessmentDraft,
    as_draft: bool,
    created_by: &str,
    now: DateTime<Utc>,
    repository: &dyn AssessmentRepository,
) -> Result<Assessment> {
    validate_draft(draft, as_draft)?;
    draft.publishing.ensure_authorized()?;

    let status = if as_draft {
        AssessmentStatus::Draft
    } else if draft.start_time.is_some_and(|start| start > now) {
        AssessmentStatus::Upcoming
    } else {
        AssessmentStatus::Unpublished
    };

    let body = draft.to_new_assessment(status, created_by);
    let record = repository.save(&body)?;
    tracing::info!(
        assessment_id = %record.id,
        kind = ?body.kind,
        status = status.as_str(),
        questions = body.questions.len(),
        institutions = body.publishing.len(),
        "Assessment finalized"
    );
    Ok(Assessment::from_saved(record, body))
}

#[derive(Clone)]
pub struct AssessmentService {
    repository: Arc<dyn AssessmentRepository>,
    clock: Arc<dyn Clock>,
}

impl AssessmentService {
    pub fn new(repository: Arc<dyn AssessmentRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub fn submit(&self, wizard: &mut WizardController, as_draft: bool, caller: &CallerContext) -> Result<Assessment> {
        wizard.submit(
            as_draft,
            &caller.user_id,
            self.clock.now(),
            self.repository.as_ref(),
        )
    }

    pub fn respond(&self, assessment: Assessment) -> AssessmentResponse {
        let display_status = status_badge(&assessment, self.clock.now());
        AssessmentResponse {
            assessment,
            display_status,
        }
    }

    pub fn list(&self, caller: &CallerContext, query: &AssessmentListQuery) -> Result<Vec<AssessmentResponse>> {
        let items = self
            .repository
            .list()?
            .into_iter()
            .filter(|a| is_visible(a, caller))
            .filter(|a| {
                query
                    .institution_id
                    .as_deref()
                    .map_or(true, |inst| a.targets_institution(inst))
            })
            .filter(|a| query.kind.map_or(true, |kind| a.body.kind == kind))
            .map(|a| self.respond(a))
            .filter(|r| query.status.map_or(true, |s| r.display_status == s))
            .collect();
        Ok(items)
    }

    pub fn get(&self, caller: &CallerContext, id: Uuid) -> Result<AssessmentResponse> {
        let assessment = self.find_visible(caller, id)?;
        Ok(self.respond(assessment))
    }

    /// Strict status: fails on a missing schedule instead of degrading.
    pub fn status(&self, caller: &CallerContext, id: Uuid) -> Result<DisplayStatus> {
        let assessment = self.find_visible(caller, id)?;
        derive_assessment_status(&assessment, self.clock.now())
    }

    fn find_visible(&self, caller: &CallerContext, id: Uuid) -> Result<Assessment> {
        self.repository
            .get(id)?
            .filter(|a| is_visible(a, caller))
            .ok_or_else(|| Error::NotFound(format!("Assessment {} not found", id)))
    }
}

fn is_visible(assessment: &Assessment, caller: &CallerContext) -> bool {
    if assessment.body.created_by == caller.user_id {
        return true;
    }
    if caller.role == Role::Student && assessment.status() == AssessmentStatus::Draft {
        return false;
    }
    match (caller.publishing_capability(), &caller.institution_id) {
        (PublishingCapability::AnyInstitution, _) => true,
        (_, Some(inst)) => assessment.targets_institution(inst),
        (_, None) => false,
    }
}
