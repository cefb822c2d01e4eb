use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::assessment::{Assessment, AssessmentStatus};

/// Status as of a given instant. Persisted `unpublished`/`upcoming` flags
/// never surface here; they are always resolved against the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Draft,
    Upcoming,
    Ongoing,
    Completed,
}

/// What a list view shows. `Unknown` stands in when an entity cannot be
/// classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBadge {
    Draft,
    Upcoming,
    Ongoing,
    Completed,
    Unknown,
}

impl From<DisplayStatus> for StatusBadge {
    fn from(status: DisplayStatus) -> Self {
        match status {
            DisplayStatus::Draft => StatusBadge::Draft,
            DisplayStatus::Upcoming => StatusBadge::Upcoming,
            DisplayStatus::Ongoing => StatusBadge::Ongoing,
            DisplayStatus::Completed => StatusBadge::Completed,
        }
    }
}

/// Display status from the persisted flag and the schedule. Both schedule
/// bounds are inclusive for `Ongoing`.
pub fn derive_status(
    status: AssessmentStatus,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DisplayStatus> {
    if status == AssessmentStatus::Draft {
        return Some(DisplayStatus::Draft);
    }
    let (start, end) = (start_time?, end_time?);
    let derived = if now < start {
        DisplayStatus::Upcoming
    } else if now <= end {
        DisplayStatus::Ongoing
    } else {
        DisplayStatus::Completed
    };
    Some(derived)
}

pub fn derive_assessment_status(assessment: &Assessment, now: DateTime<Utc>) -> Result<DisplayStatus> {
    derive_status(
        assessment.body.status,
        assessment.body.start_time,
        assessment.body.end_time,
        now,
    )
    .ok_or(Error::MissingSchedule(assessment.id))
}

pub fn status_badge(assessment: &Assessment, now: DateTime<Utc>) -> StatusBadge {
    match derive_assessment_status(assessment, now) {
        Ok(status) => status.into(),
        Err(e) => {
            tracing::warn!(assessment_id = %assessment.id, error = %e, "Rendering status as unknown");
            StatusBadge::Unknown
        }
    }
}
