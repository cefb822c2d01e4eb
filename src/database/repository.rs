use uuid::Uuid;

use crate::error::Result;
use crate::models::assessment::{Assessment, NewAssessment, SavedRecord};

/// Persistence contract for finalized assessments. `save` is the only write
/// and is called from finalization alone.
#[cfg_attr(test, mockall::automock)]
pub trait AssessmentRepository: Send + Sync {
    fn save(&self, assessment: &NewAssessment) -> Result<SavedRecord>;

    fn get(&self, id: Uuid) -> Result<Option<Assessment>>;

    /// Newest first.
    fn list(&self) -> Result<Vec<Assessment>>;
}
