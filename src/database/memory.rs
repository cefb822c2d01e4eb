use std::sync::RwLock;

use uuid::Uuid;

use super::repository::AssessmentRepository;
use crate::error::{Error, Result};
use crate::models::assessment::{Assessment, NewAssessment, SavedRecord};
use crate::utils::time::now;

#[derive(Debug, Default)]
pub struct InMemoryAssessmentRepository {
    rows: RwLock<Vec<Assessment>>,
}

impl InMemoryAssessmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an already-identified assessment as is. Used for seeding.
    pub fn insert(&self, assessment: Assessment) -> Result<()> {
        self.rows
            .write()
            .map_err(|_| poisoned())?
            .push(assessment);
        Ok(())
    }
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn save(&self, assessment: &NewAssessment) -> Result<SavedRecord> {
        let record = SavedRecord {
            id: Uuid::new_v4(),
            created_at: now(),
        };
        self.insert(Assessment::from_saved(record, assessment.clone()))?;
        Ok(record)
    }

    fn get(&self, id: Uuid) -> Result<Option<Assessment>> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.iter().find(|a| a.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<Assessment>> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        let mut items = rows.clone();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }
}

fn poisoned() -> Error {
    Error::Internal("Assessment store lock poisoned".to_string())
}
