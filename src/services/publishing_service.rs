use std::collections::BTreeSet;

use validator::ValidationErrors;

use crate::error::{Error, Result};
use crate::models::caller::PublishingCapability;
use crate::models::publishing::PublishingScopeEntry;
use crate::utils::validation::{field_error, finish, is_blank};

/// Institutions and classes a draft targets, bound to what the author may
/// publish to.
#[derive(Debug, Clone)]
pub struct PublishingScope {
    entries: Vec<PublishingScopeEntry>,
    capability: PublishingCapability,
}

impl PublishingScope {
    pub fn new(capability: PublishingCapability) -> Self {
        Self {
            entries: Vec::new(),
            capability,
        }
    }

    pub fn entries(&self) -> &[PublishingScopeEntry] {
        &self.entries
    }

    pub fn capability(&self) -> &PublishingCapability {
        &self.capability
    }

    pub fn is_publishable(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn add_scope(&mut self, institution_id: &str, class_ids: Vec<String>) -> Result<&PublishingScopeEntry> {
        let institution_id = institution_id.trim();
        let mut errors = ValidationErrors::new();
        if is_blank(institution_id) {
            errors.add("institution_id", field_error("blank", "Institution is required"));
            class_set(class_ids, &mut errors);
            return Err(errors.into());
        }
        self.capability.check(institution_id)?;

        if self.find(institution_id).is_some() {
            errors.add(
                "institution_id",
                field_error(
                    "duplicate_institution",
                    format!("Institution {} is already targeted; update it instead", institution_id),
                ),
            );
        }
        let class_ids = class_set(class_ids, &mut errors);
        finish(errors)?;

        self.entries.push(PublishingScopeEntry {
            institution_id: institution_id.to_string(),
            class_ids,
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn update_scope(&mut self, institution_id: &str, class_ids: Vec<String>) -> Result<&PublishingScopeEntry> {
        let idx = self
            .find(institution_id.trim())
            .ok_or_else(|| not_targeted(institution_id))?;

        let mut errors = ValidationErrors::new();
        let class_ids = class_set(class_ids, &mut errors);
        finish(errors)?;

        self.entries[idx].class_ids = class_ids;
        Ok(&self.entries[idx])
    }

    pub fn remove_scope(&mut self, institution_id: &str) -> Result<PublishingScopeEntry> {
        let idx = self
            .find(institution_id.trim())
            .ok_or_else(|| not_targeted(institution_id))?;
        Ok(self.entries.remove(idx))
    }

    /// Re-checks every entry against the capability. Used right before
    /// anything is persisted.
    pub fn ensure_authorized(&self) -> Result<()> {
        for entry in &self.entries {
            self.capability.check(&entry.institution_id)?;
        }
        Ok(())
    }

    fn find(&self, institution_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.institution_id == institution_id)
    }
}

fn class_set(class_ids: Vec<String>, errors: &mut ValidationErrors) -> BTreeSet<String> {
    let set: BTreeSet<String> = class_ids
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if set.is_empty() {
        errors.add("class_ids", field_error("empty", "Select at least one class"));
    }
    set
}

fn not_targeted(institution_id: &str) -> Error {
    Error::NotFound(format!("Institution {} is not in the publishing scope", institution_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_classes_are_rejected() {
        let mut scope = PublishingScope::new(PublishingCapability::AnyInstitution);
        let err = scope.add_scope("inst-1", vec![]).unwrap_err();
        assert_eq!(err.invalid_fields(), vec!["class_ids"]);
        let err = scope.add_scope("inst-1", classes(&["  "])).unwrap_err();
        assert_eq!(err.invalid_fields(), vec!["class_ids"]);
        assert!(!scope.is_publishable());
    }

    #[test]
    fn duplicate_institution_needs_update() {
        let mut scope = PublishingScope::new(PublishingCapability::AnyInstitution);
        assert!(matches!(scope.add_scope("inst-1", vec![]), Err(Error::Validation(_))));
        scope.add_scope("inst-1", classes(&["c1"])).unwrap();
        let err = scope.add_scope("inst-1", classes(&["c2"])).unwrap_err();
        assert_eq!(err.invalid_fields(), vec!["institution_id"]);

        let updated = scope.update_scope("inst-1", classes(&["c1", "c2"])).unwrap();
        assert_eq!(updated.class_ids.len(), 2);
        assert_eq!(scope.entries().len(), 1);
        assert!(scope.is_publishable());
    }

    #[test]
    fn officer_scope_rejects_foreign_institutions() {
        let mut scope = PublishingScope::new(PublishingCapability::SingleInstitution("inst-1".into()));
        assert!(matches!(
            scope.add_scope("inst-2", classes(&["c1"])),
            Err(Error::Authorization(_))
        ));
        scope.add_scope("inst-1", classes(&["c1"])).unwrap();
        assert!(scope.ensure_authorized().is_ok());
    }

    #[test]
    fn blank_institution_is_a_validation_error_for_any_capability() {
        let mut scope = PublishingScope::new(PublishingCapability::SingleInstitution("inst-1".into()));
        let err = scope.add_scope("  ", classes(&["c1"])).unwrap_err();
        assert_eq!(err.invalid_fields(), vec!["institution_id"]);

        let err = scope.add_scope("", vec![]).unwrap_err();
        assert_eq!(err.invalid_fields(), vec!["class_ids", "institution_id"]);
        assert!(!scope.is_publishable());
    }

    #[test]
    fn remove_and_update_require_existing_entry() {
        let mut scope = PublishingScope::new(PublishingCapability::AnyInstitution);
        assert!(matches!(scope.remove_scope("inst-1"), Err(Error::NotFound(_))));
        assert!(matches!(
            scope.update_scope("inst-1", classes(&["c1"])),
            Err(Error::NotFound(_))
        ));
        scope.add_scope("inst-1", classes(&["c1", "c1"])).unwrap();
        let removed = scope.remove_scope("inst-1").unwrap();
        assert_eq!(removed.class_ids.len(), 1);
        assert!(!scope.is_publishable());
    }

    #[test]
    fn narrowed_capability_fails_authorization_recheck() {
        let scope = PublishingScope {
            entries: vec![PublishingScopeEntry {
                institution_id: "inst-2".into(),
                class_ids: ["c9".to_string()].into_iter().collect(),
            }],
            capability: PublishingCapability::SingleInstitution("inst-1".into()),
        };
        assert!(matches!(scope.ensure_authorized(), Err(Error::Authorization(_))));
    }

    #[test]
    fn update_with_no_classes_keeps_old_set() {
        let mut scope = PublishingScope::new(PublishingCapability::AnyInstitution);
        scope.add_scope("inst-1", classes(&["c1"])).unwrap();
        assert!(scope.update_scope("inst-1", vec![]).is_err());
        assert!(scope.entries()[0].class_ids.contains("c1"));
    }
}
