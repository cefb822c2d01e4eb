use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SystemAdmin,
    Management,
    InnovationOfficer,
    Teacher,
    Student,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::SystemAdmin => "system_admin",
            Role::Management => "management",
            Role::InnovationOfficer => "innovation_officer",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "system_admin" | "admin" => Some(Role::SystemAdmin),
            "management" => Some(Role::Management),
            "innovation_officer" | "officer" => Some(Role::InnovationOfficer),
            "teacher" => Some(Role::Teacher),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

/// Identity of whoever drives a wizard, as decoded from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    pub user_id: String,
    pub role: Role,
    pub institution_id: Option<String>,
}

/// Where a caller may publish. Every scope mutation and every finalize
/// consults this one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishingCapability {
    AnyInstitution,
    SingleInstitution(String),
    Denied,
}

impl CallerContext {
    pub fn new(user_id: impl Into<String>, role: Role, institution_id: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            institution_id,
        }
    }

    pub fn publishing_capability(&self) -> PublishingCapability {
        match (self.role, &self.institution_id) {
            (Role::SystemAdmin, _) => PublishingCapability::AnyInstitution,
            (Role::Student, _) => PublishingCapability::Denied,
            (_, Some(institution_id)) => {
                PublishingCapability::SingleInstitution(institution_id.clone())
            }
            (_, None) => PublishingCapability::Denied,
        }
    }

    pub fn ensure_can_author(&self) -> Result<()> {
        if self.publishing_capability() == PublishingCapability::Denied {
            return Err(Error::Authorization(format!(
                "Role {} cannot author assessments",
                self.role.as_str()
            )));
        }
        Ok(())
    }
}

impl PublishingCapability {
    pub fn permits(&self, institution_id: &str) -> bool {
        match self {
            PublishingCapability::AnyInstitution => true,
            PublishingCapability::SingleInstitution(own) => own == institution_id,
            PublishingCapability::Denied => false,
        }
    }

    pub fn check(&self, institution_id: &str) -> Result<()> {
        if self.permits(institution_id) {
            return Ok(());
        }
        tracing::warn!(institution_id, "Publishing outside caller scope rejected");
        Err(Error::Authorization(format!(
            "Not allowed to publish to institution {}",
            institution_id
        )))
    }
}
