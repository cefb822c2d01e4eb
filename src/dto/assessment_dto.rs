use serde::{Deserialize, Serialize};

use crate::models::assessment::{Assessment, AssessmentKind};
use crate::services::status_service::StatusBadge;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResponse {
    #[serde(flatten)]
    pub assessment: Assessment,
    pub display_status: StatusBadge,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AssessmentListQuery {
    pub status: Option<StatusBadge>,
    pub institution_id: Option<String>,
    pub kind: Option<AssessmentKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentListResponse {
    pub items: Vec<AssessmentResponse>,
    pub total: usize,
}
