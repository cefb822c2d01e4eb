use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishingScopeEntry {
    pub institution_id: String,
    pub class_ids: BTreeSet<String>,
}
