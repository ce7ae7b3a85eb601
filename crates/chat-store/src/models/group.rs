//! Group record

use serde::{Deserialize, Serialize};

/// Record stored under `GroupsTable/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupModel {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub admin: String,
    #[serde(default)]
    pub members: Vec<String>,
}
