// Project domain type
//
// Projects are owned by an external project service. This crate only sees
// them through the MembershipOracle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Project as reported by the membership oracle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: None,
            created_at: Utc::now(),
        }
    }
}

/// Collect project ids for batched per-project queries
pub fn project_ids(projects: &[Project]) -> Vec<Uuid> {
    projects.iter().map(|p| p.id).collect()
}
