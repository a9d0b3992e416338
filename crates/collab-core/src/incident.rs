// Incident domain types
//
// Incidents are issue reports tied to a project (and optionally a task).
// Every access is gated on current project membership.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Incident classification
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum IncidentType {
    Quality,
    Safety,
    Operational,
    #[default]
    Other,
}

impl std::fmt::Display for IncidentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentType::Quality => write!(f, "quality"),
            IncidentType::Safety => write!(f, "safety"),
            IncidentType::Operational => write!(f, "operational"),
            IncidentType::Other => write!(f, "other"),
        }
    }
}

impl From<&str> for IncidentType {
    fn from(s: &str) -> Self {
        match s {
            "quality" => IncidentType::Quality,
            "safety" => IncidentType::Safety,
            "operational" => IncidentType::Operational,
            _ => IncidentType::Other,
        }
    }
}

/// Incident priority
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum IncidentPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl std::fmt::Display for IncidentPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentPriority::Low => write!(f, "low"),
            IncidentPriority::Medium => write!(f, "medium"),
            IncidentPriority::High => write!(f, "high"),
            IncidentPriority::Urgent => write!(f, "urgent"),
        }
    }
}

impl From<&str> for IncidentPriority {
    fn from(s: &str) -> Self {
        match s {
            "low" => IncidentPriority::Low,
            "high" => IncidentPriority::High,
            "urgent" => IncidentPriority::Urgent,
            _ => IncidentPriority::Medium,
        }
    }
}

/// Incident workflow status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentStatus::Open => write!(f, "open"),
            IncidentStatus::InProgress => write!(f, "in_progress"),
            IncidentStatus::Resolved => write!(f, "resolved"),
            IncidentStatus::Closed => write!(f, "closed"),
        }
    }
}

impl From<&str> for IncidentStatus {
    fn from(s: &str) -> Self {
        match s {
            "in_progress" => IncidentStatus::InProgress,
            "resolved" => IncidentStatus::Resolved,
            "closed" => IncidentStatus::Closed,
            _ => IncidentStatus::Open,
        }
    }
}

/// Incident - issue report within a project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Incident {
    pub id: Uuid,
    pub project_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<Uuid>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub priority: IncidentPriority,
    pub status: IncidentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Uuid>,
    /// Evidence URLs, in the order they were attached
    #[serde(default)]
    pub evidence: Vec<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied input for reporting an incident
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateIncidentInput {
    pub project_id: Uuid,
    #[serde(default)]
    pub task_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub incident_type: Option<IncidentType>,
    #[serde(default)]
    pub priority: Option<IncidentPriority>,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    #[serde(default)]
    pub evidence: Option<Vec<String>>,
}

/// Partial update for an incident; any subset of fields may be set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateIncidentInput {
    #[serde(default)]
    pub task_id: Option<Uuid>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub incident_type: Option<IncidentType>,
    #[serde(default)]
    pub priority: Option<IncidentPriority>,
    #[serde(default)]
    pub status: Option<IncidentStatus>,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    #[serde(default)]
    pub evidence: Option<Vec<String>>,
}

/// Creation payload handed to the repository
///
/// Status is not part of the payload: new incidents always start `open`.
#[derive(Debug, Clone)]
pub struct NewIncident {
    pub project_id: Uuid,
    pub task_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub incident_type: IncidentType,
    pub priority: IncidentPriority,
    pub assigned_to: Option<Uuid>,
    pub evidence: Vec<String>,
    pub created_by: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(IncidentType::default(), IncidentType::Other);
        assert_eq!(IncidentPriority::default(), IncidentPriority::Medium);
        assert_eq!(IncidentStatus::default(), IncidentStatus::Open);
    }

    #[test]
    fn test_in_progress_wire_name() {
        assert_eq!(IncidentStatus::InProgress.to_string(), "in_progress");
        assert_eq!(
            serde_json::to_value(IncidentStatus::InProgress).unwrap(),
            "in_progress"
        );
        assert_eq!(
            IncidentStatus::from("in_progress"),
            IncidentStatus::InProgress
        );
    }

    #[test]
    fn test_create_input_uses_type_key() {
        let input: CreateIncidentInput = serde_json::from_value(serde_json::json!({
            "project_id": Uuid::now_v7(),
            "title": "Scaffold missing guard rail",
            "type": "safety",
        }))
        .unwrap();

        assert_eq!(input.incident_type, Some(IncidentType::Safety));
        assert!(input.priority.is_none());
        assert!(input.evidence.is_none());
    }

    #[test]
    fn test_unknown_values_fall_back_to_defaults() {
        assert_eq!(IncidentType::from("electrical"), IncidentType::Other);
        assert_eq!(IncidentPriority::from(""), IncidentPriority::Medium);
        assert_eq!(IncidentStatus::from("reopened"), IncidentStatus::Open);
    }
}
