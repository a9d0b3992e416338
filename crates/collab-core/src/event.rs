// Event domain types
//
// An Event is a scheduled occurrence tied to a project. Only its creator may
// mutate or delete it; the bulk sweep moves overdue pending events to realized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Event status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Pending,
    Realized,
    Cancelled,
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Pending => write!(f, "pending"),
            EventStatus::Realized => write!(f, "realized"),
            EventStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl From<&str> for EventStatus {
    fn from(s: &str) -> Self {
        match s {
            "realized" => EventStatus::Realized,
            "cancelled" => EventStatus::Cancelled,
            _ => EventStatus::Pending,
        }
    }
}

/// Event - scheduled occurrence within a project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Event {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub status: EventStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Whether the sweep would transition this event at `cutoff`
    pub fn is_due(&self, cutoff: DateTime<Utc>) -> bool {
        self.status == EventStatus::Pending && self.date <= cutoff
    }
}

/// Caller-supplied input for creating an event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateEventInput {
    pub project_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    /// Defaults to `pending` when omitted
    #[serde(default)]
    pub status: Option<EventStatus>,
}

/// Partial update for an event; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateEventInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<EventStatus>,
}

/// Creation payload handed to the repository
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub status: EventStatus,
    pub created_by: Uuid,
}
