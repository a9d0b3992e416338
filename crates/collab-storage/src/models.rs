// Database models (internal, may differ from domain types)
//
// Enum-valued columns are plain TEXT here; the stores convert them to the
// collab-core enums.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

// ============================================
// Projects
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateProjectRow {
    pub name: String,
    pub description: Option<String>,
}

// ============================================
// Events
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub status: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateEventRow {
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub status: String,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEventRow {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

// ============================================
// Incidents
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct IncidentRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub task_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub incident_type: String,
    pub priority: String,
    pub status: String,
    pub assigned_to: Option<Uuid>,
    pub evidence: Vec<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateIncidentRow {
    pub project_id: Uuid,
    pub task_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub incident_type: String,
    pub priority: String,
    pub assigned_to: Option<Uuid>,
    pub evidence: Vec<String>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateIncidentRow {
    pub task_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub incident_type: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub evidence: Option<Vec<String>>,
}

// ============================================
// Messages
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct MessageRow {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Option<Uuid>,
    pub text: Option<String>,
    pub attachments: sqlx::types::JsonValue,
    pub message_type: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateMessageRow {
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Option<Uuid>,
    pub text: Option<String>,
    pub attachments: sqlx::types::JsonValue,
    pub message_type: String,
    pub status: String,
}
