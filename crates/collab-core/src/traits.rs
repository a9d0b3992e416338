// Core traits for pluggable backends
//
// Services depend only on these traits, so they can run against:
// - In-memory implementations for tests and dev mode (see `memory`)
// - PostgreSQL implementations for production (collab-storage)
//
// Field naming, timestamps and id generation are the implementation's concern.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::event::{Event, NewEvent, UpdateEventInput};
use crate::incident::{Incident, NewIncident, UpdateIncidentInput};
use crate::message::{Message, NewMessage, Pagination};
use crate::project::Project;

// ============================================================================
// EventRepository
// ============================================================================

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persist a new event, stamping id and timestamps
    async fn create(&self, input: NewEvent) -> Result<Event>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>>;

    /// Events of one project, ascending by date
    async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<Event>>;

    /// Events across a set of projects in one query, ascending by date
    async fn find_by_projects(&self, project_ids: &[Uuid]) -> Result<Vec<Event>>;

    /// Merge the present fields into the stored event.
    /// Returns `None` when no event was updated.
    async fn update(&self, id: Uuid, input: UpdateEventInput) -> Result<Option<Event>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Move every `pending` event dated at or before `cutoff` to `realized`.
    /// Returns the number of events changed.
    async fn mark_events_as_realized_up_to(&self, cutoff: DateTime<Utc>) -> Result<u64>;
}

// ============================================================================
// IncidentRepository
// ============================================================================

#[async_trait]
pub trait IncidentRepository: Send + Sync {
    /// Persist a new incident with status `open`
    async fn create(&self, input: NewIncident) -> Result<Incident>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Incident>>;

    /// Incidents of one project, newest first
    async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<Incident>>;

    /// Incidents across a set of projects, newest first
    async fn find_by_projects(&self, project_ids: &[Uuid]) -> Result<Vec<Incident>>;

    async fn update(&self, id: Uuid, input: UpdateIncidentInput) -> Result<Option<Incident>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;
}

// ============================================================================
// MessageRepository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a new message, applying type/status defaults
    async fn create(&self, input: NewMessage) -> Result<Message>;

    /// One page of a chat, newest first
    async fn list_by_chat(&self, chat_id: Uuid, page: Pagination) -> Result<Vec<Message>>;

    /// Total number of messages in a chat
    async fn count_by_chat(&self, chat_id: Uuid) -> Result<u64>;
}

// ============================================================================
// MembershipOracle
// ============================================================================

/// External authority on project membership
///
/// Answers are never cached by services: each gated operation asks again.
#[async_trait]
pub trait MembershipOracle: Send + Sync {
    /// Resolve a project the caller belongs to.
    ///
    /// Fails with `NotFound` when the project does not exist and with
    /// `Forbidden` when the caller is not a member.
    async fn get_project_by_id(&self, project_id: Uuid, caller_id: Uuid) -> Result<Project>;

    /// All projects the caller currently belongs to
    async fn get_my_projects(&self, caller_id: Uuid) -> Result<Vec<Project>>;
}
