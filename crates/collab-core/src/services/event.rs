// Event service for business logic
//
// Rules enforced here:
// - New events default to `pending` and are owned by the caller
// - Only the creator may update or delete an event
// - The overdue sweep is caller-independent and idempotent

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{Result, ServiceError};
use crate::event::{CreateEventInput, Event, NewEvent, UpdateEventInput};
use crate::project::project_ids;
use crate::traits::{EventRepository, MembershipOracle};

pub struct EventService {
    events: Arc<dyn EventRepository>,
    membership: Arc<dyn MembershipOracle>,
}

impl EventService {
    pub fn new(events: Arc<dyn EventRepository>, membership: Arc<dyn MembershipOracle>) -> Self {
        Self { events, membership }
    }

    /// Create an event owned by `caller_id`.
    ///
    /// Project membership is expected to have been established by the
    /// transport layer; it is not re-checked here.
    pub async fn create_event(&self, input: CreateEventInput, caller_id: Uuid) -> Result<Event> {
        let payload = NewEvent {
            project_id: input.project_id,
            title: input.title,
            description: input.description,
            date: input.date,
            status: input.status.unwrap_or_default(),
            created_by: caller_id,
        };
        let event = self.events.create(payload).await?;

        tracing::info!(
            event_id = %event.id,
            project_id = %event.project_id,
            caller_id = %caller_id,
            "Event created"
        );
        Ok(event)
    }

    pub async fn get_event_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        self.events.find_by_id(id).await
    }

    pub async fn get_events_by_project(&self, project_id: Uuid) -> Result<Vec<Event>> {
        self.events.find_by_project(project_id).await
    }

    /// Events across every project the caller belongs to, in one batched query
    pub async fn get_events_for_user(&self, caller_id: Uuid) -> Result<Vec<Event>> {
        let projects = self.membership.get_my_projects(caller_id).await?;
        if projects.is_empty() {
            tracing::debug!(caller_id = %caller_id, "Caller has no projects, no events");
            return Ok(Vec::new());
        }

        self.events.find_by_projects(&project_ids(&projects)).await
    }

    /// Transition every pending event dated at or before `cutoff` to realized.
    ///
    /// Returns the number of events changed; zero is a normal outcome.
    pub async fn mark_due_events_as_realized(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let span = tracing::info_span!(
            "events.realize_due",
            cutoff = %cutoff,
            realized = tracing::field::Empty,
        );

        async {
            let realized = self.events.mark_events_as_realized_up_to(cutoff).await?;
            tracing::Span::current().record("realized", realized);
            if realized > 0 {
                tracing::info!(realized, "Marked due events as realized");
            }
            Ok::<u64, ServiceError>(realized)
        }
        .instrument(span)
        .await
    }

    pub async fn update_event(
        &self,
        id: Uuid,
        input: UpdateEventInput,
        caller_id: Uuid,
    ) -> Result<Event> {
        self.load_owned(id, caller_id, "update").await?;

        let event = self.events.update(id, input).await?.ok_or_else(|| {
            ServiceError::persistence(format!("update of event {} affected no record", id))
        })?;

        tracing::info!(event_id = %id, caller_id = %caller_id, "Event updated");
        Ok(event)
    }

    pub async fn delete_event(&self, id: Uuid, caller_id: Uuid) -> Result<bool> {
        self.load_owned(id, caller_id, "delete").await?;

        let deleted = self.events.delete(id).await?;
        tracing::info!(event_id = %id, caller_id = %caller_id, deleted, "Event deleted");
        Ok(deleted)
    }

    /// Fetch an event and require that `caller_id` created it
    async fn load_owned(&self, id: Uuid, caller_id: Uuid, action: &str) -> Result<Event> {
        let existing = self
            .events
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Event", id))?;

        if existing.created_by != caller_id {
            tracing::warn!(
                event_id = %id,
                caller_id = %caller_id,
                created_by = %existing.created_by,
                "Rejected event {} by non-creator",
                action
            );
            return Err(ServiceError::forbidden(format!(
                "only the creator of event {} may {} it",
                id, action
            )));
        }

        Ok(existing)
    }
}
