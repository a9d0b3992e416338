// Database-backed EventRepository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use collab_core::{Event, EventRepository, EventStatus, NewEvent, Result, UpdateEventInput};
use uuid::Uuid;

use crate::models::{CreateEventRow, EventRow, UpdateEventRow};
use crate::repositories::Database;
use crate::store_error;

// ============================================================================
// DbEventRepository
// ============================================================================

/// Database-backed event repository
#[derive(Clone)]
pub struct DbEventRepository {
    db: Database,
}

impl DbEventRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            project_id: row.project_id,
            title: row.title,
            description: row.description,
            date: row.event_date,
            status: EventStatus::from(row.status.as_str()),
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl EventRepository for DbEventRepository {
    async fn create(&self, input: NewEvent) -> Result<Event> {
        let row = self
            .db
            .create_event(CreateEventRow {
                project_id: input.project_id,
                title: input.title,
                description: input.description,
                event_date: input.date,
                status: input.status.to_string(),
                created_by: input.created_by,
            })
            .await
            .map_err(store_error)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let row = self.db.get_event(id).await.map_err(store_error)?;
        Ok(row.map(Event::from))
    }

    async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<Event>> {
        self.find_by_projects(&[project_id]).await
    }

    async fn find_by_projects(&self, project_ids: &[Uuid]) -> Result<Vec<Event>> {
        let rows = self
            .db
            .list_events_for_projects(project_ids)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn update(&self, id: Uuid, input: UpdateEventInput) -> Result<Option<Event>> {
        let row = self
            .db
            .update_event(
                id,
                UpdateEventRow {
                    title: input.title,
                    description: input.description,
                    event_date: input.date,
                    status: input.status.map(|s| s.to_string()),
                },
            )
            .await
            .map_err(store_error)?;

        Ok(row.map(Event::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.db.delete_event(id).await.map_err(store_error)
    }

    async fn mark_events_as_realized_up_to(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        self.db
            .mark_events_realized_up_to(cutoff)
            .await
            .map_err(store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_maps_to_event() {
        let now = Utc::now();
        let row = EventRow {
            id: Uuid::now_v7(),
            project_id: Uuid::now_v7(),
            title: "Pour foundation".to_string(),
            description: Some("Section B".to_string()),
            event_date: now,
            status: "realized".to_string(),
            created_by: Uuid::now_v7(),
            created_at: now,
            updated_at: now,
        };

        let event = Event::from(row.clone());
        assert_eq!(event.id, row.id);
        assert_eq!(event.date, row.event_date);
        assert_eq!(event.status, EventStatus::Realized);
        assert_eq!(event.description.as_deref(), Some("Section B"));
    }

    #[test]
    fn test_store_error_is_persistence() {
        let err = store_error(anyhow::anyhow!("connection reset"));
        assert!(err.is_persistence());
        assert!(err.to_string().contains("connection reset"));
    }
}
