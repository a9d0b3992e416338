// Database-backed IncidentRepository implementation

use async_trait::async_trait;
use collab_core::{
    Incident, IncidentPriority, IncidentRepository, IncidentStatus, IncidentType, NewIncident,
    Result, UpdateIncidentInput,
};
use uuid::Uuid;

use crate::models::{CreateIncidentRow, IncidentRow, UpdateIncidentRow};
use crate::repositories::Database;
use crate::store_error;

/// Database-backed incident repository
#[derive(Clone)]
pub struct DbIncidentRepository {
    db: Database,
}

impl DbIncidentRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl From<IncidentRow> for Incident {
    fn from(row: IncidentRow) -> Self {
        Incident {
            id: row.id,
            project_id: row.project_id,
            task_id: row.task_id,
            title: row.title,
            description: row.description,
            incident_type: IncidentType::from(row.incident_type.as_str()),
            priority: IncidentPriority::from(row.priority.as_str()),
            status: IncidentStatus::from(row.status.as_str()),
            assigned_to: row.assigned_to,
            evidence: row.evidence,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl IncidentRepository for DbIncidentRepository {
    async fn create(&self, input: NewIncident) -> Result<Incident> {
        let row = self
            .db
            .create_incident(CreateIncidentRow {
                project_id: input.project_id,
                task_id: input.task_id,
                title: input.title,
                description: input.description,
                incident_type: input.incident_type.to_string(),
                priority: input.priority.to_string(),
                assigned_to: input.assigned_to,
                evidence: input.evidence,
                created_by: input.created_by,
            })
            .await
            .map_err(store_error)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Incident>> {
        let row = self.db.get_incident(id).await.map_err(store_error)?;
        Ok(row.map(Incident::from))
    }

    async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<Incident>> {
        self.find_by_projects(&[project_id]).await
    }

    async fn find_by_projects(&self, project_ids: &[Uuid]) -> Result<Vec<Incident>> {
        let rows = self
            .db
            .list_incidents_for_projects(project_ids)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Incident::from).collect())
    }

    async fn update(&self, id: Uuid, input: UpdateIncidentInput) -> Result<Option<Incident>> {
        let row = self
            .db
            .update_incident(
                id,
                UpdateIncidentRow {
                    task_id: input.task_id,
                    title: input.title,
                    description: input.description,
                    incident_type: input.incident_type.map(|t| t.to_string()),
                    priority: input.priority.map(|p| p.to_string()),
                    status: input.status.map(|s| s.to_string()),
                    assigned_to: input.assigned_to,
                    evidence: input.evidence,
                },
            )
            .await
            .map_err(store_error)?;

        Ok(row.map(Incident::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.db.delete_incident(id).await.map_err(store_error)
    }
}
