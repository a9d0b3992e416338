// Incident service for business logic
//
// Every read and write re-asks the membership oracle; nothing is cached
// between calls. Delete additionally requires the caller to be the creator.

use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Result, ServiceError};
use crate::incident::{CreateIncidentInput, Incident, NewIncident, UpdateIncidentInput};
use crate::project::{project_ids, Project};
use crate::traits::{IncidentRepository, MembershipOracle};

pub struct IncidentService {
    incidents: Arc<dyn IncidentRepository>,
    membership: Arc<dyn MembershipOracle>,
}

impl IncidentService {
    pub fn new(
        incidents: Arc<dyn IncidentRepository>,
        membership: Arc<dyn MembershipOracle>,
    ) -> Self {
        Self {
            incidents,
            membership,
        }
    }

    /// Report an incident in a project the caller belongs to.
    ///
    /// Type defaults to `other`, priority to `medium`, evidence to empty.
    pub async fn create_incident(
        &self,
        input: CreateIncidentInput,
        caller_id: Uuid,
    ) -> Result<Incident> {
        self.authorize(input.project_id, caller_id).await?;

        let payload = NewIncident {
            project_id: input.project_id,
            task_id: input.task_id,
            title: input.title,
            description: input.description,
            incident_type: input.incident_type.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            assigned_to: input.assigned_to,
            evidence: input.evidence.unwrap_or_default(),
            created_by: caller_id,
        };
        let incident = self.incidents.create(payload).await?;

        tracing::info!(
            incident_id = %incident.id,
            project_id = %incident.project_id,
            caller_id = %caller_id,
            incident_type = %incident.incident_type,
            priority = %incident.priority,
            "Incident reported"
        );
        Ok(incident)
    }

    pub async fn get_incident_by_id(&self, id: Uuid, caller_id: Uuid) -> Result<Incident> {
        let incident = self.load(id).await?;
        self.authorize(incident.project_id, caller_id).await?;
        Ok(incident)
    }

    /// Incidents of one project, newest first
    pub async fn get_incidents_by_project(
        &self,
        project_id: Uuid,
        caller_id: Uuid,
    ) -> Result<Vec<Incident>> {
        self.authorize(project_id, caller_id).await?;
        self.incidents.find_by_project(project_id).await
    }

    /// Incidents across every project the caller belongs to, newest first
    pub async fn get_incidents_for_user(&self, caller_id: Uuid) -> Result<Vec<Incident>> {
        let projects = self.membership.get_my_projects(caller_id).await?;
        self.incidents
            .find_by_projects(&project_ids(&projects))
            .await
    }

    /// Apply a partial update as any current member of the owning project.
    ///
    /// Unlike events, editing is not restricted to the creator.
    pub async fn update_incident(
        &self,
        id: Uuid,
        input: UpdateIncidentInput,
        caller_id: Uuid,
    ) -> Result<Incident> {
        let existing = self.load(id).await?;
        self.authorize(existing.project_id, caller_id).await?;

        if existing.created_by != caller_id {
            tracing::debug!(
                incident_id = %id,
                caller_id = %caller_id,
                created_by = %existing.created_by,
                "Incident edited by non-creator member"
            );
        }

        let incident = self.incidents.update(id, input).await?.ok_or_else(|| {
            ServiceError::persistence(format!("update of incident {} affected no record", id))
        })?;

        tracing::info!(
            incident_id = %id,
            caller_id = %caller_id,
            status = %incident.status,
            "Incident updated"
        );
        Ok(incident)
    }

    /// Delete an incident; only its creator may do so, membership alone is not enough
    pub async fn delete_incident(&self, id: Uuid, caller_id: Uuid) -> Result<bool> {
        let existing = self.load(id).await?;

        if existing.created_by != caller_id {
            tracing::warn!(
                incident_id = %id,
                caller_id = %caller_id,
                created_by = %existing.created_by,
                "Rejected incident delete by non-creator"
            );
            return Err(ServiceError::forbidden(format!(
                "only the creator of incident {} may delete it",
                id
            )));
        }

        let deleted = self.incidents.delete(id).await?;
        tracing::info!(incident_id = %id, caller_id = %caller_id, deleted, "Incident deleted");
        Ok(deleted)
    }

    async fn load(&self, id: Uuid) -> Result<Incident> {
        self.incidents
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Incident", id))
    }

    async fn authorize(&self, project_id: Uuid, caller_id: Uuid) -> Result<Project> {
        self.membership
            .get_project_by_id(project_id, caller_id)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    project_id = %project_id,
                    caller_id = %caller_id,
                    error = %e,
                    "Project membership check failed"
                );
            })
    }
}
