// Database-backed MembershipOracle implementation
//
// Answers membership questions from the `projects` and `project_members`
// tables. Every call hits the database; nothing is cached.

use async_trait::async_trait;
use collab_core::{MembershipOracle, Project, Result, ServiceError};
use uuid::Uuid;

use crate::models::ProjectRow;
use crate::repositories::Database;
use crate::store_error;

/// Database-backed membership oracle
#[derive(Clone)]
pub struct DbMembershipOracle {
    db: Database,
}

impl DbMembershipOracle {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl MembershipOracle for DbMembershipOracle {
    async fn get_project_by_id(&self, project_id: Uuid, caller_id: Uuid) -> Result<Project> {
        let row = self
            .db
            .get_project(project_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| ServiceError::not_found("Project", project_id))?;

        let is_member = self
            .db
            .is_project_member(project_id, caller_id)
            .await
            .map_err(store_error)?;
        if !is_member {
            tracing::debug!(
                project_id = %project_id,
                caller_id = %caller_id,
                "Caller is not a project member"
            );
            return Err(ServiceError::forbidden(format!(
                "user {} is not a member of project {}",
                caller_id, project_id
            )));
        }

        Ok(row.into())
    }

    async fn get_my_projects(&self, caller_id: Uuid) -> Result<Vec<Project>> {
        let rows = self
            .db
            .list_projects_for_user(caller_id)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Project::from).collect())
    }
}
