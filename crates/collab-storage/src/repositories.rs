// Repository layer for database operations
//
// Raw SQL over the pool; mapping to domain types and domain errors happens
// in the *_store modules.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::*;

const EVENT_COLUMNS: &str =
    "id, project_id, title, description, event_date, status, created_by, created_at, updated_at";

const INCIDENT_COLUMNS: &str = "id, project_id, task_id, title, description, incident_type, \
     priority, status, assigned_to, evidence, created_by, created_at, updated_at";

const MESSAGE_COLUMNS: &str = "id, chat_id, sender_id, recipient_id, text, attachments, \
     message_type, status, created_at, updated_at";

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Create database connection from URL with a bounded pool
    pub async fn with_max_connections(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply embedded migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    // ============================================
    // Projects and memberships
    // ============================================

    pub async fn create_project(&self, input: CreateProjectRow) -> Result<ProjectRow> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            INSERT INTO projects (id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_project(&self, id: Uuid) -> Result<Option<ProjectRow>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, name, description, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn is_project_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM project_members
                WHERE project_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn add_project_member(&self, project_id: Uuid, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO project_members (project_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (project_id, user_id) DO NOTHING
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn remove_project_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM project_members
            WHERE project_id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_projects_for_user(&self, user_id: Uuid) -> Result<Vec<ProjectRow>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT p.id, p.name, p.description, p.created_at
            FROM projects p
            JOIN project_members m ON m.project_id = p.id
            WHERE m.user_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEventRow) -> Result<EventRow> {
        let sql = format!(
            r#"
            INSERT INTO events (id, project_id, title, description, event_date, status, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {EVENT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(Uuid::now_v7())
            .bind(input.project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.event_date)
            .bind(&input.status)
            .bind(input.created_by)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn list_events_for_projects(&self, project_ids: &[Uuid]) -> Result<Vec<EventRow>> {
        let sql = format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE project_id = ANY($1)
            ORDER BY event_date ASC, id ASC
            "#
        );
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(project_ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn update_event(&self, id: Uuid, input: UpdateEventRow) -> Result<Option<EventRow>> {
        let sql = format!(
            r#"
            UPDATE events
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                event_date = COALESCE($4, event_date),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.event_date)
            .bind(&input.status)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Single-statement sweep; rows already moved off `pending` never match
    pub async fn mark_events_realized_up_to(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET status = 'realized', updated_at = NOW()
            WHERE status = 'pending' AND event_date <= $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    // ============================================
    // Incidents
    // ============================================

    pub async fn create_incident(&self, input: CreateIncidentRow) -> Result<IncidentRow> {
        let sql = format!(
            r#"
            INSERT INTO incidents (
                id, project_id, task_id, title, description, incident_type,
                priority, assigned_to, evidence, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {INCIDENT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, IncidentRow>(&sql)
            .bind(Uuid::now_v7())
            .bind(input.project_id)
            .bind(input.task_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.incident_type)
            .bind(&input.priority)
            .bind(input.assigned_to)
            .bind(&input.evidence)
            .bind(input.created_by)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn get_incident(&self, id: Uuid) -> Result<Option<IncidentRow>> {
        let sql = format!("SELECT {INCIDENT_COLUMNS} FROM incidents WHERE id = $1");
        let row = sqlx::query_as::<_, IncidentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn list_incidents_for_projects(
        &self,
        project_ids: &[Uuid],
    ) -> Result<Vec<IncidentRow>> {
        let sql = format!(
            r#"
            SELECT {INCIDENT_COLUMNS}
            FROM incidents
            WHERE project_id = ANY($1)
            ORDER BY created_at DESC, id DESC
            "#
        );
        let rows = sqlx::query_as::<_, IncidentRow>(&sql)
            .bind(project_ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn update_incident(
        &self,
        id: Uuid,
        input: UpdateIncidentRow,
    ) -> Result<Option<IncidentRow>> {
        let sql = format!(
            r#"
            UPDATE incidents
            SET
                task_id = COALESCE($2, task_id),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                incident_type = COALESCE($5, incident_type),
                priority = COALESCE($6, priority),
                status = COALESCE($7, status),
                assigned_to = COALESCE($8, assigned_to),
                evidence = COALESCE($9, evidence),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {INCIDENT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, IncidentRow>(&sql)
            .bind(id)
            .bind(input.task_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.incident_type)
            .bind(&input.priority)
            .bind(&input.status)
            .bind(input.assigned_to)
            .bind(&input.evidence)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn delete_incident(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM incidents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Messages
    // ============================================

    pub async fn create_message(&self, input: CreateMessageRow) -> Result<MessageRow> {
        let sql = format!(
            r#"
            INSERT INTO messages (
                id, chat_id, sender_id, recipient_id, text, attachments, message_type, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {MESSAGE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(Uuid::now_v7())
            .bind(input.chat_id)
            .bind(input.sender_id)
            .bind(input.recipient_id)
            .bind(&input.text)
            .bind(&input.attachments)
            .bind(&input.message_type)
            .bind(&input.status)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn list_messages(
        &self,
        chat_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MessageRow>> {
        let sql = format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM messages
            WHERE chat_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let rows = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(chat_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn count_messages(&self, chat_id: Uuid) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages WHERE chat_id = $1")
                .bind(chat_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
