// In-memory implementations for tests and dev mode
//
// These keep all data in memory with the same ordering and defaulting rules
// as the PostgreSQL backend:
// - Events list ascending by date
// - Incidents and messages list newest first
// - Blank titles are rejected the way the store's CHECK constraints would

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Result, ServiceError};
use crate::event::{Event, EventStatus, NewEvent, UpdateEventInput};
use crate::incident::{Incident, IncidentStatus, NewIncident, UpdateIncidentInput};
use crate::message::{Message, NewMessage, Pagination};
use crate::project::Project;
use crate::traits::{EventRepository, IncidentRepository, MembershipOracle, MessageRepository};

fn require_title(entity: &str, title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(ServiceError::persistence(format!(
            "{} title must not be empty",
            entity
        )));
    }
    Ok(())
}

// ============================================================================
// InMemoryEventRepository
// ============================================================================

/// In-memory event repository
///
/// Events are kept in insertion order so equal dates list stably.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<Vec<Event>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed event, bypassing defaults (useful for testing)
    pub async fn seed(&self, event: Event) {
        self.events.write().await.push(event);
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, input: NewEvent) -> Result<Event> {
        require_title("Event", &input.title)?;

        let now = Utc::now();
        let event = Event {
            id: Uuid::now_v7(),
            project_id: input.project_id,
            title: input.title,
            description: input.description,
            date: input.date,
            status: input.status,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        };
        self.events.write().await.push(event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<Event>> {
        self.find_by_projects(&[project_id]).await
    }

    async fn find_by_projects(&self, project_ids: &[Uuid]) -> Result<Vec<Event>> {
        let mut result: Vec<Event> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| project_ids.contains(&e.project_id))
            .cloned()
            .collect();
        result.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(result)
    }

    async fn update(&self, id: Uuid, input: UpdateEventInput) -> Result<Option<Event>> {
        if let Some(title) = &input.title {
            require_title("Event", title)?;
        }

        let mut events = self.events.write().await;
        let Some(event) = events.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        if let Some(title) = input.title {
            event.title = title;
        }
        if let Some(description) = input.description {
            event.description = Some(description);
        }
        if let Some(date) = input.date {
            event.date = date;
        }
        if let Some(status) = input.status {
            event.status = status;
        }
        event.updated_at = Utc::now();
        Ok(Some(event.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|e| e.id != id);
        Ok(events.len() < before)
    }

    async fn mark_events_as_realized_up_to(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let now = Utc::now();
        let mut changed = 0;
        for event in self.events.write().await.iter_mut() {
            if event.is_due(cutoff) {
                event.status = EventStatus::Realized;
                event.updated_at = now;
                changed += 1;
            }
        }
        Ok(changed)
    }
}

// ============================================================================
// InMemoryIncidentRepository
// ============================================================================

/// In-memory incident repository
#[derive(Debug, Default, Clone)]
pub struct InMemoryIncidentRepository {
    incidents: Arc<RwLock<Vec<Incident>>>,
}

impl InMemoryIncidentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.incidents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.incidents.read().await.is_empty()
    }
}

#[async_trait]
impl IncidentRepository for InMemoryIncidentRepository {
    async fn create(&self, input: NewIncident) -> Result<Incident> {
        require_title("Incident", &input.title)?;

        let now = Utc::now();
        let incident = Incident {
            id: Uuid::now_v7(),
            project_id: input.project_id,
            task_id: input.task_id,
            title: input.title,
            description: input.description,
            incident_type: input.incident_type,
            priority: input.priority,
            status: IncidentStatus::Open,
            assigned_to: input.assigned_to,
            evidence: input.evidence,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        };
        self.incidents.write().await.push(incident.clone());
        Ok(incident)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Incident>> {
        Ok(self
            .incidents
            .read()
            .await
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<Incident>> {
        self.find_by_projects(&[project_id]).await
    }

    async fn find_by_projects(&self, project_ids: &[Uuid]) -> Result<Vec<Incident>> {
        // Insertion order is creation order, so reversing gives newest first
        Ok(self
            .incidents
            .read()
            .await
            .iter()
            .rev()
            .filter(|i| project_ids.contains(&i.project_id))
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, input: UpdateIncidentInput) -> Result<Option<Incident>> {
        if let Some(title) = &input.title {
            require_title("Incident", title)?;
        }

        let mut incidents = self.incidents.write().await;
        let Some(incident) = incidents.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        if let Some(task_id) = input.task_id {
            incident.task_id = Some(task_id);
        }
        if let Some(title) = input.title {
            incident.title = title;
        }
        if let Some(description) = input.description {
            incident.description = Some(description);
        }
        if let Some(incident_type) = input.incident_type {
            incident.incident_type = incident_type;
        }
        if let Some(priority) = input.priority {
            incident.priority = priority;
        }
        if let Some(status) = input.status {
            incident.status = status;
        }
        if let Some(assigned_to) = input.assigned_to {
            incident.assigned_to = Some(assigned_to);
        }
        if let Some(evidence) = input.evidence {
            incident.evidence = evidence;
        }
        incident.updated_at = Utc::now();
        Ok(Some(incident.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut incidents = self.incidents.write().await;
        let before = incidents.len();
        incidents.retain(|i| i.id != id);
        Ok(incidents.len() < before)
    }
}

// ============================================================================
// InMemoryMessageRepository
// ============================================================================

/// In-memory message repository
///
/// Stores messages per chat in insertion order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryMessageRepository {
    chats: Arc<RwLock<HashMap<Uuid, Vec<Message>>>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, input: NewMessage) -> Result<Message> {
        let now = Utc::now();
        let message = Message {
            id: Uuid::now_v7(),
            chat_id: input.chat_id,
            sender_id: input.sender_id,
            recipient_id: input.recipient_id,
            text: input.text,
            attachments: input.attachments,
            message_type: input.message_type.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.chats
            .write()
            .await
            .entry(message.chat_id)
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn list_by_chat(&self, chat_id: Uuid, page: Pagination) -> Result<Vec<Message>> {
        Ok(self
            .chats
            .read()
            .await
            .get(&chat_id)
            .map(|messages| {
                messages
                    .iter()
                    .rev()
                    .skip(page.offset as usize)
                    .take(page.limit as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count_by_chat(&self, chat_id: Uuid) -> Result<u64> {
        Ok(self
            .chats
            .read()
            .await
            .get(&chat_id)
            .map(|m| m.len() as u64)
            .unwrap_or(0))
    }
}

// ============================================================================
// InMemoryMembershipOracle
// ============================================================================

/// In-memory membership oracle
///
/// Projects and memberships are registered explicitly by the test or dev setup.
#[derive(Debug, Default, Clone)]
pub struct InMemoryMembershipOracle {
    projects: Arc<RwLock<HashMap<Uuid, Project>>>,
    members: Arc<RwLock<HashMap<Uuid, HashSet<Uuid>>>>,
}

impl InMemoryMembershipOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project
    pub async fn add_project(&self, project: Project) {
        self.projects.write().await.insert(project.id, project);
    }

    /// Add a user to a project's member set
    pub async fn add_member(&self, project_id: Uuid, user_id: Uuid) {
        self.members
            .write()
            .await
            .entry(project_id)
            .or_default()
            .insert(user_id);
    }

    /// Remove a user from a project's member set
    pub async fn remove_member(&self, project_id: Uuid, user_id: Uuid) -> bool {
        self.members
            .write()
            .await
            .get_mut(&project_id)
            .map(|members| members.remove(&user_id))
            .unwrap_or(false)
    }

    async fn is_member(&self, project_id: Uuid, user_id: Uuid) -> bool {
        self.members
            .read()
            .await
            .get(&project_id)
            .is_some_and(|members| members.contains(&user_id))
    }
}

#[async_trait]
impl MembershipOracle for InMemoryMembershipOracle {
    async fn get_project_by_id(&self, project_id: Uuid, caller_id: Uuid) -> Result<Project> {
        let project = self
            .projects
            .read()
            .await
            .get(&project_id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("Project", project_id))?;

        if !self.is_member(project_id, caller_id).await {
            return Err(ServiceError::forbidden(format!(
                "user {} is not a member of project {}",
                caller_id, project_id
            )));
        }

        Ok(project)
    }

    async fn get_my_projects(&self, caller_id: Uuid) -> Result<Vec<Project>> {
        let members = self.members.read().await;
        let projects = self.projects.read().await;
        let mut result: Vec<Project> = projects
            .values()
            .filter(|p| {
                members
                    .get(&p.id)
                    .is_some_and(|set| set.contains(&caller_id))
            })
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }
}
