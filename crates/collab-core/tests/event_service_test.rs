// Integration tests for EventService
//
// These run the service against the in-memory backend and verify
// creator-only mutation, batched per-user listing and the overdue sweep.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use collab_core::memory::{InMemoryEventRepository, InMemoryMembershipOracle};
use collab_core::{
    CreateEventInput, Event, EventRepository, EventService, EventStatus, NewEvent, Project,
    Result, UpdateEventInput,
};
use std::sync::Arc;
use uuid::Uuid;

struct Fixture {
    service: EventService,
    repo: InMemoryEventRepository,
    oracle: InMemoryMembershipOracle,
}

fn fixture() -> Fixture {
    let repo = InMemoryEventRepository::new();
    let oracle = InMemoryMembershipOracle::new();
    let service = EventService::new(Arc::new(repo.clone()), Arc::new(oracle.clone()));
    Fixture {
        service,
        repo,
        oracle,
    }
}

fn input(project_id: Uuid, title: &str, date: DateTime<Utc>) -> CreateEventInput {
    CreateEventInput {
        project_id,
        title: title.to_string(),
        description: None,
        date,
        status: None,
    }
}

// =============================================================================
// Creation and lookup
// =============================================================================

#[tokio::test]
async fn test_create_event_defaults_to_pending_and_stamps_creator() {
    let fx = fixture();
    let caller = Uuid::now_v7();
    let project_id = Uuid::now_v7();

    let event = fx
        .service
        .create_event(input(project_id, "Site visit", Utc::now()), caller)
        .await
        .unwrap();

    assert_eq!(event.status, EventStatus::Pending);
    assert_eq!(event.created_by, caller);
    assert_eq!(event.project_id, project_id);
}

#[tokio::test]
async fn test_create_event_keeps_explicit_status() {
    let fx = fixture();
    let mut req = input(Uuid::now_v7(), "Cancelled review", Utc::now());
    req.status = Some(EventStatus::Cancelled);

    let event = fx.service.create_event(req, Uuid::now_v7()).await.unwrap();
    assert_eq!(event.status, EventStatus::Cancelled);
}

#[tokio::test]
async fn test_create_event_with_blank_title_fails_in_store() {
    let fx = fixture();
    let err = fx
        .service
        .create_event(input(Uuid::now_v7(), "", Utc::now()), Uuid::now_v7())
        .await
        .unwrap_err();

    assert!(err.is_persistence());
}

#[tokio::test]
async fn test_get_event_by_id_absent_is_none() {
    let fx = fixture();
    let found = fx.service.get_event_by_id(Uuid::now_v7()).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_get_events_by_project_ascending_by_date() {
    let fx = fixture();
    let caller = Uuid::now_v7();
    let project_id = Uuid::now_v7();
    let now = Utc::now();

    for (title, offset) in [("third", 3), ("first", 1), ("second", 2)] {
        fx.service
            .create_event(input(project_id, title, now + Duration::days(offset)), caller)
            .await
            .unwrap();
    }

    let events = fx.service.get_events_by_project(project_id).await.unwrap();
    let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
}

// =============================================================================
// Per-user listing
// =============================================================================

#[tokio::test]
async fn test_get_events_for_user_without_projects_is_empty() {
    let fx = fixture();
    fx.service
        .create_event(input(Uuid::now_v7(), "Elsewhere", Utc::now()), Uuid::now_v7())
        .await
        .unwrap();

    let events = fx.service.get_events_for_user(Uuid::now_v7()).await.unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_get_events_for_user_spans_member_projects_only() {
    let fx = fixture();
    let user = Uuid::now_v7();
    let alpha = Project::new("Alpha");
    let beta = Project::new("Beta");
    let gamma = Project::new("Gamma");
    for project in [&alpha, &beta, &gamma] {
        fx.oracle.add_project(project.clone()).await;
    }
    fx.oracle.add_member(alpha.id, user).await;
    fx.oracle.add_member(beta.id, user).await;

    let now = Utc::now();
    let author = Uuid::now_v7();
    fx.service
        .create_event(input(beta.id, "beta standup", now + Duration::hours(2)), author)
        .await
        .unwrap();
    fx.service
        .create_event(input(alpha.id, "alpha standup", now + Duration::hours(1)), author)
        .await
        .unwrap();
    fx.service
        .create_event(input(gamma.id, "gamma standup", now), author)
        .await
        .unwrap();

    let events = fx.service.get_events_for_user(user).await.unwrap();
    let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["alpha standup", "beta standup"]);
}

// =============================================================================
// Creator-only mutation
// =============================================================================

#[tokio::test]
async fn test_creator_can_update_event() {
    let fx = fixture();
    let creator = Uuid::now_v7();
    let event = fx
        .service
        .create_event(input(Uuid::now_v7(), "Draft", Utc::now()), creator)
        .await
        .unwrap();

    let new_date = Utc::now() + Duration::days(7);
    let updated = fx
        .service
        .update_event(
            event.id,
            UpdateEventInput {
                title: Some("Final".to_string()),
                date: Some(new_date),
                status: Some(EventStatus::Cancelled),
                ..Default::default()
            },
            creator,
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Final");
    assert_eq!(updated.date, new_date);
    assert_eq!(updated.status, EventStatus::Cancelled);
    assert_eq!(updated.created_by, creator);
    assert!(updated.updated_at >= event.updated_at);
}

#[tokio::test]
async fn test_partial_update_leaves_absent_fields() {
    let fx = fixture();
    let creator = Uuid::now_v7();
    let mut req = input(Uuid::now_v7(), "Audit", Utc::now());
    req.description = Some("Quarterly".to_string());
    let event = fx.service.create_event(req, creator).await.unwrap();

    let updated = fx
        .service
        .update_event(
            event.id,
            UpdateEventInput {
                title: Some("Audit (moved)".to_string()),
                ..Default::default()
            },
            creator,
        )
        .await
        .unwrap();

    assert_eq!(updated.description.as_deref(), Some("Quarterly"));
    assert_eq!(updated.date, event.date);
    assert_eq!(updated.status, event.status);
}

#[tokio::test]
async fn test_non_creator_update_is_forbidden() {
    let fx = fixture();
    let creator = Uuid::now_v7();
    let event = fx
        .service
        .create_event(input(Uuid::now_v7(), "Owned", Utc::now()), creator)
        .await
        .unwrap();

    let err = fx
        .service
        .update_event(
            event.id,
            UpdateEventInput {
                title: Some("Hijacked".to_string()),
                ..Default::default()
            },
            Uuid::now_v7(),
        )
        .await
        .unwrap_err();
    assert!(err.is_forbidden());

    let stored = fx.service.get_event_by_id(event.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Owned");
}

#[tokio::test]
async fn test_update_missing_event_is_not_found() {
    let fx = fixture();
    let err = fx
        .service
        .update_event(Uuid::now_v7(), UpdateEventInput::default(), Uuid::now_v7())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_event_creator_only() {
    let fx = fixture();
    let creator = Uuid::now_v7();
    let event = fx
        .service
        .create_event(input(Uuid::now_v7(), "Temporary", Utc::now()), creator)
        .await
        .unwrap();

    let err = fx
        .service
        .delete_event(event.id, Uuid::now_v7())
        .await
        .unwrap_err();
    assert!(err.is_forbidden());

    assert!(fx.service.delete_event(event.id, creator).await.unwrap());
    assert!(fx.repo.is_empty().await);

    let err = fx
        .service
        .delete_event(event.id, creator)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// =============================================================================
// Overdue sweep
// =============================================================================

async fn seed(repo: &InMemoryEventRepository, date: DateTime<Utc>, status: EventStatus) -> Uuid {
    let now = Utc::now();
    let event = Event {
        id: Uuid::now_v7(),
        project_id: Uuid::now_v7(),
        title: "seeded".to_string(),
        description: None,
        date,
        status,
        created_by: Uuid::now_v7(),
        created_at: now,
        updated_at: now,
    };
    let id = event.id;
    repo.seed(event).await;
    id
}

async fn status_of(service: &EventService, id: Uuid) -> EventStatus {
    service.get_event_by_id(id).await.unwrap().unwrap().status
}

#[tokio::test]
async fn test_sweep_realizes_only_due_pending_events() {
    let fx = fixture();
    let cutoff = Utc::now();

    let overdue = seed(&fx.repo, cutoff - Duration::hours(1), EventStatus::Pending).await;
    let exactly_due = seed(&fx.repo, cutoff, EventStatus::Pending).await;
    let future = seed(&fx.repo, cutoff + Duration::hours(1), EventStatus::Pending).await;
    let cancelled = seed(&fx.repo, cutoff - Duration::hours(1), EventStatus::Cancelled).await;

    let changed = fx.service.mark_due_events_as_realized(cutoff).await.unwrap();
    assert_eq!(changed, 2);

    assert_eq!(status_of(&fx.service, overdue).await, EventStatus::Realized);
    assert_eq!(status_of(&fx.service, exactly_due).await, EventStatus::Realized);
    assert_eq!(status_of(&fx.service, future).await, EventStatus::Pending);
    assert_eq!(status_of(&fx.service, cancelled).await, EventStatus::Cancelled);
}

#[tokio::test]
async fn test_sweep_is_idempotent() {
    let fx = fixture();
    let cutoff = Utc::now();
    seed(&fx.repo, cutoff - Duration::days(1), EventStatus::Pending).await;
    seed(&fx.repo, cutoff - Duration::days(2), EventStatus::Pending).await;

    assert_eq!(fx.service.mark_due_events_as_realized(cutoff).await.unwrap(), 2);
    assert_eq!(fx.service.mark_due_events_as_realized(cutoff).await.unwrap(), 0);
}

// =============================================================================
// Store inconsistency
// =============================================================================

/// Repository whose updates never land, as if the record vanished mid-request
struct VanishingEventRepository {
    inner: InMemoryEventRepository,
}

#[async_trait]
impl EventRepository for VanishingEventRepository {
    async fn create(&self, input: NewEvent) -> Result<Event> {
        self.inner.create(input).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<Event>> {
        self.inner.find_by_project(project_id).await
    }

    async fn find_by_projects(&self, project_ids: &[Uuid]) -> Result<Vec<Event>> {
        self.inner.find_by_projects(project_ids).await
    }

    async fn update(&self, _id: Uuid, _input: UpdateEventInput) -> Result<Option<Event>> {
        Ok(None)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.inner.delete(id).await
    }

    async fn mark_events_as_realized_up_to(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        self.inner.mark_events_as_realized_up_to(cutoff).await
    }
}

#[tokio::test]
async fn test_update_with_no_effect_is_persistence_error() {
    let repo = Arc::new(VanishingEventRepository {
        inner: InMemoryEventRepository::new(),
    });
    let service = EventService::new(repo, Arc::new(InMemoryMembershipOracle::new()));
    let creator = Uuid::now_v7();
    let event = service
        .create_event(input(Uuid::now_v7(), "Ghost", Utc::now()), creator)
        .await
        .unwrap();

    let err = service
        .update_event(event.id, UpdateEventInput::default(), creator)
        .await
        .unwrap_err();
    assert!(err.is_persistence());
}
