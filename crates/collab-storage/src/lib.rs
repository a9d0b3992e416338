// Postgres storage layer with sqlx
//
// This crate provides database implementations for core traits:
// - DbEventRepository: implements EventRepository
// - DbIncidentRepository: implements IncidentRepository
// - DbMessageRepository: implements MessageRepository
// - DbMembershipOracle: implements MembershipOracle over projects/project_members

pub mod event_store;
pub mod incident_store;
pub mod membership;
pub mod message_store;
pub mod models;
pub mod repositories;

pub use event_store::DbEventRepository;
pub use incident_store::DbIncidentRepository;
pub use membership::DbMembershipOracle;
pub use message_store::DbMessageRepository;
pub use models::*;
pub use repositories::Database;

use collab_core::ServiceError;

/// Store failures surface to services as persistence errors
pub(crate) fn store_error(e: anyhow::Error) -> ServiceError {
    ServiceError::persistence(e.to_string())
}
