// Collaboration Core
//
// This crate holds the authorization and lifecycle rules for the three
// record kinds of a project-collaboration backend: events, incidents and
// chat messages.
//
// Key design decisions:
// - Services depend on repository traits (EventRepository, IncidentRepository,
//   MessageRepository) and on a MembershipOracle; no storage details leak in
// - Caller identity is an explicit argument to every gated operation
// - Membership is re-checked on every incident access, never cached
// - In-memory implementations of every trait ship with the crate for tests and dev mode

// Domain entity types
pub mod event;
pub mod incident;
pub mod message;
pub mod project;

pub mod error;
pub mod services;
pub mod traits;

// In-memory implementations for tests and dev mode
pub mod memory;

// Re-exports for convenience
pub use error::{Result, ServiceError};
pub use event::{CreateEventInput, Event, EventStatus, NewEvent, UpdateEventInput};
pub use incident::{
    CreateIncidentInput, Incident, IncidentPriority, IncidentStatus, IncidentType, NewIncident,
    UpdateIncidentInput,
};
pub use message::{
    Attachment, DeliveryStatus, Message, MessagePage, MessageType, NewMessage, Pagination,
    DEFAULT_PAGE_LIMIT,
};
pub use project::Project;
pub use services::{EventService, IncidentService, MessageService};
pub use traits::{EventRepository, IncidentRepository, MembershipOracle, MessageRepository};
