// Services layer for business logic
// Services own authorization and lifecycle rules, calling repositories through traits

pub mod event;
pub mod incident;
pub mod message;

pub use event::EventService;
pub use incident::IncidentService;
pub use message::MessageService;
