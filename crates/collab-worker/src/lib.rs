// Collab worker
//
// Background process that keeps event statuses in step with the calendar:
// pending events whose date has passed are realized by a periodic bulk sweep.

pub mod config;
pub mod sweeper;

pub use config::{ConfigError, SweeperConfig};
pub use sweeper::{RealizeSweeper, SweepStats};
