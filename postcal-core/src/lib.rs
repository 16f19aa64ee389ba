//! Scheduling engine for postcal.
//!
//! - `date_grid`: visible days for a month or week page
//! - `event_store` / `event_index`: posts and their day lookup
//! - `session`: the create/edit/delete state machine
//! - `caption`, `image`, `clock`: seams for external collaborators

pub mod caption;
pub mod clock;
pub mod config;
pub mod date_grid;
pub mod error;
pub mod event;
pub mod event_index;
pub mod event_store;
pub mod image;
pub mod planner;
pub mod session;

pub use error::{ScheduleError, ScheduleResult, ValidationError};
pub use event::{Event, EventId};
