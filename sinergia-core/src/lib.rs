//! Core types for the sinergia-cal service.
//!
//! This crate provides what both the upstream client and the HTTP server
//! share:
//! - `ActivityType` and `ScheduleEvent` wire types
//! - schedule merging across activities
//! - iCalendar feed generation

pub mod activity;
pub mod error;
pub mod ics;
pub mod schedule;

// Re-export the common types at crate root for convenience
pub use activity::{ActivityStatus, ActivityType, ScheduleEvent};
pub use error::{SinergiaError, SinergiaResult};
pub use schedule::{ScheduleMap, merge_schedules};
