//! ICS feed generation.
//!
//! This module renders a merged weekly schedule into an iCalendar document
//! in the style of RFC 5545.

mod generate;

pub use generate::generate_calendar;
