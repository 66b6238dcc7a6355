//! Wire types for the Sinergia agenda API.
//!
//! The upstream API is lenient about which fields it populates, so every
//! field defaults rather than failing the whole response. Unknown status
//! strings collapse into `Inactive` and are filtered out downstream.

use serde::{Deserialize, Serialize};

/// Upstream activity status. Anything other than `ACTIVE` is ineligible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityStatus {
    #[serde(rename = "ACTIVE")]
    Active,
    #[default]
    #[serde(other)]
    Inactive,
}

impl ActivityStatus {
    pub fn is_active(self) -> bool {
        self == ActivityStatus::Active
    }
}

/// An activity category (e.g. "Yoga") as listed by the upstream API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityType {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: ActivityStatus,
    #[serde(default)]
    pub company_id: Option<i64>,
}

/// A single class slot within an activity's weekly schedule.
///
/// `starttime`/`endtime` are wall-clock `HH:MM` strings in the gym's
/// civil timezone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub activity_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub starttime: String,
    #[serde(default)]
    pub endtime: String,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub type_reservation: String,
    #[serde(default)]
    pub status: ActivityStatus,
}
