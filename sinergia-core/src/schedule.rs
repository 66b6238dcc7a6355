//! Merging of per-activity weekly schedules.

use std::collections::HashMap;

use crate::activity::ScheduleEvent;

/// A weekly schedule: Spanish weekday name ("Lunes" .. "Domingo") to the
/// classes held on that day.
pub type ScheduleMap = HashMap<String, Vec<ScheduleEvent>>;

/// Merge several activity schedules into one.
///
/// Per day, events are concatenated in input order; days with no events in
/// any input stay absent. Overlapping activities are not deduplicated.
pub fn merge_schedules<I>(schedules: I) -> ScheduleMap
where
    I: IntoIterator<Item = ScheduleMap>,
{
    let mut merged = ScheduleMap::new();

    for schedule in schedules {
        for (day, events) in schedule {
            if events.is_empty() {
                continue;
            }
            merged.entry(day).or_default().extend(events);
        }
    }

    merged
}
