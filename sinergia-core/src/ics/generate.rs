//! ICS feed generation.
//!
//! Renders a merged weekly schedule into an iCalendar document. Each active
//! class becomes a VEVENT anchored on the next calendar occurrence of its
//! weekday, repeating weekly.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use icalendar::{Calendar, Component, EventLike, Property};

use crate::activity::ScheduleEvent;
use crate::schedule::ScheduleMap;

/// Product identifier stamped on every generated calendar.
const PRODID: &str = "-//Sinergia Life//Calendar//EN";

/// Civil timezone label advertised to calendar clients. Event times are
/// wall-clock values reinterpreted as UTC, never converted.
const CALENDAR_TIMEZONE: &str = "America/Montevideo";

/// Domain suffix for event UIDs.
const UID_DOMAIN: &str = "sinergia.life.uy";

/// Every class repeats weekly, bounded to a year of occurrences.
const WEEKLY_RRULE: &str = "FREQ=WEEKLY;COUNT=52";

/// Spanish weekday names mapped to days-from-Sunday indices, in emission
/// order. Day keys outside this table are ignored.
const WEEKDAYS: [(&str, u32); 7] = [
    ("Domingo", 0),
    ("Lunes", 1),
    ("Martes", 2),
    ("Miercoles", 3),
    ("Jueves", 4),
    ("Viernes", 5),
    ("Sabado", 6),
];

/// Generate the iCalendar document for a merged schedule.
///
/// `now` is captured once by the caller and threaded through so repeated
/// renders of the same schedule are byte-identical.
pub fn generate_calendar(schedule: &ScheduleMap, calendar_name: &str, now: NaiveDateTime) -> String {
    let mut cal = Calendar::new();
    cal.append_property(Property::new("METHOD", "PUBLISH"));
    cal.append_property(Property::new("X-WR-CALNAME", calendar_name));
    cal.append_property(Property::new("X-WR-TIMEZONE", CALENDAR_TIMEZONE));

    let stamp = format_timestamp(now);

    for (day_name, target_weekday) in WEEKDAYS {
        let Some(events) = schedule.get(day_name) else {
            continue;
        };
        let date = next_occurrence(now.date(), target_weekday);

        for event in events {
            if !event.status.is_active() {
                continue;
            }
            cal.push(build_vevent(event, date, &stamp));
        }
    }

    let cal = cal.done();
    rewrite_prodid(&cal.to_string())
}

/// Build one VEVENT for a class on its next occurrence date.
fn build_vevent(event: &ScheduleEvent, date: NaiveDate, stamp: &str) -> icalendar::Event {
    let start = date.and_time(parse_wall_time(&event.starttime));
    let end = date.and_time(parse_wall_time(&event.endtime));
    let uid = format!("{}-{}@{}", event.id, event.activity_id, UID_DOMAIN);

    let mut vevent = icalendar::Event::new();
    vevent.uid(&uid);
    vevent.summary(&event.name);

    // An explicit DTSTAMP keeps the output deterministic; the icalendar
    // crate would otherwise stamp serialization time.
    vevent.add_property("DTSTAMP", stamp);
    vevent.add_property("DTSTART", format_timestamp(start));
    vevent.add_property("DTEND", format_timestamp(end));

    vevent.location(&event.location);
    vevent.description(&format!(
        "{}\nDuration: {} minutes\nGender: {}\nType: {}",
        event.name, event.duration, event.gender, event.type_reservation
    ));

    vevent.add_property("RRULE", WEEKLY_RRULE);
    vevent.add_property("CREATED", stamp);
    vevent.add_property("LAST-MODIFIED", stamp);
    vevent.add_property("STATUS", "CONFIRMED");
    vevent.add_property("TRANSP", "OPAQUE");

    vevent.done()
}

/// Date of the next occurrence of `target` (days from Sunday) on or after
/// `today`. A zero delta keeps today's date even when the class start time
/// has already passed; the weekly rule covers the following weeks.
fn next_occurrence(today: NaiveDate, target: u32) -> NaiveDate {
    let delta = (target + 7 - today.weekday().num_days_from_sunday()) % 7;
    today + Duration::days(i64::from(delta))
}

/// Parse an `HH:MM` wall-clock string. Missing or unparsable parts fall
/// back to midnight.
fn parse_wall_time(raw: &str) -> NaiveTime {
    let mut parts = raw.split(':');
    let hour = parts.next().and_then(|p| p.trim().parse().ok()).unwrap_or(0);
    let minute = parts.next().and_then(|p| p.trim().parse().ok()).unwrap_or(0);
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// Compact UTC basic format (`YYYYMMDDTHHMMSSZ`).
fn format_timestamp(dt: NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Replace the icalendar crate's default PRODID with ours.
fn rewrite_prodid(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODID);
        } else {
            result.push_str(line);
        }
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityStatus;

    // 2025-03-19 is a Wednesday.
    fn wednesday_noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 19)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn yoga() -> ScheduleEvent {
        ScheduleEvent {
            id: 7,
            activity_id: 3,
            name: "Yoga".to_string(),
            location: "Sala A".to_string(),
            starttime: "18:00".to_string(),
            endtime: "19:00".to_string(),
            duration: 60,
            gender: "M/F".to_string(),
            type_reservation: "Class".to_string(),
            status: ActivityStatus::Active,
        }
    }

    fn schedule(day: &str, events: Vec<ScheduleEvent>) -> ScheduleMap {
        let mut map = ScheduleMap::new();
        map.insert(day.to_string(), events);
        map
    }

    fn vevent_count(ics: &str) -> usize {
        ics.lines().filter(|l| *l == "BEGIN:VEVENT").count()
    }

    #[test]
    fn monday_class_rendered_from_a_wednesday_lands_on_next_monday() {
        let ics = generate_calendar(&schedule("Lunes", vec![yoga()]), "Test", wednesday_noon());

        assert!(ics.contains("UID:7-3@sinergia.life.uy"), "ICS:\n{}", ics);
        assert!(ics.contains("DTSTART:20250324T180000Z"), "ICS:\n{}", ics);
        assert!(ics.contains("DTEND:20250324T190000Z"), "ICS:\n{}", ics);
        assert!(ics.contains("SUMMARY:Yoga"));
        assert!(ics.contains("LOCATION:Sala A"));
    }

    #[test]
    fn header_carries_calendar_metadata() {
        let ics = generate_calendar(&ScheduleMap::new(), "Mi agenda", wednesday_noon());

        assert!(ics.contains("VERSION:2.0"));
        assert!(ics.contains("PRODID:-//Sinergia Life//Calendar//EN"));
        assert!(ics.contains("CALSCALE:GREGORIAN"));
        assert!(ics.contains("METHOD:PUBLISH"));
        assert!(ics.contains("X-WR-CALNAME:Mi agenda"));
        assert!(ics.contains("X-WR-TIMEZONE:America/Montevideo"));
        assert!(ics.starts_with("BEGIN:VCALENDAR"));
        assert!(ics.trim_end().ends_with("END:VCALENDAR"));
    }

    #[test]
    fn every_vevent_repeats_weekly_for_52_occurrences() {
        let mut event_b = yoga();
        event_b.id = 8;
        let ics = generate_calendar(
            &schedule("Jueves", vec![yoga(), event_b]),
            "Test",
            wednesday_noon(),
        );

        let rrules = ics
            .lines()
            .filter(|l| l.starts_with("RRULE:"))
            .collect::<Vec<_>>();
        assert_eq!(rrules.len(), 2);
        assert!(rrules.iter().all(|l| *l == "RRULE:FREQ=WEEKLY;COUNT=52"));
    }

    #[test]
    fn inactive_events_are_skipped() {
        let mut cancelled = yoga();
        cancelled.status = ActivityStatus::Inactive;
        let ics = generate_calendar(&schedule("Lunes", vec![cancelled]), "Test", wednesday_noon());

        assert_eq!(vevent_count(&ics), 0);
    }

    #[test]
    fn unrecognized_day_names_are_skipped() {
        let ics = generate_calendar(&schedule("Feriados", vec![yoga()]), "Test", wednesday_noon());

        assert_eq!(vevent_count(&ics), 0);
    }

    #[test]
    fn class_later_today_and_class_earlier_today_both_stay_on_today() {
        let mut early = yoga();
        early.starttime = "06:00".to_string();
        early.endtime = "07:00".to_string();
        let ics = generate_calendar(
            &schedule("Miercoles", vec![early, yoga()]),
            "Test",
            wednesday_noon(),
        );

        assert!(ics.contains("DTSTART:20250319T060000Z"), "ICS:\n{}", ics);
        assert!(ics.contains("DTSTART:20250319T180000Z"), "ICS:\n{}", ics);
    }

    #[test]
    fn missing_or_malformed_times_default_to_midnight() {
        let mut event = yoga();
        event.starttime = String::new();
        event.endtime = "late".to_string();
        let ics = generate_calendar(&schedule("Lunes", vec![event]), "Test", wednesday_noon());

        assert!(ics.contains("DTSTART:20250324T000000Z"), "ICS:\n{}", ics);
        assert!(ics.contains("DTEND:20250324T000000Z"), "ICS:\n{}", ics);
    }

    #[test]
    fn description_embeds_class_details() {
        let ics = generate_calendar(&schedule("Lunes", vec![yoga()]), "Test", wednesday_noon());

        assert!(ics.contains("Duration: 60 minutes"), "ICS:\n{}", ics);
        assert!(ics.contains("Gender: M/F"));
        assert!(ics.contains("Type: Class"));
    }

    #[test]
    fn created_and_modified_use_the_render_instant() {
        let ics = generate_calendar(&schedule("Lunes", vec![yoga()]), "Test", wednesday_noon());

        assert!(ics.contains("CREATED:20250319T120000Z"));
        assert!(ics.contains("LAST-MODIFIED:20250319T120000Z"));
        assert!(ics.contains("STATUS:CONFIRMED"));
        assert!(ics.contains("TRANSP:OPAQUE"));
    }

    #[test]
    fn repeated_render_with_frozen_now_is_byte_identical() {
        let schedule = schedule("Viernes", vec![yoga()]);
        let first = generate_calendar(&schedule, "Test", wednesday_noon());
        let second = generate_calendar(&schedule, "Test", wednesday_noon());

        assert_eq!(first, second);
    }

    #[test]
    fn next_occurrence_wraps_forward_and_keeps_same_day() {
        let wednesday = NaiveDate::from_ymd_opt(2025, 3, 19).unwrap();

        // Monday is five days ahead of a Wednesday
        assert_eq!(
            next_occurrence(wednesday, 1),
            NaiveDate::from_ymd_opt(2025, 3, 24).unwrap()
        );
        // The same weekday resolves to today, never next week
        assert_eq!(next_occurrence(wednesday, 3), wednesday);
        // Sunday wraps past the weekend
        assert_eq!(
            next_occurrence(wednesday, 0),
            NaiveDate::from_ymd_opt(2025, 3, 23).unwrap()
        );
    }

    #[test]
    fn wall_time_parsing_is_permissive() {
        assert_eq!(parse_wall_time("18:30"), NaiveTime::from_hms_opt(18, 30, 0).unwrap());
        assert_eq!(parse_wall_time("7"), NaiveTime::from_hms_opt(7, 0, 0).unwrap());
        assert_eq!(parse_wall_time(""), NaiveTime::default());
        assert_eq!(parse_wall_time("25:99"), NaiveTime::default());
    }
}
