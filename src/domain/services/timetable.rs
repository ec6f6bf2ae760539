use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::Serialize;

use crate::domain::models::activity::Activity;
use crate::domain::models::opening_hour::OpeningHour;
use crate::domain::models::session::Session;

/// Grid granularity in minutes. Activity durations are converted to a slot
/// count by rounding up against this.
pub const SLOT_MINUTES: i64 = 60;

/// The canonical time slots the grid recognizes. A session row can only
/// exist at one of these start times.
pub const SLOT_TIMES: [&str; 13] = [
    "08:00", "09:00", "10:00", "11:00", "12:00", "13:00", "14:00",
    "15:00", "16:00", "17:00", "18:00", "19:00", "20:00",
];

pub const DAY_CODES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub fn slot_index(start_time: &str) -> Option<usize> {
    SLOT_TIMES.iter().position(|t| *t == start_time)
}

pub fn day_index(day: &str) -> Option<usize> {
    DAY_CODES.iter().position(|d| *d == day)
}

pub fn day_code_for(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Number of consecutive slots an activity occupies, rounding up partial
/// slots.
pub fn slots_needed(duration_min: i32) -> usize {
    let d = duration_min as i64;
    let q = d / SLOT_MINUTES;
    let r = d % SLOT_MINUTES;
    (if r > 0 { q + 1 } else { q }) as usize
}

/// The run of `k` consecutive slot times starting at `start_time`, or None
/// when the run would walk off the end of the enumeration.
pub fn slot_run(start_time: &str, k: usize) -> Option<Vec<String>> {
    let start = slot_index(start_time)?;
    if start + k > SLOT_TIMES.len() {
        return None;
    }
    Some(SLOT_TIMES[start..start + k].iter().map(|s| s.to_string()).collect())
}

fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// True when the whole hour starting at `start_time` fits inside one of the
/// day's opening windows.
pub fn within_opening_hours(windows: &[OpeningHour], day: &str, start_time: &str) -> bool {
    let Some(slot_start) = parse_clock(start_time) else {
        return false;
    };
    let slot_end = slot_start + chrono::Duration::minutes(SLOT_MINUTES);

    windows.iter().any(|w| {
        if w.day != day {
            return false;
        }
        match (parse_clock(&w.open_time), parse_clock(&w.close_time)) {
            (Some(open), Some(close)) => open <= slot_start && slot_end <= close,
            _ => false,
        }
    })
}

/// All (day, slot) pairs the venue's opening hours admit. This is the set of
/// session rows the grid generator keeps populated.
pub fn admissible_slots(windows: &[OpeningHour]) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for day in DAY_CODES {
        for slot in SLOT_TIMES {
            if within_opening_hours(windows, day, slot) {
                out.push((day.to_string(), slot.to_string()));
            }
        }
    }
    out
}

#[derive(Debug, Serialize, Clone)]
pub struct GridCell {
    pub start_time: String,
    pub session_id: Option<String>,
    pub activity_id: Option<String>,
    pub activity_name: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct GridDay {
    pub day: String,
    pub slots: Vec<GridCell>,
}

/// Materializes the full timetable. Total over the canonical enumeration:
/// every (day, slot) pair gets a cell, assigned or not, whether or not a
/// session row exists for it.
pub fn render_grid(
    sessions: &[Session],
    activities: &[Activity],
    day_filter: Option<&str>,
) -> Vec<GridDay> {
    let by_slot: HashMap<(&str, &str), &Session> = sessions
        .iter()
        .map(|s| ((s.day.as_str(), s.start_time.as_str()), s))
        .collect();
    let activity_names: HashMap<&str, &str> = activities
        .iter()
        .map(|a| (a.id.as_str(), a.name.as_str()))
        .collect();

    DAY_CODES
        .iter()
        .filter(|d| day_filter.is_none_or(|f| f == **d))
        .map(|day| GridDay {
            day: day.to_string(),
            slots: SLOT_TIMES
                .iter()
                .map(|slot| {
                    let session = by_slot.get(&(*day, *slot));
                    let activity_id = session.and_then(|s| s.activity_id.clone());
                    let activity_name = activity_id
                        .as_deref()
                        .and_then(|id| activity_names.get(id))
                        .map(|n| n.to_string());
                    GridCell {
                        start_time: slot.to_string(),
                        session_id: session.map(|s| s.id.clone()),
                        activity_id,
                        activity_name,
                    }
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(day: &str, open: &str, close: &str) -> OpeningHour {
        OpeningHour::new(day.to_string(), open.to_string(), close.to_string())
    }

    #[test]
    fn slots_needed_rounds_up() {
        assert_eq!(slots_needed(60), 1);
        assert_eq!(slots_needed(90), 2);
        assert_eq!(slots_needed(120), 2);
        assert_eq!(slots_needed(121), 3);
    }

    #[test]
    fn slot_run_rejects_overhang() {
        assert_eq!(slot_run("19:00", 2), Some(vec!["19:00".to_string(), "20:00".to_string()]));
        assert!(slot_run("20:00", 2).is_none());
        assert!(slot_run("21:00", 1).is_none());
    }

    #[test]
    fn opening_hours_require_whole_hour() {
        let windows = vec![window("Mon", "09:00", "17:00")];
        assert!(within_opening_hours(&windows, "Mon", "09:00"));
        assert!(within_opening_hours(&windows, "Mon", "16:00"));
        // 17:00 session would run past close
        assert!(!within_opening_hours(&windows, "Mon", "17:00"));
        assert!(!within_opening_hours(&windows, "Tue", "09:00"));
    }

    #[test]
    fn admissible_slots_honour_multiple_windows() {
        let windows = vec![window("Sat", "08:00", "10:00"), window("Sat", "14:00", "16:00")];
        let slots = admissible_slots(&windows);
        let times: Vec<&str> = slots.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(times, vec!["08:00", "09:00", "14:00", "15:00"]);
    }

    #[test]
    fn grid_is_total_even_when_empty() {
        let grid = render_grid(&[], &[], None);
        assert_eq!(grid.len(), DAY_CODES.len());
        for day in &grid {
            assert_eq!(day.slots.len(), SLOT_TIMES.len());
            assert!(day.slots.iter().all(|c| c.session_id.is_none()));
        }
    }

    #[test]
    fn grid_fills_assigned_cells() {
        let activity = Activity::new("Aqua Fit".to_string(), String::new(), 10, 500, 60);
        let mut session = Session::empty("Wed".to_string(), "10:00".to_string());
        session.activity_id = Some(activity.id.clone());

        let grid = render_grid(&[session.clone()], &[activity], Some("Wed"));
        assert_eq!(grid.len(), 1);
        let cell = grid[0].slots.iter().find(|c| c.start_time == "10:00").unwrap();
        assert_eq!(cell.session_id.as_deref(), Some(session.id.as_str()));
        assert_eq!(cell.activity_name.as_deref(), Some("Aqua Fit"));
    }
}
