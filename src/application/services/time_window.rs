use chrono::{Datelike, NaiveDateTime};

use crate::domain::models::{DayOfWeek, TimeWindows};

/// Whether `at` falls inside the enabled window for its weekday.
///
/// Bounds are compared as zero-padded `HH:MM` strings, inclusive on both ends.
/// Missing or disabled days never match, and neither does a window whose end
/// sorts before its start.
pub fn is_within_time_window(windows: &TimeWindows, at: NaiveDateTime) -> bool {
    let day = DayOfWeek::from(at.weekday());
    let Some(window) = windows.get(&day) else {
        return false;
    };
    if !window.enabled || window.end < window.start {
        return false;
    }
    let current = at.format("%H:%M").to_string();
    window.start <= current && current <= window.end
}
