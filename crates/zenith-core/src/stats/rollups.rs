//! Rollups over focus sessions and launch logs.

use chrono::{Datelike, Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::model::{AppLaunchLog, FocusSession};

/// Number of days in the weekly chart.
pub const WEEK_DAYS: u64 = 7;
/// Default number of apps in `top_apps`.
pub const DEFAULT_TOP_APPS: usize = 3;

/// Completed minutes for one local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    /// Short weekday name, e.g. `Mon`.
    pub label: String,
    pub minutes: u32,
}

/// Launch count for one app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCount {
    pub name: String,
    pub count: usize,
}

/// Percentage of sessions completed, rounded half up. 0 for no sessions.
pub fn completion_rate(sessions: &[FocusSession]) -> u32 {
    if sessions.is_empty() {
        return 0;
    }
    let completed = sessions.iter().filter(|s| s.completed).count();
    (completed as f64 * 100.0 / sessions.len() as f64).round() as u32
}

/// Minutes of completed sessions per local day, for the seven days ending
/// `today` inclusive, oldest first.
pub fn weekly_minutes<Tz: TimeZone>(
    sessions: &[FocusSession],
    today: NaiveDate,
    tz: &Tz,
) -> Vec<DayBucket> {
    (0..WEEK_DAYS)
        .rev()
        .map(|back| {
            let date = today.checked_sub_days(Days::new(back)).unwrap_or(today);
            let minutes = sessions
                .iter()
                .filter(|s| s.completed)
                .filter(|s| {
                    tz.timestamp_millis_opt(s.start_time)
                        .single()
                        .map(|dt| dt.date_naive())
                        == Some(date)
                })
                .map(|s| s.duration)
                .sum();
            DayBucket {
                date,
                label: date.weekday().to_string(),
                minutes,
            }
        })
        .collect()
}

/// Bucket with the most minutes. Ties go to the oldest day; `None` when
/// every bucket is empty.
pub fn most_productive_day(buckets: &[DayBucket]) -> Option<&DayBucket> {
    let mut best: Option<&DayBucket> = None;
    for bucket in buckets {
        if bucket.minutes > best.map_or(0, |b| b.minutes) {
            best = Some(bucket);
        }
    }
    best
}

/// Most launched apps by name, highest count first. Ties keep the order in
/// which the apps were first seen.
pub fn top_apps(launches: &[AppLaunchLog], n: usize) -> Vec<AppCount> {
    let mut counts: Vec<AppCount> = Vec::new();
    for launch in launches {
        match counts.iter_mut().find(|c| c.name == launch.app_name) {
            Some(entry) => entry.count += 1,
            None => counts.push(AppCount {
                name: launch.app_name.clone(),
                count: 1,
            }),
        }
    }
    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}
