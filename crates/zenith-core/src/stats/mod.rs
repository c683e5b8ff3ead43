//! Statistics module for Zenith
//!
//! Pure functions over store snapshots: completion rate, daily minute
//! buckets, most used apps, and the insight and mantra tables.

mod insight;
pub mod mantra;
mod rollups;

pub use insight::{insight, InsightLadder};
pub use mantra::{daily_mantra, MANTRAS};
pub use rollups::{
    completion_rate, most_productive_day, top_apps, weekly_minutes, AppCount, DayBucket,
    DEFAULT_TOP_APPS, WEEK_DAYS,
};

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::model::{AppLaunchLog, FocusSession};

/// Everything the stats screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Minutes across completed sessions.
    pub total_focus_minutes: u32,
    pub completed_sessions: usize,
    pub total_sessions: usize,
    pub completion_rate: u32,
    pub weekly: Vec<DayBucket>,
    pub most_productive_day: Option<DayBucket>,
    pub top_apps: Vec<AppCount>,
    pub insight: String,
}

impl Summary {
    pub fn build<Tz: TimeZone>(
        sessions: &[FocusSession],
        launches: &[AppLaunchLog],
        today: NaiveDate,
        tz: &Tz,
        ladder: &InsightLadder,
    ) -> Self {
        let completed: Vec<&FocusSession> = sessions.iter().filter(|s| s.completed).collect();
        let rate = completion_rate(sessions);
        let weekly = weekly_minutes(sessions, today, tz);
        let best = most_productive_day(&weekly).cloned();
        let insight = insight(sessions.len(), rate, best.as_ref(), ladder);

        Self {
            total_focus_minutes: completed.iter().map(|s| s.duration).sum(),
            completed_sessions: completed.len(),
            total_sessions: sessions.len(),
            completion_rate: rate,
            weekly,
            most_productive_day: best,
            top_apps: top_apps(launches, DEFAULT_TOP_APPS),
            insight,
        }
    }
}
