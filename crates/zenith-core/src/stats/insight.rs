//! Insight text shown under the weekly chart.
//!
//! The wording lives in an [`InsightLadder`] table so it can be swapped
//! without touching the selection rules.

use serde::{Deserialize, Serialize};

use super::rollups::DayBucket;

/// Thresholds and wording for [`insight`].
///
/// `productive_day` may contain `{day}`, replaced with the full weekday name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightLadder {
    pub onboarding: String,
    pub praise_threshold: u32,
    pub praise: String,
    pub improvement_threshold: u32,
    pub improvement: String,
    pub productive_day: String,
    pub encouragement: String,
}

impl Default for InsightLadder {
    fn default() -> Self {
        Self {
            onboarding: "Start your first focus session. Clarity follows action.".into(),
            praise_threshold: 80,
            praise: "You finish what you start. Protect that momentum and keep your phone in \
                     the other room."
                .into(),
            improvement_threshold: 50,
            improvement: "Most sessions hold. Choose shorter durations and finish every one \
                          you begin."
                .into(),
            productive_day: "You are most productive on {day}. Schedule your most difficult \
                             tasks then."
                .into(),
            encouragement: "Every session counts. Begin again, one focused block at a time."
                .into(),
        }
    }
}

/// Pick the insight for a window of `session_count` sessions.
pub fn insight(
    session_count: usize,
    completion_rate: u32,
    productive_day: Option<&DayBucket>,
    ladder: &InsightLadder,
) -> String {
    if session_count == 0 {
        return ladder.onboarding.clone();
    }
    if completion_rate >= ladder.praise_threshold {
        return ladder.praise.clone();
    }
    if completion_rate >= ladder.improvement_threshold {
        return ladder.improvement.clone();
    }
    match productive_day {
        Some(bucket) => ladder
            .productive_day
            .replace("{day}", &full_weekday(bucket)),
        None => ladder.encouragement.clone(),
    }
}

fn full_weekday(bucket: &DayBucket) -> String {
    use chrono::{Datelike, Weekday};
    match bucket.date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
    .to_string()
}
