use std::fmt;

use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

/// Coarse, locale-agnostic age bucket for an upload timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeLabel {
    Today,
    Yesterday,
    DaysAgo(u64),
    WeeksAgo(u64),
    MonthsAgo(u64),
}

impl fmt::Display for AgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeLabel::Today => write!(f, "Today"),
            AgeLabel::Yesterday => write!(f, "Yesterday"),
            AgeLabel::DaysAgo(days) => write!(f, "{days} Days Ago"),
            AgeLabel::WeeksAgo(weeks) => write!(f, "{weeks} Weeks Ago"),
            AgeLabel::MonthsAgo(months) => write!(f, "{months} Months Ago"),
        }
    }
}

/// Label `uploaded_at` relative to `now`.
///
/// The distance is absolute, so a timestamp in the future gets the same label
/// as one equally far in the past. Call this at render time; labels drift as
/// the clock moves and must not be stored with the record.
pub fn relative_age(uploaded_at: DateTime<Utc>, now: DateTime<Utc>) -> AgeLabel {
    age_from_days(elapsed_days(uploaded_at, now))
}

/// Whole days between the two instants, rounded up. Any partial day counts as one.
pub fn elapsed_days(uploaded_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (now - uploaded_at).num_milliseconds().unsigned_abs();
    millis.div_ceil(MILLIS_PER_DAY)
}

pub fn age_from_days(days: u64) -> AgeLabel {
    match days {
        0 => AgeLabel::Today,
        1 => AgeLabel::Yesterday,
        2..=7 => AgeLabel::DaysAgo(days),
        8..=30 => AgeLabel::WeeksAgo(days.div_ceil(7)),
        _ => AgeLabel::MonthsAgo(days.div_ceil(30)),
    }
}
