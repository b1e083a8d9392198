//! Clocks and time formatting helpers.

use tappay_types::Timestamp;

const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

/// Source of the current time, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Describe how long ago `then` was, in days: `Today`, `Yesterday`,
/// `N days ago` up to a week, then the age as a duration.
///
/// Day counts round up, so anything within the last 24 hours is `Today`.
pub fn format_age(then: Timestamp, now: Timestamp) -> String {
    let elapsed = now.as_millis().abs_diff(then.as_millis());
    let days = elapsed.div_ceil(MILLIS_PER_DAY).max(1);
    match days {
        1 => "Today".to_string(),
        2 => "Yesterday".to_string(),
        3..=7 => format!("{} days ago", days - 1),
        _ => format!("{} ago", format_duration(elapsed / 1000)),
    }
}
