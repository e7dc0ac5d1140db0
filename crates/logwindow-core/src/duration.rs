//! Textual durations such as `3D`, `2WEEKS` or `12h`.

use chrono::{Months, NaiveDateTime, TimeDelta};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{LogError, Result};

lazy_static! {
    static ref DURATION_RE: Regex = Regex::new(r"([0-9]+)\s*([A-Z])").unwrap();
}

/// Calendar unit of a [`Duration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl DurationUnit {
    /// Map a unit letter to its unit. Unknown letters fall back to `Day`.
    pub fn from_letter(letter: char) -> Self {
        match letter.to_ascii_uppercase() {
            'H' => DurationUnit::Hour,
            'D' => DurationUnit::Day,
            'W' => DurationUnit::Week,
            'M' => DurationUnit::Month,
            'Y' => DurationUnit::Year,
            _ => DurationUnit::Day,
        }
    }
}

impl std::fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DurationUnit::Hour => write!(f, "hour"),
            DurationUnit::Day => write!(f, "day"),
            DurationUnit::Week => write!(f, "week"),
            DurationUnit::Month => write!(f, "month"),
            DurationUnit::Year => write!(f, "year"),
        }
    }
}

/// A positive count of calendar units looking back from "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duration {
    pub count: u32,
    pub unit: DurationUnit,
}

impl Duration {
    /// Instant `count` units before `now`.
    ///
    /// Months and years step by calendar months, clamping to the last day of
    /// shorter months. Results that fall outside chrono's range saturate to
    /// the earliest representable instant.
    pub fn cutoff(&self, now: NaiveDateTime) -> NaiveDateTime {
        let count = i64::from(self.count);
        let cutoff = match self.unit {
            DurationUnit::Hour => TimeDelta::try_hours(count).and_then(|d| now.checked_sub_signed(d)),
            DurationUnit::Day => TimeDelta::try_days(count).and_then(|d| now.checked_sub_signed(d)),
            DurationUnit::Week => TimeDelta::try_weeks(count).and_then(|d| now.checked_sub_signed(d)),
            DurationUnit::Month => now.checked_sub_months(Months::new(self.count)),
            DurationUnit::Year => self
                .count
                .checked_mul(12)
                .and_then(|months| now.checked_sub_months(Months::new(months))),
        };
        cutoff.unwrap_or(NaiveDateTime::MIN)
    }
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}(s)", self.count, self.unit)
    }
}

impl std::str::FromStr for Duration {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        parse_duration(s)
    }
}

/// Parse the first `<digits><letter>` pair in `input`.
///
/// Whitespace between the number and the letter is allowed and case is
/// ignored, so `"3 days"`, `"3DAYS"` and `"3d"` all parse as three days.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let upper = input.trim().to_uppercase();
    let caps = DURATION_RE
        .captures(&upper)
        .ok_or_else(|| LogError::Parse(format!("wrong duration formatting: {:?}", input)))?;

    let count: u32 = caps[1]
        .parse()
        .map_err(|_| LogError::Parse(format!("duration count out of range: {:?}", input)))?;
    if count == 0 {
        return Err(LogError::Parse(format!(
            "duration count must be positive: {:?}",
            input
        )));
    }

    // The regex guarantees exactly one ASCII letter in the second group.
    let letter = caps[2].chars().next().unwrap_or('D');

    Ok(Duration {
        count,
        unit: DurationUnit::from_letter(letter),
    })
}

/// Cutoff instant for `duration` looking back from `now`.
pub fn window_cutoff(now: NaiveDateTime, duration: &Duration) -> NaiveDateTime {
    duration.cutoff(now)
}
