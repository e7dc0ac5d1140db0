//! Calendar window walking.
//!
//! The window `(cutoff, now]` is visited one whole day at a time, newest
//! first, and the date parts of every visited instant are collected.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike};
use serde::Serialize;

/// Distinct date parts observed inside a calendar window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentSets {
    pub hours: BTreeSet<u32>,
    pub days: BTreeSet<u32>,
    pub months: BTreeSet<u32>,
    pub years: BTreeSet<i32>,
}

impl ComponentSets {
    fn record(&mut self, instant: NaiveDateTime) {
        self.hours.insert(instant.hour());
        self.days.insert(instant.day());
        self.months.insert(instant.month());
        self.years.insert(instant.year());
    }

    fn days_and_months_saturated(&self) -> bool {
        self.days.len() == 31 && self.months.len() == 12
    }
}

/// Largest whole-day offset `k` for which `now - k days` is still after
/// `cutoff`. Zero when the window is empty or negative.
fn last_offset(now: NaiveDateTime, cutoff: NaiveDateTime) -> i64 {
    if cutoff >= now {
        return 0;
    }
    let span = now.signed_duration_since(cutoff);
    let whole = span.num_days();
    let remainder = span - TimeDelta::days(whole);
    if remainder > TimeDelta::zero() {
        whole
    } else {
        whole - 1
    }
}

/// Collect the hour, day-of-month, month and year of every day from `now`
/// back to just after `cutoff`.
///
/// Today is always recorded, even when `cutoff` is at or after `now`.
pub fn walk_window(now: NaiveDateTime, cutoff: NaiveDateTime) -> ComponentSets {
    let mut sets = ComponentSets::default();
    sets.record(now);

    let last = last_offset(now, cutoff);
    let mut earliest = now;

    for offset in 1..=last {
        let Some(day) = TimeDelta::try_days(offset).and_then(|d| now.checked_sub_signed(d)) else {
            break;
        };
        earliest = day;
        if sets.days_and_months_saturated() {
            // Only years can still grow, and consecutive days cover every
            // year between the oldest visited day and now.
            earliest = TimeDelta::try_days(last)
                .and_then(|d| now.checked_sub_signed(d))
                .unwrap_or(day);
            break;
        }
        sets.record(day);
    }

    sets.years.extend(earliest.year()..=now.year());

    tracing::trace!(
        %now,
        %cutoff,
        days = sets.days.len(),
        months = sets.months.len(),
        years = sets.years.len(),
        "walked calendar window"
    );

    sets
}
