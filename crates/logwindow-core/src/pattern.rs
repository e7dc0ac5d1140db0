//! Glob pattern synthesis from collected date parts.

use std::fmt::Display;

use lazy_static::lazy_static;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

use crate::error::{LogError, Result};
use crate::window::ComponentSets;

lazy_static! {
    static ref DATE_FORMAT_RE: Regex = Regex::new(r"[YD]{2,4}-M{2,4}-[YD]{2,4}").unwrap();
    static ref DATE_PLACEHOLDER_RE: Regex = Regex::new(r"(?i)\{date\}").unwrap();
}

/// Default file date format.
pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD";

/// Default name template: the date anywhere in the file name.
pub const DEFAULT_NAME_FORMAT: &str = "*{date}*";

/// A date part that can appear in a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateComponent {
    Year,
    Month,
    Day,
}

/// The component order implied by a date format string such as
/// `YYYY-MM-DD` or `DD-MM-YY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    source: String,
    order: Vec<DateComponent>,
}

impl DateFormat {
    pub fn parse(format: &str) -> Result<Self> {
        let upper = format.trim().to_uppercase();
        let matched = DATE_FORMAT_RE.find(&upper).ok_or_else(|| {
            LogError::invalid("date_format", format, "expected a format like YYYY-MM-DD")
        })?;

        let mut order = Vec::with_capacity(3);

        for token in matched.as_str().split('-') {
            let component = match token.chars().next() {
                Some('Y') if token.chars().all(|c| c == 'Y') => DateComponent::Year,
                Some('M') => DateComponent::Month,
                Some('D') if token.chars().all(|c| c == 'D') => DateComponent::Day,
                _ => {
                    return Err(LogError::Config(format!(
                        "cannot determine component order of date format {:?}",
                        format
                    )))
                }
            };
            if order.contains(&component) {
                return Err(LogError::Config(format!(
                    "cannot determine component order of date format {:?}: {:?} repeats",
                    format, component
                )));
            }
            order.push(component);
        }

        Ok(Self {
            source: upper,
            order,
        })
    }

    /// Components in left-to-right order.
    pub fn order(&self) -> &[DateComponent] {
        &self.order
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self {
            source: DEFAULT_DATE_FORMAT.to_string(),
            order: vec![DateComponent::Year, DateComponent::Month, DateComponent::Day],
        }
    }
}

impl std::str::FromStr for DateFormat {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A file name template holding a `{date}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFormat(String);

impl NameFormat {
    pub fn parse(template: &str) -> Result<Self> {
        if !DATE_PLACEHOLDER_RE.is_match(template) {
            return Err(LogError::invalid(
                "name_format",
                template,
                "must contain a {date} placeholder",
            ));
        }
        Ok(Self(template.to_string()))
    }

    /// Substitute `date_glob` for the first `{date}` placeholder.
    pub fn render(&self, date_glob: &str) -> String {
        DATE_PLACEHOLDER_RE
            .replacen(&self.0, 1, NoExpand(date_glob))
            .into_owned()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NameFormat {
    fn default() -> Self {
        Self(DEFAULT_NAME_FORMAT.to_string())
    }
}

/// Render values as a brace alternation, e.g. `{02,09,10}`.
///
/// Values are sorted numerically and deduplicated before being zero-padded
/// to `width`. A width of zero keeps each value's natural width.
pub fn render_fragment<I, T>(values: I, width: usize) -> String
where
    I: IntoIterator<Item = T>,
    T: Into<i64>,
{
    let mut values: Vec<i64> = values.into_iter().map(Into::into).collect();
    values.sort_unstable();
    values.dedup();
    let parts: Vec<String> = values.iter().map(|v| pad(v, width)).collect();
    format!("{{{}}}", parts.join(","))
}

fn pad(value: &impl Display, width: usize) -> String {
    format!("{:0>width$}", value.to_string(), width = width)
}

/// Join the per-component fragments in `format` order with `-`.
pub fn date_glob(sets: &ComponentSets, format: &DateFormat) -> String {
    let fragments: Vec<String> = format
        .order()
        .iter()
        .map(|component| match component {
            DateComponent::Year => render_fragment(sets.years.iter().copied(), 0),
            DateComponent::Month => render_fragment(sets.months.iter().copied(), 2),
            DateComponent::Day => render_fragment(sets.days.iter().copied(), 2),
        })
        .collect();
    fragments.join("-")
}

/// Build the full glob pattern for a file name template.
pub fn synthesize(sets: &ComponentSets, format: &DateFormat, name_format: &NameFormat) -> String {
    name_format.render(&date_glob(sets, format))
}
