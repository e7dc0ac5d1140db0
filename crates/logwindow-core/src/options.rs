//! Caller-facing options and their up-front validation.
//!
//! Each options type has a `validate` method that turns loose caller input
//! into typed values before any filesystem work happens.

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::duration::{parse_duration, Duration};
use crate::error::{LogError, Result};
use crate::pattern::{DateFormat, NameFormat, DEFAULT_DATE_FORMAT, DEFAULT_NAME_FORMAT};
use crate::selector::SortOrder;
use crate::session::{identity_parser, LineParser};

lazy_static! {
    static ref DURATION_SHAPE_RE: Regex =
        Regex::new(r"[0-9]+([DWMYH]|(|DAY|WEEK|MONTH|YEAR|HOUR)S?)").unwrap();
}

pub const DEFAULT_DURATION: &str = "3DAYS";
pub const DEFAULT_LINES: usize = 20;

/// Options for constructing a [`crate::LogLocator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorOptions {
    pub logs_dir: PathBuf,
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

impl LocatorOptions {
    pub fn new(logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            date_format: default_date_format(),
        }
    }

    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    /// Returns the canonical log directory and the parsed date format.
    pub fn validate(&self) -> Result<(PathBuf, DateFormat)> {
        let date_format = DateFormat::parse(&self.date_format)?;
        let logs_dir = validate_dir(&self.logs_dir)?;
        Ok((logs_dir, date_format))
    }
}

fn validate_dir(path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        return Err(LogError::Config(format!(
            "{} is not a valid directory",
            path.display()
        )));
    }
    Ok(path.canonicalize()?)
}

/// Options for listing files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListOptions {
    pub duration: String,
    pub name_format: String,
    pub sort: SortOrder,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION.to_string(),
            name_format: DEFAULT_NAME_FORMAT.to_string(),
            sort: SortOrder::default(),
        }
    }
}

impl ListOptions {
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    pub fn with_name_format(mut self, name_format: impl Into<String>) -> Self {
        self.name_format = name_format.into();
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn validate(&self) -> Result<ListRequest> {
        let shaped = self.duration.trim().to_uppercase();
        if !DURATION_SHAPE_RE.is_match(&shaped) {
            return Err(LogError::invalid(
                "duration",
                &self.duration,
                "expected a count and unit such as 3D or 2WEEKS",
            ));
        }
        let duration = parse_duration(&shaped)?;
        let name_format = NameFormat::parse(&self.name_format)?;

        Ok(ListRequest {
            duration,
            name_format,
            sort: self.sort,
        })
    }
}

/// Validated listing input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub duration: Duration,
    pub name_format: NameFormat,
    pub sort: SortOrder,
}

/// Options for reading: listing options plus a batch size and line parser.
#[derive(Clone)]
pub struct ReadOptions {
    pub list: ListOptions,
    pub lines: usize,
    pub parser: Option<LineParser>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            list: ListOptions::default(),
            lines: DEFAULT_LINES,
            parser: None,
        }
    }
}

impl std::fmt::Debug for ReadOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadOptions")
            .field("list", &self.list)
            .field("lines", &self.lines)
            .field("parser", &self.parser.as_ref().map(|_| "custom"))
            .finish()
    }
}

impl ReadOptions {
    pub fn new(list: ListOptions) -> Self {
        Self {
            list,
            ..Self::default()
        }
    }

    pub fn with_lines(mut self, lines: usize) -> Self {
        self.lines = lines;
        self
    }

    pub fn with_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let parser: LineParser = std::sync::Arc::new(parser);
        self.parser = Some(parser);
        self
    }

    /// Validate and fill defaults, returning the listing request, the batch
    /// size and the parser to use.
    pub fn validate(&self) -> Result<(ListRequest, usize, LineParser)> {
        let request = self.list.validate()?;
        if self.lines == 0 {
            return Err(LogError::invalid("lines", self.lines, "must be a positive integer"));
        }
        let parser = self.parser.clone().unwrap_or_else(identity_parser);
        Ok((request, self.lines, parser))
    }
}
