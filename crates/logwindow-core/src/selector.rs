//! Glob execution against a log directory.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};

use crate::error::{LogError, Result};

/// Order of the returned file list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(LogError::invalid("sort", s, "expected ASC or DESC")),
        }
    }
}

fn compile(pattern: &str) -> Result<GlobMatcher> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| LogError::Config(format!("invalid glob pattern {:?}: {}", pattern, e)))?;
    Ok(glob.compile_matcher())
}

/// How deep the walk must go for `pattern`; `None` means unbounded.
fn walk_depth(pattern: &str) -> Option<usize> {
    if pattern.contains("**") {
        None
    } else {
        Some(pattern.matches('/').count() + 1)
    }
}

/// Match `pattern` against files under `base_dir`, blocking the caller.
///
/// Matching is done on paths relative to `base_dir`; returned paths are
/// `base_dir` joined with the match, so they are absolute whenever
/// `base_dir` is. Results are sorted ascending by their string form, then reversed for
/// [`SortOrder::Desc`].
pub fn select_files_blocking(base_dir: &Path, pattern: &str, sort: SortOrder) -> Result<Vec<PathBuf>> {
    let matcher = compile(pattern)?;

    let walker = WalkBuilder::new(base_dir)
        .standard_filters(false)
        .follow_links(false)
        .max_depth(walk_depth(pattern))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(base_dir) else {
            continue;
        };
        if matcher.is_match(relative) {
            tracing::trace!(path = %entry.path().display(), "matched");
            files.push(entry.into_path());
        }
    }

    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    if sort == SortOrder::Desc {
        files.reverse();
    }

    tracing::debug!(pattern, count = files.len(), %sort, "selected files");
    Ok(files)
}

/// Async wrapper around [`select_files_blocking`]; the walk runs on the
/// blocking pool.
pub async fn select_files(base_dir: &Path, pattern: &str, sort: SortOrder) -> Result<Vec<PathBuf>> {
    let base_dir = base_dir.to_path_buf();
    let pattern = pattern.to_string();
    tokio::task::spawn_blocking(move || select_files_blocking(&base_dir, &pattern, sort))
        .await
        .map_err(|e| LogError::Io(std::io::Error::other(e)))?
}
