use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::error::Result;
use crate::options::{ListOptions, ListRequest, LocatorOptions, ReadOptions};
use crate::pattern::{synthesize, DateFormat};
use crate::selector::select_files;
use crate::session::{LineReaderFactory, ReadSession, ReaderInput, StreamingReaderFactory};
use crate::window::walk_window;

/// Finds dated log files in one directory.
///
/// Holds only validated construction options; every call recomputes its
/// pattern and file list.
#[derive(Debug, Clone)]
pub struct LogLocator {
    logs_dir: PathBuf,
    date_format: DateFormat,
}

impl LogLocator {
    /// Validate `options` and check that the log directory exists.
    pub fn new(options: LocatorOptions) -> Result<Self> {
        let (logs_dir, date_format) = options.validate()?;
        tracing::debug!(logs_dir = %logs_dir.display(), date_format = date_format.as_str(), "locator ready");
        Ok(Self {
            logs_dir,
            date_format,
        })
    }

    /// Canonical, absolute log directory.
    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    pub fn date_format(&self) -> &DateFormat {
        &self.date_format
    }

    /// Glob pattern for `options` with the window ending at `now`.
    pub fn pattern(&self, options: &ListOptions, now: NaiveDateTime) -> Result<String> {
        let request = options.validate()?;
        Ok(self.pattern_for(&request, now))
    }

    fn pattern_for(&self, request: &ListRequest, now: NaiveDateTime) -> String {
        let cutoff = request.duration.cutoff(now);
        let sets = walk_window(now, cutoff);
        let pattern = synthesize(&sets, &self.date_format, &request.name_format);
        tracing::debug!(
            duration = %request.duration,
            %cutoff,
            pattern = pattern.as_str(),
            "synthesized glob pattern"
        );
        pattern
    }

    /// List matching files for a window ending at the local "now".
    pub async fn list(&self, options: &ListOptions) -> Result<Vec<PathBuf>> {
        self.list_at(options, Local::now().naive_local()).await
    }

    /// List matching files for a window ending at `now`.
    pub async fn list_at(&self, options: &ListOptions, now: NaiveDateTime) -> Result<Vec<PathBuf>> {
        let request = options.validate()?;
        self.list_request(&request, now).await
    }

    async fn list_request(&self, request: &ListRequest, now: NaiveDateTime) -> Result<Vec<PathBuf>> {
        let pattern = self.pattern_for(request, now);
        select_files(&self.logs_dir, &pattern, request.sort).await
    }

    /// List files and open them with the built-in streaming reader.
    pub async fn read(&self, options: ReadOptions) -> Result<ReadSession> {
        self.read_with(options, &StreamingReaderFactory).await
    }

    /// List files and hand them to `factory`.
    ///
    /// No files yields an inert session; `factory` is not called.
    pub async fn read_with(
        &self,
        options: ReadOptions,
        factory: &dyn LineReaderFactory,
    ) -> Result<ReadSession> {
        self.read_at(options, factory, Local::now().naive_local())
            .await
    }

    /// [`Self::read_with`] for a window ending at `now`.
    pub async fn read_at(
        &self,
        options: ReadOptions,
        factory: &dyn LineReaderFactory,
        now: NaiveDateTime,
    ) -> Result<ReadSession> {
        let (request, lines, parser) = options.validate()?;
        let files = self.list_request(&request, now).await?;

        if files.is_empty() {
            tracing::debug!("no files in window; returning empty session");
            return Ok(ReadSession::empty());
        }

        let reader = factory.open(ReaderInput {
            files: files.clone(),
            lines,
            parser,
        });
        Ok(ReadSession::new(files, reader))
    }
}
