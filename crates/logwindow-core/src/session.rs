//! Handing selected files to a line reader.
//!
//! [`ReadSession`] is what callers hold on to. It wraps any [`LineReader`]
//! produced by a [`LineReaderFactory`]; when no files were selected it is
//! inert and every read returns the same empty state.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::Result;

/// Per-line transform applied before lines are returned.
pub type LineParser = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// The identity parser.
pub fn identity_parser() -> LineParser {
    Arc::new(|line: &str| line.to_string())
}

/// Which file is being read, out of which selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileCursor {
    pub current: Option<PathBuf>,
    pub selected: Vec<PathBuf>,
}

/// Snapshot returned by every read.
///
/// `file_num` is the 1-based position of `files.current` and `line_num` the
/// 1-based line number of the last returned line within it. Both are zero
/// before anything has been read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadState {
    pub files: FileCursor,
    pub file_num: usize,
    pub line_num: usize,
    pub lines: Option<Vec<String>>,
}

/// Everything a reader needs to start streaming.
#[derive(Clone)]
pub struct ReaderInput {
    pub files: Vec<PathBuf>,
    pub lines: usize,
    pub parser: LineParser,
}

impl std::fmt::Debug for ReaderInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderInput")
            .field("files", &self.files)
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

/// A line-iteration handle over an ordered list of files.
#[async_trait]
pub trait LineReader: Send {
    /// Read the next batch of lines.
    async fn read(&mut self) -> Result<ReadState>;
}

/// Produces [`LineReader`]s; lets callers swap the file-backed reader out.
pub trait LineReaderFactory: Send + Sync {
    fn open(&self, input: ReaderInput) -> Box<dyn LineReader>;
}

/// Session returned by a read operation.
pub struct ReadSession {
    state: ReadState,
    reader: Option<Box<dyn LineReader>>,
}

impl ReadSession {
    /// A session over no files. Reading it never fails and never changes it.
    pub fn empty() -> Self {
        Self {
            state: ReadState::default(),
            reader: None,
        }
    }

    pub fn new(files: Vec<PathBuf>, reader: Box<dyn LineReader>) -> Self {
        Self {
            state: ReadState {
                files: FileCursor {
                    current: None,
                    selected: files,
                },
                ..ReadState::default()
            },
            reader: Some(reader),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reader.is_none()
    }

    pub fn state(&self) -> &ReadState {
        &self.state
    }

    pub fn selected(&self) -> &[PathBuf] {
        &self.state.files.selected
    }

    pub async fn read(&mut self) -> Result<&ReadState> {
        if let Some(reader) = self.reader.as_mut() {
            self.state = reader.read().await?;
        }
        Ok(&self.state)
    }
}

impl std::fmt::Debug for ReadSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadSession")
            .field("state", &self.state)
            .field("inert", &self.is_empty())
            .finish()
    }
}

/// Streams lines from each file in turn, `lines` at a time.
pub struct StreamingLineReader {
    files: Vec<PathBuf>,
    batch: usize,
    parser: LineParser,
    next_file: usize,
    current: Option<BufReader<File>>,
    buf: Vec<u8>,
    lines_in_current: usize,
    last: Option<(usize, usize)>,
}

impl StreamingLineReader {
    pub fn new(input: ReaderInput) -> Self {
        Self {
            files: input.files,
            batch: input.lines.max(1),
            parser: input.parser,
            next_file: 0,
            current: None,
            buf: Vec::new(),
            lines_in_current: 0,
            last: None,
        }
    }

    fn snapshot(&self, lines: Option<Vec<String>>) -> ReadState {
        let (current, file_num, line_num) = match self.last {
            Some((idx, line)) => (self.files.get(idx).cloned(), idx + 1, line),
            None => (None, 0, 0),
        };
        ReadState {
            files: FileCursor {
                current,
                selected: self.files.clone(),
            },
            file_num,
            line_num,
            lines,
        }
    }
}

/// Strip the line terminator and decode, replacing invalid UTF-8.
fn decode_line(raw: &[u8]) -> std::borrow::Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw)
}

#[async_trait]
impl LineReader for StreamingLineReader {
    async fn read(&mut self) -> Result<ReadState> {
        let mut batch = Vec::with_capacity(self.batch);

        while batch.len() < self.batch {
            let Some(reader) = self.current.as_mut() else {
                let Some(path) = self.files.get(self.next_file) else {
                    break;
                };
                tracing::debug!(path = %path.display(), "opening log file");
                let file = File::open(path).await?;
                self.current = Some(BufReader::new(file));
                self.lines_in_current = 0;
                continue;
            };

            self.buf.clear();
            if reader.read_until(b'\n', &mut self.buf).await? == 0 {
                self.current = None;
                self.next_file += 1;
                continue;
            }

            let line = decode_line(&self.buf);
            self.lines_in_current += 1;
            self.last = Some((self.next_file, self.lines_in_current));
            batch.push((self.parser)(&line));
        }

        let lines = if batch.is_empty() { None } else { Some(batch) };
        Ok(self.snapshot(lines))
    }
}

/// Factory for [`StreamingLineReader`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamingReaderFactory;

impl LineReaderFactory for StreamingReaderFactory {
    fn open(&self, input: ReaderInput) -> Box<dyn LineReader> {
        Box::new(StreamingLineReader::new(input))
    }
}
