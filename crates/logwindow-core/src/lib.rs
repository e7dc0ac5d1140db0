//! # logwindow-core
//!
//! Locates rotated log files by time window.
//!
//! A duration such as `3D` is turned into a calendar window ending now, the
//! window's dates become a brace-alternation glob (`app-{2024}-{01}-{10,11}.log`),
//! and the glob is matched against a log directory.
//!
//! ## Key Types
//!
//! - [`LogLocator`] - validated entry point for listing and reading
//! - [`ListOptions`] / [`ReadOptions`] - per-call options
//! - [`ReadSession`] - batch line reading over the selected files
//! - [`LineReaderFactory`] - seam for plugging in another reader

pub mod duration;
pub mod error;
mod locator;
pub mod options;
pub mod pattern;
pub mod selector;
pub mod session;
pub mod window;

pub use duration::{parse_duration, window_cutoff, Duration, DurationUnit};
pub use error::{LogError, Result};
pub use locator::LogLocator;
pub use options::{ListOptions, ListRequest, LocatorOptions, ReadOptions};
pub use pattern::{date_glob, render_fragment, synthesize, DateComponent, DateFormat, NameFormat};
pub use selector::{select_files, select_files_blocking, SortOrder};
pub use session::{
    identity_parser, FileCursor, LineParser, LineReader, LineReaderFactory, ReadSession,
    ReadState, ReaderInput, StreamingLineReader, StreamingReaderFactory,
};
pub use window::{walk_window, ComponentSets};
