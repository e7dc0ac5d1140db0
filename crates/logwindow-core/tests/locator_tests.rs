use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use logwindow_core::{
    FileCursor, LineReader, LineReaderFactory, ListOptions, LocatorOptions, LogError, LogLocator,
    ReadOptions, ReadState, ReaderInput, SortOrder,
};
use tempfile::TempDir;

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 15, 0)
        .unwrap()
}

/// Helper: a log directory with a week of daily files plus noise.
fn create_logs_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    for day in 5..=11 {
        fs::write(
            dir.path().join(format!("app-2024-01-{:02}.log", day)),
            format!("line one of {day}\nline two of {day}\n"),
        )
        .unwrap();
    }
    fs::write(dir.path().join("worker-2024-01-11.log"), "worker\n").unwrap();
    fs::write(dir.path().join("README.txt"), "not a log\n").unwrap();
    fs::create_dir(dir.path().join("app-2024-01-10.d")).unwrap();
    dir
}

fn locator(dir: &TempDir) -> LogLocator {
    LogLocator::new(LocatorOptions::new(dir.path())).unwrap()
}

fn names(files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

// ============================================================
// Construction
// ============================================================

#[test]
fn test_new_rejects_bad_date_format() {
    let dir = create_logs_dir();
    let result = LogLocator::new(LocatorOptions::new(dir.path()).with_date_format("XYZ"));
    assert!(matches!(result, Err(LogError::Config(_))));
}

#[test]
fn test_new_rejects_missing_dir() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");
    let err = LogLocator::new(LocatorOptions::new(&missing)).unwrap_err();
    assert!(err.to_string().contains("missing"));
    assert!(matches!(err, LogError::Config(_)));
}

#[test]
fn test_new_rejects_file_as_dir() {
    let dir = create_logs_dir();
    let file = dir.path().join("README.txt");
    assert!(matches!(
        LogLocator::new(LocatorOptions::new(file)),
        Err(LogError::Config(_))
    ));
}

#[test]
fn test_logs_dir_is_absolute() {
    let dir = create_logs_dir();
    assert!(locator(&dir).logs_dir().is_absolute());
}

// ============================================================
// Pattern synthesis
// ============================================================

#[test]
fn test_pattern_for_two_days() {
    let dir = create_logs_dir();
    let opts = ListOptions::default()
        .with_duration("2D")
        .with_name_format("app-{date}.log");
    let pattern = locator(&dir).pattern(&opts, at(2024, 1, 11, 9)).unwrap();
    assert_eq!(pattern, "app-{2024}-{01}-{10,11}.log");
}

#[test]
fn test_pattern_default_name_wraps_with_wildcards() {
    let dir = create_logs_dir();
    let pattern = locator(&dir)
        .pattern(&ListOptions::default(), at(2024, 1, 11, 9))
        .unwrap();
    assert_eq!(pattern, "*{2024}-{01}-{09,10,11}*");
}

#[test]
fn test_pattern_follows_date_format_order() {
    let dir = create_logs_dir();
    let loc = LogLocator::new(LocatorOptions::new(dir.path()).with_date_format("DD-MM-YYYY")).unwrap();
    let opts = ListOptions::default().with_duration("1W");
    let pattern = loc.pattern(&opts, at(2024, 3, 2, 9)).unwrap();
    assert_eq!(pattern, "*{01,02,25,26,27,28,29}-{02,03}-{2024}*");
}

#[test]
fn test_pattern_short_year_token_renders_full_year() {
    let dir = create_logs_dir();
    let loc = LogLocator::new(LocatorOptions::new(dir.path()).with_date_format("DD-MM-YY")).unwrap();
    let opts = ListOptions::default().with_duration("1D");
    let pattern = loc.pattern(&opts, at(2024, 1, 11, 9)).unwrap();
    assert_eq!(pattern, "*{11}-{01}-{2024}*");
}

#[test]
fn test_pattern_hour_window_is_today() {
    let dir = create_logs_dir();
    let opts = ListOptions::default().with_duration("6H");
    let pattern = locator(&dir).pattern(&opts, at(2024, 1, 11, 2)).unwrap();
    assert_eq!(pattern, "*{2024}-{01}-{11}*");
}

#[test]
fn test_pattern_rejects_bad_options_before_io() {
    let dir = create_logs_dir();
    let loc = locator(&dir);
    let bad_name = ListOptions::default().with_name_format("app.log");
    assert!(matches!(
        loc.pattern(&bad_name, at(2024, 1, 11, 9)),
        Err(LogError::Config(_))
    ));
    let bad_duration = ListOptions::default().with_duration("soon");
    assert!(loc.pattern(&bad_duration, at(2024, 1, 11, 9)).is_err());
}

// ============================================================
// Listing
// ============================================================

#[tokio::test]
async fn test_list_ascending_example() {
    let dir = create_logs_dir();
    let loc = locator(&dir);
    let opts = ListOptions::default()
        .with_duration("2D")
        .with_name_format("app-{date}.log")
        .with_sort(SortOrder::Asc);

    let files = loc.list_at(&opts, at(2024, 1, 11, 9)).await.unwrap();

    assert_eq!(
        files,
        vec![
            loc.logs_dir().join("app-2024-01-10.log"),
            loc.logs_dir().join("app-2024-01-11.log"),
        ]
    );
    assert!(files.iter().all(|p| p.is_absolute()));
}

#[tokio::test]
async fn test_list_desc_is_reverse_of_asc() {
    let dir = create_logs_dir();
    let loc = locator(&dir);
    let now = at(2024, 1, 11, 9);
    let base = ListOptions::default().with_duration("5D");

    let asc = loc
        .list_at(&base.clone().with_sort(SortOrder::Asc), now)
        .await
        .unwrap();
    let mut desc = loc
        .list_at(&base.with_sort(SortOrder::Desc), now)
        .await
        .unwrap();

    assert_eq!(
        names(&asc),
        vec![
            "app-2024-01-07.log",
            "app-2024-01-08.log",
            "app-2024-01-09.log",
            "app-2024-01-10.log",
            "app-2024-01-11.log",
            "worker-2024-01-11.log",
        ]
    );
    desc.reverse();
    assert_eq!(asc, desc);
}

#[tokio::test]
async fn test_list_default_sort_is_descending() {
    let dir = create_logs_dir();
    let opts = ListOptions::default()
        .with_duration("2D")
        .with_name_format("app-{date}.log");
    let files = locator(&dir).list_at(&opts, at(2024, 1, 11, 9)).await.unwrap();
    assert_eq!(names(&files), vec!["app-2024-01-11.log", "app-2024-01-10.log"]);
}

#[tokio::test]
async fn test_list_outside_window_is_empty() {
    let dir = create_logs_dir();
    let files = locator(&dir)
        .list_at(&ListOptions::default(), at(2025, 6, 1, 9))
        .await
        .unwrap();
    assert!(files.is_empty());
}

#[tokio::test]
async fn test_list_is_recomputed_each_call() {
    let dir = create_logs_dir();
    let loc = locator(&dir);
    let opts = ListOptions::default()
        .with_duration("1D")
        .with_name_format("new-{date}.log");
    let now = at(2024, 1, 11, 9);

    assert!(loc.list_at(&opts, now).await.unwrap().is_empty());
    fs::write(dir.path().join("new-2024-01-11.log"), "fresh\n").unwrap();
    assert_eq!(names(&loc.list_at(&opts, now).await.unwrap()), vec!["new-2024-01-11.log"]);
}

#[tokio::test]
async fn test_list_at_local_now_finds_todays_file() {
    let dir = TempDir::new().unwrap();
    let now = chrono::Local::now().naive_local();
    let today = now.format("%Y-%m-%d").to_string();
    fs::write(dir.path().join(format!("svc-{today}.log")), "x\n").unwrap();

    let files = LogLocator::new(LocatorOptions::new(dir.path()))
        .unwrap()
        .list_at(&ListOptions::default(), now)
        .await
        .unwrap();
    assert_eq!(files.len(), 1);
}

// ============================================================
// Reading
// ============================================================

#[tokio::test]
async fn test_read_empty_window_is_inert() {
    let dir = create_logs_dir();
    let loc = locator(&dir);
    let mut session = loc
        .read_at(
            ReadOptions::default(),
            &logwindow_core::StreamingReaderFactory,
            at(2030, 1, 1, 0),
        )
        .await
        .unwrap();

    assert!(session.is_empty());
    for _ in 0..2 {
        let state = session.read().await.unwrap();
        assert_eq!(state.file_num, 0);
        assert_eq!(state.line_num, 0);
        assert!(state.lines.is_none());
    }
}

#[tokio::test]
async fn test_read_streams_in_list_order() {
    let dir = create_logs_dir();
    let loc = locator(&dir);
    let list = ListOptions::default()
        .with_duration("2D")
        .with_name_format("app-{date}.log")
        .with_sort(SortOrder::Asc);
    let opts = ReadOptions::new(list)
        .with_lines(3)
        .with_parser(|l: &str| l.replace("line ", ""));

    let mut session = loc
        .read_at(opts, &logwindow_core::StreamingReaderFactory, at(2024, 1, 11, 9))
        .await
        .unwrap();
    assert_eq!(names(session.selected()), vec!["app-2024-01-10.log", "app-2024-01-11.log"]);

    let first = session.read().await.unwrap().clone();
    assert_eq!(
        first.lines,
        Some(vec![
            "one of 10".to_string(),
            "two of 10".to_string(),
            "one of 11".to_string()
        ])
    );
    assert_eq!((first.file_num, first.line_num), (2, 1));

    let second = session.read().await.unwrap().clone();
    assert_eq!(second.lines, Some(vec!["two of 11".to_string()]));

    let done = session.read().await.unwrap();
    assert!(done.lines.is_none());
}

#[tokio::test]
async fn test_read_rejects_zero_lines() {
    let dir = create_logs_dir();
    let result = locator(&dir)
        .read(ReadOptions::default().with_lines(0))
        .await;
    assert!(matches!(result, Err(LogError::Config(_))));
}

/// Reader double that records what it was handed.
#[derive(Default)]
struct RecordingFactory {
    seen: Mutex<Vec<(Vec<PathBuf>, usize)>>,
}

struct FixedReader(Vec<PathBuf>);

#[async_trait]
impl LineReader for FixedReader {
    async fn read(&mut self) -> logwindow_core::Result<ReadState> {
        Ok(ReadState {
            files: FileCursor {
                current: self.0.first().cloned(),
                selected: self.0.clone(),
            },
            file_num: 1,
            line_num: 1,
            lines: Some(vec!["stub".to_string()]),
        })
    }
}

impl LineReaderFactory for RecordingFactory {
    fn open(&self, input: ReaderInput) -> Box<dyn LineReader> {
        self.seen
            .lock()
            .unwrap()
            .push((input.files.clone(), input.lines));
        Box::new(FixedReader(input.files))
    }
}

#[tokio::test]
async fn test_read_with_injected_reader() {
    let dir = create_logs_dir();
    let loc = locator(&dir);
    let factory = Arc::new(RecordingFactory::default());
    let opts = ReadOptions::new(
        ListOptions::default()
            .with_duration("1D")
            .with_name_format("worker-{date}.log"),
    );

    let mut session = loc
        .read_at(opts, factory.as_ref(), at(2024, 1, 11, 9))
        .await
        .unwrap();
    let state = session.read().await.unwrap();
    assert_eq!(state.lines, Some(vec!["stub".to_string()]));

    let seen = factory.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(names(&seen[0].0), vec!["worker-2024-01-11.log"]);
    assert_eq!(seen[0].1, 20);
}

#[tokio::test]
async fn test_injected_reader_not_called_without_files() {
    let dir = create_logs_dir();
    let factory = RecordingFactory::default();
    let session = locator(&dir)
        .read_at(ReadOptions::default(), &factory, at(1999, 1, 1, 0))
        .await
        .unwrap();
    assert!(session.is_empty());
    assert!(factory.seen.lock().unwrap().is_empty());
}
