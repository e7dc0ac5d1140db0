use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;
use logwindow_core::{ReadSession, ReadState};

pub fn print_files(files: &[PathBuf], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(files)?);
        return Ok(());
    }
    if files.is_empty() {
        eprintln!("{}", "No log files in window".dimmed());
        return Ok(());
    }
    for file in files {
        println!("{}", file.display());
    }
    Ok(())
}

fn print_header(path: &Path) {
    println!("{}", format!("==> {} <==", path.display()).bold());
}

fn print_batch(state: &ReadState, last_file: &mut usize) {
    let Some(lines) = &state.lines else {
        return;
    };
    // Headers follow the file the batch ended in.
    if state.file_num != *last_file {
        if let Some(current) = &state.files.current {
            print_header(current);
        }
        *last_file = state.file_num;
    }
    for line in lines {
        println!("{}", line);
    }
}

/// Drain `session`, at most `max_batches` reads when given.
pub async fn drain_session(
    session: &mut ReadSession,
    max_batches: Option<usize>,
    json: bool,
) -> Result<()> {
    if session.is_empty() {
        if json {
            println!("{}", serde_json::to_string(session.state())?);
        } else {
            eprintln!("{}", "No log files in window".dimmed());
        }
        return Ok(());
    }

    let mut last_file = 0;
    let mut batches = 0;
    loop {
        if max_batches.is_some_and(|max| batches >= max) {
            break;
        }
        let state = session.read().await?;
        if state.lines.is_none() {
            break;
        }
        batches += 1;
        if json {
            println!("{}", serde_json::to_string(state)?);
        } else {
            print_batch(state, &mut last_file);
        }
    }

    tracing::debug!(batches, "finished reading");
    Ok(())
}
