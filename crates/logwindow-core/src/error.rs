use thiserror::Error;

/// Errors raised while locating or reading log files.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LogError {
    pub(crate) fn invalid(field: &str, value: impl std::fmt::Display, reason: &str) -> Self {
        LogError::Config(format!("invalid {} {:?}: {}", field, value.to_string(), reason))
    }
}

impl From<ignore::Error> for LogError {
    fn from(err: ignore::Error) -> Self {
        let message = err.to_string();
        match err.into_io_error() {
            Some(io) => LogError::Io(io),
            None => LogError::Io(std::io::Error::other(message)),
        }
    }
}

pub type Result<T> = std::result::Result<T, LogError>;
