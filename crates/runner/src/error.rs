//! Runner errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Engine(#[from] themis_engine::Error),

    #[error("unreadable venue timestamp '{0}'")]
    BadTimestamp(String),

    #[error("malformed fill record: {0}")]
    BadRecord(String),
}

pub type Result<T> = std::result::Result<T, Error>;
