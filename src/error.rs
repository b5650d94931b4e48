//! Library error taxonomy.
//!
//! Only two conditions are hard failures: an unrecognized conversation mode
//! and unreadable chunk data. Everything content-related (stale ids, missing
//! full-code records, ambiguous parent symbols) degrades gracefully instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The caller supplied a mode identifier outside the enumerated set.
    #[error("unknown conversation mode `{0}`")]
    UnknownMode(String),

    /// A required chunk/embedding/store artifact could not be loaded.
    #[error("required data unavailable at {path}: {reason}")]
    DataUnavailable { path: PathBuf, reason: String },
}

impl Error {
    pub fn data_unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::DataUnavailable { path: path.into(), reason: reason.to_string() }
    }
}
