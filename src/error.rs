//! Error taxonomy for the aggregation engine.
//!
//! The engine raises typed failures so callers can tell a missing source
//! apart from a corrupt one or from a blocked write. The orchestration layer
//! decides which of these are fatal; inside the library they are just values.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// No data source exists where one was expected: a site without snapshot
    /// files, or a missing input spreadsheet. Usually recoverable by
    /// substituting empty data for that unit of work.
    #[error("no data for '{what}' at {}", path.display())]
    NotFound { what: String, path: PathBuf },

    /// A source file exists but could not be parsed. Recoverable: treated as
    /// empty data for that source, with the path kept for diagnosis.
    #[error("failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    /// A write to disk failed. Not recoverable for that unit of work; usually
    /// a permissions problem or the target file is held open elsewhere.
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Spreadsheet rendering or saving failed (locked output file, invalid
    /// sheet state). Reported to the operator, never retried automatically.
    #[error("spreadsheet error on {}: {message}", path.display())]
    Spreadsheet { path: PathBuf, message: String },
}

impl Error {
    pub fn decode(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Error::Decode {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn spreadsheet(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Error::Spreadsheet {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Missing sources are substituted with empty data; everything else is a
    /// real failure for its unit of work.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
