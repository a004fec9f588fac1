//! Append-only query log.
//!
//! One line per user utterance, UTF-8, no escaping. The file is opened,
//! appended and closed on every write; no handle is held between turns.
//! Single writer only: the supervisor task is the one caller.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::AppError;

pub const QUERY_LOG_FILENAME: &str = "user_queries.txt";

#[derive(Debug, Clone)]
pub struct QueryLog {
    path: PathBuf,
}

impl QueryLog {
    /// Point the log at `path`, creating its parent directory if needed.
    /// The file itself is created on first append.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::QueryLog(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, query: &str) -> Result<(), AppError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AppError::QueryLog(format!("cannot open {}: {e}", self.path.display())))?;
        writeln!(file, "{query}")
            .map_err(|e| AppError::QueryLog(format!("cannot write {}: {e}", self.path.display())))
    }
}
