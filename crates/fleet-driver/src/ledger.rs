//! Submission ledger.
//!
//! One `<dispatcher>,<submission-id>` line per accepted submission, in
//! submission order. The file is opened, appended to and closed for every
//! entry. Concurrent writers are not supported.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

/// A recorded submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub dispatcher: String,
    pub submission_id: String,
}

impl fmt::Display for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.dispatcher, self.submission_id)
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionLedger {
    path: PathBuf,
}

impl SubmissionLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry and flush it to disk.
    pub fn append(&self, entry: &Submission) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{entry}")?;
        file.sync_data()
    }

    /// Read every entry back, in file order.
    pub fn entries(&self) -> io::Result<Vec<Submission>> {
        std::fs::read_to_string(&self.path)?
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| {
                let (dispatcher, submission_id) = line.split_once(',').ok_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidData, format!("malformed ledger line {line:?}"))
                })?;
                Ok(Submission {
                    dispatcher: dispatcher.to_string(),
                    submission_id: submission_id.to_string(),
                })
            })
            .collect()
    }
}
