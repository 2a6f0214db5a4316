//! Diagnostic dumps of formatted requests and raw responses.
//!
//! Dumps exist for offline schema validation. Writing one never affects the
//! result of the call that produced it.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

/// Which half of an exchange a dump file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpPart {
    /// The encoded request document.
    Request,
    /// The raw response bytes.
    Response,
}

impl DumpPart {
    fn suffix(self) -> &'static str {
        match self {
            Self::Request => "-request.xml",
            Self::Response => "-response.xml",
        }
    }
}

/// Shared file name prefix of one request/response pair:
/// `<YYYYmmdd-HHMMSS>-<uuid><RequestType>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpStem(String);

impl DumpStem {
    /// A fresh stem stamped with the local time and a random id.
    #[must_use]
    pub fn new(request_type: &str) -> Self {
        Self::at(request_type, Local::now().naive_local(), Uuid::new_v4())
    }

    /// A stem for a known time and id.
    #[must_use]
    pub fn at(request_type: &str, time: NaiveDateTime, id: Uuid) -> Self {
        Self(format!("{}-{id}{request_type}", time.format("%Y%m%d-%H%M%S")))
    }

    /// The stem text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DumpStem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directory dumps are written to.
#[derive(Debug, Clone)]
pub struct DumpTarget {
    dir: PathBuf,
}

impl DumpTarget {
    /// Dump into `dir`, created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The dump directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of one half of the pair named by `stem`.
    #[must_use]
    pub fn path(&self, stem: &DumpStem, part: DumpPart) -> PathBuf {
        self.dir.join(format!("{stem}{}", part.suffix()))
    }

    /// Write `contents`, returning the path on success.
    ///
    /// Failures are logged and swallowed.
    pub fn write(&self, stem: &DumpStem, part: DumpPart, contents: &[u8]) -> Option<PathBuf> {
        let path = self.path(stem, part);
        let result = fs::create_dir_all(&self.dir).and_then(|()| fs::write(&path, contents));
        match result {
            Ok(()) => {
                debug!(path = %path.display(), bytes = contents.len(), "wrote diagnostic dump");
                Some(path)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to write diagnostic dump");
                None
            }
        }
    }
}
