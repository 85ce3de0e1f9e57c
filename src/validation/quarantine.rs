//! Quarantine sinks for rejected claim rows

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{PipelineError, Result};

/// Destination for claim rows that failed validation
pub trait QuarantineSink: Send + Sync {
    /// Persist the rejected rows of one source file
    ///
    /// Returns where the rows went, or `None` if the sink does not keep them.
    /// Failures are reported as [`PipelineError::QuarantineWrite`].
    fn quarantine(&self, source: &Path, rows: &[Value]) -> Result<Option<PathBuf>>;
}

/// Writes rejected rows to `<dir>/<source file name>` as a JSON array
#[derive(Debug, Clone)]
pub struct DirectoryQuarantine {
    dir: PathBuf,
}

impl DirectoryQuarantine {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Quarantine file for a given claims file
    #[must_use]
    pub fn target_for(&self, source: &Path) -> PathBuf {
        self.dir
            .join(source.file_name().unwrap_or(OsStr::new("claims.json")))
    }
}

impl QuarantineSink for DirectoryQuarantine {
    fn quarantine(&self, source: &Path, rows: &[Value]) -> Result<Option<PathBuf>> {
        let target = self.target_for(source);
        let write_error = |source| PipelineError::QuarantineWrite {
            path: target.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_error)?;
        let mut writer = BufWriter::new(File::create(&target).map_err(write_error)?);
        serde_json::to_writer(&mut writer, rows).map_err(|e| write_error(e.into()))?;
        writer.flush().map_err(write_error)?;

        Ok(Some(target))
    }
}

/// Drops rejected rows; used by stages that only need the valid claims
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardQuarantine;

impl QuarantineSink for DiscardQuarantine {
    fn quarantine(&self, _source: &Path, _rows: &[Value]) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}
