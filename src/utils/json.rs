//! JSON report output

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::util::ensure_directory;
use crate::error::{PipelineError, Result};

/// Indentation of written reports
const INDENT: &[u8] = b" ";

/// Write `value` as indented JSON, creating parent directories as needed
pub fn write_json_report<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory(parent)?;
    }

    let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
    value
        .serialize(&mut serializer)
        .map_err(|e| PipelineError::json(path, e))?;
    writer.flush().map_err(|e| PipelineError::io(path, e))
}
