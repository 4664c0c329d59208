//! CSV rendering and report file I/O.
use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use std::fs;
use std::path::Path;

/// Separator used when a list lands in a single CSV cell.
pub const LIST_SEPARATOR: &str = "; ";

/// Render rows as CSV with a header taken from the first row's field names.
///
/// An empty slice renders as an empty string so no file gets written for it.
pub fn to_csv_string<T: Serialize>(rows: &[T]) -> Result<String> {
    if rows.is_empty() {
        return Ok(String::new());
    }
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).context("serialize csv row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow!("flush csv: {}", err.error()))?;
    String::from_utf8(bytes).context("csv output is not valid UTF-8")
}

/// Parse CSV text with a header row into typed rows.
pub fn csv_to_rows<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    reader
        .deserialize()
        .enumerate()
        .map(|(idx, row)| row.with_context(|| format!("parse csv record {}", idx + 1)))
        .collect()
}

/// Write `content` to `path`. Empty content is skipped; returns whether a file was written.
pub fn write_to_file(path: &Path, content: &str) -> Result<bool> {
    if content.is_empty() {
        tracing::info!(path = %path.display(), "nothing to write");
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("write {}", path.display()))?;
    Ok(true)
}

pub fn read_from_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

/// Serialize a list as one CSV cell.
pub fn join_list<S: Serializer>(values: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&values.join(LIST_SEPARATOR))
}
