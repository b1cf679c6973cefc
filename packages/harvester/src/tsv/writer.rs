//! TSV writer for extracted record tables.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{HarvesterError, Result};
use crate::types::{Record, RecordKind};

/// Replace tabs and line breaks so a value stays inside one cell.
///
/// # Examples
/// ```
/// use chemidplus_harvester::tsv::sanitize_field;
///
/// assert_eq!(sanitize_field("Aspirin"), "Aspirin");
/// assert_eq!(sanitize_field("a\tb\r\nc"), "a b  c");
/// ```
pub fn sanitize_field(value: &str) -> Cow<'_, str> {
    if value.contains(['\t', '\r', '\n']) {
        Cow::Owned(value.replace(['\t', '\r', '\n'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

/// Render one record as a newline-terminated TSV line.
pub fn render_row(record: &Record) -> String {
    format!(
        "{}\t{}\t{}\n",
        sanitize_field(&record.molecule),
        sanitize_field(&record.value),
        sanitize_field(&record.source_list())
    )
}

/// A table fully written to its temp file but not yet moved into place.
///
/// Dropping it without calling [`StagedTable::commit`] removes the temp file
/// and leaves the destination untouched.
#[derive(Debug)]
#[must_use = "a staged table is discarded unless committed"]
pub struct StagedTable {
    path: PathBuf,
    temp_file: PathBuf,
    rows: usize,
    committed: bool,
}

impl StagedTable {
    /// Number of data rows written.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Rename the temp file over the destination.
    pub fn commit(mut self) -> Result<usize> {
        // On Windows, rename fails if the destination already exists
        #[cfg(target_os = "windows")]
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|source| write_error(&self.path, source))?;
        }

        fs::rename(&self.temp_file, &self.path)
            .map_err(|source| write_error(&self.path, source))?;
        self.committed = true;

        tracing::info!(path = %self.path.display(), rows = self.rows, "Wrote table");
        Ok(self.rows)
    }
}

impl Drop for StagedTable {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp_file);
        }
    }
}

/// Write a header and all records to a hidden temp file next to `path`.
///
/// `rows` holds one list per chemical; empty lists contribute nothing. The
/// temp file is synced before this returns; nothing at `path` changes until
/// the returned table is committed.
pub fn stage_records<I>(path: &Path, kind: RecordKind, rows: I) -> Result<StagedTable>
where
    I: IntoIterator<Item = Vec<Record>>,
{
    if path.is_dir() {
        return Err(write_error(
            path,
            std::io::Error::other("destination is a directory"),
        ));
    }

    let temp_file = temp_path(path);
    match write_to(&temp_file, kind, rows) {
        Ok(rows) => Ok(StagedTable {
            path: path.to_path_buf(),
            temp_file,
            rows,
            committed: false,
        }),
        Err(source) => {
            let _ = fs::remove_file(&temp_file);
            Err(write_error(path, source))
        }
    }
}

/// Write a header and all records to `path`.
///
/// Uses atomic write pattern: writes to a hidden temp file next to the
/// destination, syncs it, then renames it over any existing file.
///
/// # Returns
/// Number of data rows written
pub fn write_records<I>(path: &Path, kind: RecordKind, rows: I) -> Result<usize>
where
    I: IntoIterator<Item = Vec<Record>>,
{
    stage_records(path, kind, rows)?.commit()
}

fn write_error(path: &Path, source: std::io::Error) -> HarvesterError {
    HarvesterError::Write {
        path: path.to_path_buf(),
        source,
    }
}

fn write_to<I>(temp_file: &Path, kind: RecordKind, rows: I) -> std::io::Result<usize>
where
    I: IntoIterator<Item = Vec<Record>>,
{
    let file = File::create(temp_file)?;
    let mut out = BufWriter::new(file);
    out.write_all(kind.header().as_bytes())?;

    let mut count = 0;
    for record in rows.into_iter().flatten() {
        out.write_all(render_row(&record).as_bytes())?;
        count += 1;
    }

    let file = out.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(count)
}

/// `dir/name` -> `dir/.name.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
