//! Headerless CSV writing with atomic replacement of the destination.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{ReportError, Result};

fn writer_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'));
    builder
}

/// Write records to `sink` and hand the sink back, flushed.
pub(crate) fn write_records<W, R, F>(sink: W, records: R) -> Result<W>
where
    W: Write,
    R: IntoIterator,
    R::Item: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    let mut writer = writer_builder().from_writer(sink);
    for record in records {
        writer.write_record(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| ReportError::Csv(e.into_error().into()))
}

/// Write records to a temporary file beside `path`, then move it into place.
///
/// Readers never observe a partially written file.
pub(crate) fn write_records_atomic<R, F>(path: &Path, records: R) -> Result<()>
where
    R: IntoIterator,
    R::Item: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).map_err(|e| ReportError::io(dir, e))?;
    let tmp = write_records(tmp, records)?;
    tmp.persist(path)
        .map_err(|e| ReportError::io(path, e.error))?;
    Ok(())
}
