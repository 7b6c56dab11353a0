//! Delimited file helpers
//!
//! Curation files are hand-edited: quotes are literal characters, `#` lines are
//! comments, and rows are read flexibly so that shape errors can be reported
//! with a line number instead of aborting the reader.

use chiro_common::Result;
use csv::{QuoteStyle, Reader, ReaderBuilder, StringRecord, Writer, WriterBuilder};
use std::fs::File;
use std::path::Path;

/// Open a tab-separated file with a header row
pub fn reader(path: &Path) -> Result<Reader<File>> {
    delimited_reader(path, b'\t', true)
}

/// Open a delimited file with an explicit delimiter and header policy
pub fn delimited_reader(path: &Path, delimiter: u8, has_headers: bool) -> Result<Reader<File>> {
    Ok(ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_headers)
        .comment(Some(b'#'))
        .quoting(false)
        .flexible(true)
        .from_path(path)?)
}

/// Open a tab-separated writer that never quotes fields
pub fn writer(path: &Path) -> Result<Writer<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .from_path(path)?)
}

/// 1-based line of a record, 0 when unknown
pub fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// Field `index`, trimmed, or "" when the row is short
pub fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).map(str::trim).unwrap_or("")
}
