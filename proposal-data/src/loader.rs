//! CSV reader and writer for batches of proposal forms.
//!
//! ## CSV Format
//!
//! The first row names the form fields; every following row is one
//! submission. Column order does **not** matter and unknown columns are kept,
//! so a file written by [`write_records`] loads back unchanged. Header names
//! are case-sensitive and use the field names listed in [`crate::form::field`].
//!
//! ### Minimal example
//!
//! ```csv
//! customer_name,street_address,current_roof,product,squares,submitted_by
//! Harbor Storage,12 Dock Rd,Mod Bit,Gaco,47,Vern Abbott
//! ```
//!
//! Cells are trimmed, and a blank cell is the same as a missing field.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::form::FormFields;

/// Errors that can occur while reading or writing form CSV files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The underlying CSV reader or writer failed (bad structure, ragged
    /// rows, etc.).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Parse CSV text and return one [`FormFields`] per data row, in file order.
///
/// # Errors
///
/// Returns [`LoadError::Csv`] if the CSV is structurally invalid, for example
/// when a row has a different number of cells than the header.
pub fn load_from_str(input: &str) -> Result<Vec<FormFields>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let headers = reader.headers()?.clone();
    let rows = reader
        .records()
        .map(|record| -> Result<FormFields, LoadError> {
            let record = record?;
            Ok(headers
                .iter()
                .zip(record.iter())
                .filter(|(_, value)| !value.is_empty())
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect())
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(rows = rows.len(), "loaded form rows");
    Ok(rows)
}

/// Convenience wrapper: read a file from disk and delegate to [`load_from_str`].
///
/// # Errors
///
/// Returns [`LoadError::Read`] when the file cannot be read, or
/// [`LoadError::Csv`] when the contents are invalid.
pub fn load_from_file(path: &Path) -> Result<Vec<FormFields>, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}

/// Write `records` as CSV with a header covering every field present in any
/// record. Columns are sorted by name; missing cells are written blank.
///
/// # Errors
///
/// Returns [`LoadError::Csv`] if writing to `writer` fails.
pub fn write_records<W: io::Write>(
    writer: W,
    records: &[FormFields],
) -> Result<(), LoadError> {
    let header: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.keys().map(String::as_str))
        .collect();

    let mut out = csv::Writer::from_writer(writer);
    if header.is_empty() {
        out.flush().map_err(csv::Error::from)?;
        return Ok(());
    }

    out.write_record(&header)?;
    for record in records {
        out.write_record(
            header
                .iter()
                .map(|name| record.get(*name).map_or("", String::as_str)),
        )?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write `records` to a file at `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`LoadError::Write`] when the file cannot be created, or
/// [`LoadError::Csv`] when writing fails.
pub fn write_records_to_file(
    path: &Path,
    records: &[FormFields],
) -> Result<(), LoadError> {
    let file = std::fs::File::create(path).map_err(|source| LoadError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    write_records(io::BufWriter::new(file), records)
}

/// Render `records` as a CSV string.
///
/// # Errors
///
/// Returns [`LoadError::Csv`] if serialisation fails.
pub fn records_to_string(records: &[FormFields]) -> Result<String, LoadError> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, records)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
