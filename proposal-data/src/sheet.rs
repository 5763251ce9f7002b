//! The profit-summary spreadsheet as a plain cell grid.
//!
//! Only the input cells of the summary are written and read back; the
//! spreadsheet computes its own totals from them. The grid is stored as CSV,
//! one row per spreadsheet row, with column A first.
//!
//! | Cells       | Contents |
//! |-------------|----------|
//! | C1 H1 N1 S1 U1 | customer, street, city, state, zip |
//! | E3 H3 M3    | squares, product, 10-year price per square |
//! | E5 H5       | roof type, warranty included |
//! | E7 H7       | labor days, submitted by |
//! | C11–C17     | units: silicone, patch, bleed trap, flashing, bleed block, drainage mat, foam |
//! | D11–D17     | unit prices for the same rows |
//! | D18 E19 D20 | RFC labor price, scarifying total, base labor price |
//! | E21 E22     | travel total, misc total |
//! | C40 C41     | proposal note, proposal language |

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use proposal_core::ProposalInputs;
use thiserror::Error;
use tracing::debug;

use crate::form::{FormFields, decode_form, field};

/// Errors raised by cell parsing and grid I/O.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("invalid cell reference '{0}'")]
    InvalidCell(String),

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

/// Zero-based row and column of an A1-style reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub row: usize,
    pub col: usize,
}

impl CellAddress {
    /// Parses references such as `C11` or `AA3`, case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use proposal_data::sheet::CellAddress;
    ///
    /// let cell = CellAddress::parse("C11").unwrap();
    /// assert_eq!((cell.row, cell.col), (10, 2));
    /// ```
    pub fn parse(reference: &str) -> Result<Self, SheetError> {
        let invalid = || SheetError::InvalidCell(reference.to_string());
        let reference = reference.trim();
        let split = reference
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (letters, digits) = reference.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let col = letters
            .chars()
            .map(|c| c.to_ascii_uppercase() as usize - 'A' as usize + 1)
            .try_fold(0usize, |acc, n| acc.checked_mul(26)?.checked_add(n))
            .ok_or_else(invalid)?;
        let row: usize = digits.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }

        Ok(Self {
            row: row - 1,
            col: col - 1,
        })
    }
}

impl FromStr for CellAddress {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut letters = Vec::new();
        let mut n = self.col;
        loop {
            letters.push(char::from(b'A' + (n % 26) as u8));
            if n < 26 {
                break;
            }
            n = n / 26 - 1;
        }
        let letters: String = letters.into_iter().rev().collect();
        write!(f, "{}{}", letters, self.row as u128 + 1)
    }
}

/// Field to cell mapping for the profit summary. `None` marks fields the
/// spreadsheet computes itself and that must never be overwritten.
pub const PROFIT_SUMMARY_CELLS: &[(&str, Option<&str>)] = &[
    (field::CUSTOMER_NAME, Some("C1")),
    (field::STREET_ADDRESS, Some("H1")),
    (field::CITY, Some("N1")),
    (field::STATE, Some("S1")),
    (field::ZIP_CODE, Some("U1")),
    (field::SQUARES, Some("E3")),
    (field::CURRENT_ROOF, Some("E5")),
    (field::PRODUCT, Some("H3")),
    (field::WARRANTY_INCL, Some("H5")),
    (field::SUBMITTED_BY, Some("H7")),
    (field::PRICE_PER_SQ_10, Some("M3")),
    (field::PRICE_PER_SQ_15, None),
    (field::PRICE_PER_SQ_20, None),
    (field::LABOR_DAYS, Some("E7")),
    (field::TOTAL_PRICE_10, None),
    (field::TOTAL_PRICE_15, None),
    (field::TOTAL_PRICE_20, None),
    (field::SILICONE_UNITS_10, Some("C11")),
    (field::GACO_PATCH_UNITS, Some("C12")),
    (field::BLEED_TRAP_UNITS, Some("C13")),
    (field::FLASHING_UNITS, Some("C14")),
    (field::BLEED_BLOCK_UNITS, Some("C15")),
    (field::DRAINAGE_MAT_UNITS, Some("C16")),
    (field::FOAM_UNITS, Some("C17")),
    (field::SILICONE_PRICE, Some("D11")),
    (field::GACO_PATCH_PRICE, Some("D12")),
    (field::BLEED_TRAP_PRICE, Some("D13")),
    (field::FLASHING_PRICE, Some("D14")),
    (field::BLEED_BLOCK_PRICE, Some("D15")),
    (field::DRAINAGE_MAT_PRICE, Some("D16")),
    (field::FOAM_PRICE, Some("D17")),
    (field::RFC_LABOR_PRICE, Some("D18")),
    (field::BASE_LABOR_PRICE, Some("D20")),
    (field::SCARIFYING_TOTAL, Some("E19")),
    (field::TRAVEL_TOTAL, Some("E21")),
    (field::MISC_TOTAL, Some("E22")),
    (field::ADJUSTED_COVERAGE, None),
    (field::OFFICE_FEE_PCT, None),
    (field::PROPOSAL_NOTE, Some("C40")),
    (field::PROPOSAL_LANGUAGE, Some("C41")),
];

/// Mapped fields paired with their parsed cell.
fn mapped_cells() -> Result<Vec<(&'static str, CellAddress)>, SheetError> {
    PROFIT_SUMMARY_CELLS
        .iter()
        .filter_map(|(name, cell)| cell.map(|c| (*name, c)))
        .map(|(name, cell)| -> Result<_, SheetError> { Ok((name, CellAddress::parse(cell)?)) })
        .collect()
}

/// A rectangular grid of cell text. Reads outside the populated area return
/// an empty string; writes grow the grid as needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetGrid {
    rows: Vec<Vec<String>>,
}

impl SheetGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        cell: CellAddress,
    ) -> &str {
        self.rows
            .get(cell.row)
            .and_then(|row| row.get(cell.col))
            .map_or("", String::as_str)
    }

    pub fn set(
        &mut self,
        cell: CellAddress,
        value: impl Into<String>,
    ) {
        if self.rows.len() <= cell.row {
            self.rows.resize_with(cell.row + 1, Vec::new);
        }
        let row = &mut self.rows[cell.row];
        if row.len() <= cell.col {
            row.resize_with(cell.col + 1, String::new);
        }
        row[cell.col] = value.into();
    }

    /// Parses a grid from CSV with no header row. Rows may differ in length.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::Csv`] if the text is not valid CSV.
    pub fn from_csv_str(input: &str) -> Result<Self, SheetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input.as_bytes());

        let rows = reader
            .records()
            .map(|record| -> Result<Vec<String>, SheetError> {
                Ok(record?.iter().map(str::to_string).collect())
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rows })
    }

    /// Serialises the grid as CSV, padding every row to the widest one.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::Csv`] if serialisation fails.
    pub fn to_csv_string(&self) -> Result<String, SheetError> {
        let width = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut out = csv::Writer::from_writer(Vec::new());
        for row in &self.rows {
            out.write_record(
                (0..width).map(|col| row.get(col).map_or("", String::as_str)),
            )?;
        }
        let bytes = out
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// # Errors
    ///
    /// Returns [`SheetError::Read`] or [`SheetError::Csv`].
    pub fn load(path: &Path) -> Result<Self, SheetError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SheetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_str(&contents)
    }

    /// # Errors
    ///
    /// Returns [`SheetError::Write`] or [`SheetError::Csv`].
    pub fn save(
        &self,
        path: &Path,
    ) -> Result<(), SheetError> {
        let text = self.to_csv_string()?;
        std::fs::write(path, text).map_err(|source| SheetError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Writes every mapped field of `fields` into `grid`. Fields missing from
/// `fields` clear their cell.
///
/// # Errors
///
/// Returns [`SheetError::InvalidCell`] if the cell table is malformed.
pub fn write_profit_summary(
    grid: &mut SheetGrid,
    fields: &FormFields,
) -> Result<(), SheetError> {
    for (name, cell) in mapped_cells()? {
        let value = fields.get(name).map_or("", String::as_str);
        grid.set(cell, value);
    }
    debug!("wrote profit summary cells");
    Ok(())
}

/// Rebuilds proposal inputs from the mapped cells of a profit summary.
///
/// The summary carries no office fee percentage, so it comes back blank and
/// the engine derives it from the salesperson.
///
/// # Errors
///
/// Returns [`SheetError::InvalidCell`] if the cell table is malformed.
pub fn read_profit_summary(grid: &SheetGrid) -> Result<ProposalInputs, SheetError> {
    let fields: FormFields = mapped_cells()?
        .into_iter()
        .map(|(name, cell)| (name.to_string(), grid.get(cell).to_string()))
        .collect();
    Ok(decode_form(&fields).current)
}
