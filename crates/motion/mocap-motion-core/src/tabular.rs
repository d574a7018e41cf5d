//! Raw tabular cells, row cleaning, and a small CSV text reader.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::config::IngestConfig;
use crate::error::MotionError;
use crate::Result;

/// One cell of a raw table: either already numeric or free text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    /// True for an empty text cell.
    #[inline]
    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Text(s) if s.is_empty())
    }

    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Number(n) => Cow::Owned(n.to_string()),
            Cell::Text(s) => Cow::Borrowed(s),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// Rows after cleaning: the untouched header row plus numeric data rows.
///
/// Every data row is exactly as wide as the header. A `None` entry marks an
/// empty cell kept only when no fill value is configured.
#[derive(Clone, Debug, PartialEq)]
pub struct CleanedRows {
    pub header: Vec<Cell>,
    pub rows: Vec<Vec<Option<f64>>>,
}

/// Finite number in `text`. `NaN` and infinities count as non-numeric.
fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Normalize raw rows.
///
/// - trailing empty cells and then empty rows are dropped
/// - at least a header row and one data row must remain
/// - rows are cut to the header width; short rows repeat the value above
/// - data cells become numbers, bad cells take `fill_bad_cells_with`
/// - a row equal to the one before it is dropped
pub fn clean_rows(raw: &[Vec<Cell>], config: &IngestConfig) -> Result<CleanedRows> {
    let mut rows: Vec<Vec<Cell>> = raw
        .iter()
        .map(|row| {
            let mut row = row.clone();
            while row.last().is_some_and(Cell::is_blank) {
                row.pop();
            }
            row
        })
        .filter(|row| !row.is_empty())
        .collect();

    if rows.len() < 2 {
        return Err(MotionError::EmptyTable { rows: rows.len() });
    }

    let header = rows.remove(0);
    let width = header.len();

    let mut carried: Vec<Cell> = vec![Cell::Text(String::new()); width];
    let mut cleaned = Vec::with_capacity(rows.len());
    for (offset, mut row) in rows.into_iter().enumerate() {
        row.truncate(width);
        for (column, slot) in carried.iter_mut().enumerate() {
            match row.get(column) {
                Some(cell) => *slot = cell.clone(),
                None => row.push(slot.clone()),
            }
        }

        let row_number = offset + 1;
        let mut numeric = Vec::with_capacity(width);
        for (column, cell) in row.iter().enumerate() {
            let parsed = match cell {
                Cell::Number(n) => Some(*n).filter(|n| n.is_finite()),
                Cell::Text(text) => parse_number(text),
            };
            let value = match (parsed, config.fill_bad_cells_with) {
                (Some(n), _) => Some(n),
                (None, Some(fill)) => Some(fill),
                (None, None) if cell.as_text().trim().is_empty() => None,
                (None, None) => {
                    return Err(MotionError::NonNumericCell {
                        row: row_number,
                        column,
                        value: cell.as_text().into_owned(),
                    })
                }
            };
            numeric.push(value);
        }

        if config.remove_duplicate_rows && cleaned.last() == Some(&numeric) {
            continue;
        }
        cleaned.push(numeric);
    }

    Ok(CleanedRows {
        header,
        rows: cleaned,
    })
}

/// Split CSV text into rows of cells.
///
/// Quoted fields may contain commas and line breaks, and `""` inside a quoted
/// field is a literal quote. Rows end at LF, CR or CRLF. Data cells that read
/// as numbers become [`Cell::Number`]; the first row is kept as text.
pub fn parse_csv_text(text: &str) -> Vec<Vec<Cell>> {
    let mut out: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut pending = false;

    let mut chars = text.trim().chars().peekable();
    while let Some(c) = chars.next() {
        pending = true;
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => row.push(std::mem::take(&mut field)),
            '\r' | '\n' if !quoted => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                out.push(std::mem::take(&mut row));
                pending = false;
            }
            _ => field.push(c),
        }
    }
    if pending {
        row.push(field);
        out.push(row);
    }

    out.into_iter()
        .enumerate()
        .map(|(i, row)| {
            row.into_iter()
                .map(|cell| match parse_number(&cell) {
                    Some(n) if i > 0 => Cell::Number(n),
                    _ => Cell::Text(cell),
                })
                .collect()
        })
        .collect()
}
