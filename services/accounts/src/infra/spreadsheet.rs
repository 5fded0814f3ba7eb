//! User import sheets (`.xlsx`, `.xls`, `.ods`).

use std::collections::HashMap;
use std::io::Cursor;

use anyhow::Context;
use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};

use crate::domain::types::ImportRow;
use crate::error::AccountsServiceError;

pub const REQUIRED_COLUMNS: [&str; 4] = ["email", "role", "username", "password"];

/// Parse an uploaded sheet on the blocking pool.
pub async fn read_user_sheet(bytes: Vec<u8>) -> Result<Vec<ImportRow>, AccountsServiceError> {
    tokio::task::spawn_blocking(move || parse_user_sheet(bytes))
        .await
        .context("spreadsheet parser task failed")?
}

/// Parse the first worksheet of `bytes` into import rows.
pub fn parse_user_sheet(bytes: Vec<u8>) -> Result<Vec<ImportRow>, AccountsServiceError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| AccountsServiceError::InvalidSpreadsheet(format!("Unreadable spreadsheet: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AccountsServiceError::InvalidSpreadsheet("Spreadsheet has no sheets".into()))?
        .map_err(|e| AccountsServiceError::InvalidSpreadsheet(format!("Unreadable sheet: {e}")))?;
    rows_from_range(&range)
}

/// Map a sheet range to rows keyed by trimmed, lowercased headers.
///
/// The header is the first row of the used range, wherever it sits on the
/// sheet. Fully blank rows are skipped but still counted, so `ImportRow::row`
/// is the 1-based row number a spreadsheet program shows for that line.
pub fn rows_from_range(range: &Range<Data>) -> Result<Vec<ImportRow>, AccountsServiceError> {
    let header_row = range.start().map_or(0, |(row, _)| row as usize);
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|cells| cells.iter().map(|c| cell_text(c).to_lowercase()).collect())
        .unwrap_or_default();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(|col| (*col).to_owned())
        .collect();
    if !missing.is_empty() {
        return Err(AccountsServiceError::MissingColumns(missing));
    }

    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();

    let mut out = Vec::new();
    for (offset, cells) in rows.enumerate() {
        if cells.iter().all(|c| cell_text(c).is_empty()) {
            continue;
        }
        let get = |name: &str| -> String {
            index
                .get(name)
                .and_then(|&i| cells.get(i))
                .map(cell_text)
                .unwrap_or_default()
        };
        let optional = |name: &str| Some(get(name)).filter(|v| !v.is_empty());
        out.push(ImportRow {
            row: header_row + offset + 2,
            email: get("email"),
            username: get("username"),
            role: get("role"),
            password: get("password"),
            picture: optional("picture"),
            department: optional("department"),
            roll_number: optional("roll_number"),
        });
    }
    Ok(out)
}

/// Cell value as trimmed text. Whole floats lose their `.0`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_owned(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Int(i) => i.to_string(),
        other => other.to_string().trim().to_owned(),
    }
}
