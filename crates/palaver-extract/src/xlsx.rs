use std::io::Cursor;

use calamine::{Reader, Xlsx};

use crate::error::ExtractError;

/// Every sheet under a `=== Sheet: name ===` header, one tab-separated line
/// per non-blank row.
pub(crate) fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let mut parts = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        parts.push(format!("\n=== Sheet: {name} ===\n"));
        for row in range.rows() {
            let line = row
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\t");
            if !line.trim().is_empty() {
                parts.push(line);
            }
        }
    }

    Ok(parts.join("\n"))
}
