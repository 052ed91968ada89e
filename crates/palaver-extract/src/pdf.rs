use std::panic;

use crate::error::ExtractError;

pub(crate) fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    // The parser panics on some malformed inputs.
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| ExtractError::Pdf("parser panicked".to_string()))?
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let text = pages.join("\n");
    if text.trim().is_empty() {
        return Err(ExtractError::Empty { format: "PDF" });
    }
    Ok(text)
}
