//! palaver-extract
//!
//! Text extraction from uploaded documents (PDF, DOCX, XLSX, PPTX, CSV and
//! plain text) so their contents can be handed to the model as context.

pub mod error;
pub mod format;
pub mod text;

mod csv_rows;
mod docx;
mod pdf;
mod pptx;
mod xlsx;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use palaver_core::models::message::UploadedFile;
use tracing::{debug, info, warn};

pub use error::ExtractError;
pub use format::DocumentKind;

/// Extract the text of a document.
pub fn extract_text(bytes: &[u8], mime: &str, file_name: &str) -> Result<String, ExtractError> {
    let kind = DocumentKind::detect(mime, file_name).ok_or_else(|| ExtractError::Unsupported {
        file_type: mime.to_string(),
        extension: format::extension(file_name).unwrap_or_default().to_string(),
    })?;

    let text = match kind {
        DocumentKind::Pdf => pdf::extract(bytes)?,
        DocumentKind::Docx => docx::extract(bytes)?,
        DocumentKind::Xlsx => xlsx::extract(bytes)?,
        DocumentKind::Pptx => pptx::extract(bytes)?,
        DocumentKind::Csv => csv_rows::extract(bytes)?,
        DocumentKind::Text => {
            let (text, encoding) = text::decode_text(bytes)?;
            debug!(file_name, encoding = encoding.label(), "decoded text upload");
            text
        }
    };

    info!(
        file_name,
        format = kind.label(),
        bytes = bytes.len(),
        chars = text.chars().count(),
        "extracted document text"
    );
    Ok(text)
}

/// Decode a base64 upload body. Tolerates a `data:<mime>;base64,` prefix.
pub fn decode_base64(content: &str) -> Result<Vec<u8>, ExtractError> {
    let content = content.trim();
    let payload = match content.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => content,
    };
    Ok(STANDARD.decode(payload)?)
}

/// Extract text, turning any failure into a bracketed placeholder so the
/// conversation can go on without the file.
pub fn extract_or_placeholder(bytes: &[u8], mime: &str, file_name: &str) -> String {
    match extract_text(bytes, mime, file_name) {
        Ok(text) => text,
        Err(e) => placeholder(file_name, e),
    }
}

/// Text to put in front of the model for an uploaded file. Never fails.
pub fn decode_upload(file: &UploadedFile) -> String {
    match decode_base64(&file.file_content) {
        Ok(bytes) => extract_or_placeholder(&bytes, &file.file_type, &file.file_name),
        Err(e) => placeholder(&file.file_name, e),
    }
}

fn placeholder(file_name: &str, error: ExtractError) -> String {
    match error {
        ExtractError::Unsupported { file_type, .. } => {
            warn!(file_name, %file_type, "unsupported upload type");
            format!("[File {file_name}: unsupported type for text extraction ({file_type})]")
        }
        e => {
            warn!(file_name, error = %e, "failed to extract upload");
            format!("[Error reading file {file_name}: {e}]")
        }
    }
}
