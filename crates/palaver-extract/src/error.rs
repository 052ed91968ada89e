use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type: {file_type} (.{extension})")]
    Unsupported { file_type: String, extension: String },

    #[error("invalid base64 content: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("no text found in {format} document")]
    Empty { format: &'static str },

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("spreadsheet extraction failed: {0}")]
    Spreadsheet(String),

    #[error("presentation extraction failed: {0}")]
    Presentation(String),

    #[error("CSV extraction failed: {0}")]
    Csv(String),

    #[error("could not decode text as UTF-8, Latin-1 or Windows-1252")]
    Undecodable,
}

impl From<zip::result::ZipError> for ExtractError {
    fn from(e: zip::result::ZipError) -> Self {
        ExtractError::Presentation(e.to_string())
    }
}

impl From<quick_xml::Error> for ExtractError {
    fn from(e: quick_xml::Error) -> Self {
        ExtractError::Presentation(e.to_string())
    }
}

impl From<csv::Error> for ExtractError {
    fn from(e: csv::Error) -> Self {
        ExtractError::Csv(e.to_string())
    }
}

impl From<calamine::XlsxError> for ExtractError {
    fn from(e: calamine::XlsxError) -> Self {
        ExtractError::Spreadsheet(e.to_string())
    }
}
