use std::path::Path;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PPTX_MIME: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";
pub const CSV_MIME: &str = "text/csv";

/// Extensions read as plain text whatever MIME type the client sent.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "json", "md", "js", "ts", "py", "java", "cpp", "c", "html", "css", "xml", "yaml",
    "yml",
];

/// Formats text can be extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Xlsx,
    Pptx,
    Csv,
    Text,
}

impl DocumentKind {
    /// Resolve the format of an upload. An exact MIME match wins, then the
    /// file extension (browsers often send `application/octet-stream`), then
    /// anything that looks like text.
    pub fn detect(mime: &str, file_name: &str) -> Option<Self> {
        let mime = normalize_mime(mime);
        let ext = extension(file_name).map(str::to_ascii_lowercase);
        let ext = ext.as_deref();

        Self::from_mime(&mime)
            .or_else(|| ext.and_then(Self::from_extension))
            .or_else(|| {
                let texty = mime.starts_with("text/")
                    || ext.is_some_and(|e| TEXT_EXTENSIONS.contains(&e));
                texty.then_some(DocumentKind::Text)
            })
    }

    fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            PDF_MIME => Some(DocumentKind::Pdf),
            DOCX_MIME => Some(DocumentKind::Docx),
            XLSX_MIME => Some(DocumentKind::Xlsx),
            PPTX_MIME => Some(DocumentKind::Pptx),
            CSV_MIME => Some(DocumentKind::Csv),
            _ => None,
        }
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "xlsx" => Some(DocumentKind::Xlsx),
            "pptx" => Some(DocumentKind::Pptx),
            "csv" => Some(DocumentKind::Csv),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Docx => "DOCX",
            DocumentKind::Xlsx => "XLSX",
            DocumentKind::Pptx => "PPTX",
            DocumentKind::Csv => "CSV",
            DocumentKind::Text => "text",
        }
    }
}

fn normalize_mime(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub fn extension(file_name: &str) -> Option<&str> {
    Path::new(file_name).extension()?.to_str()
}
