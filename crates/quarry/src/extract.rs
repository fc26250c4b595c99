//! Text extraction for uploaded files.
//!
//! Dispatches on the filename extension: PDFs go through `pdf-extract`,
//! `.txt` and `.md` are decoded as UTF-8. Unsupported extensions are
//! rejected before anything touches the store.

/// File extensions accepted by the upload pipeline.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt", "md"];

/// Extraction error. Rejected uploads never reach persistence.
#[derive(Debug)]
pub enum ExtractError {
    UnsupportedFormat(String),
    Pdf(String),
    Utf8(String),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::UnsupportedFormat(name) => {
                write!(
                    f,
                    "unsupported file type: {} (supported: .pdf, .txt, .md)",
                    name
                )
            }
            ExtractError::Pdf(e) => write!(f, "PDF extraction failed: {}", e),
            ExtractError::Utf8(e) => write!(f, "text decoding failed: {}", e),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Extract plain UTF-8 text from raw file bytes, dispatching on the
/// extension of `filename`.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<String, ExtractError> {
    let ext = filename
        .rsplit('.')
        .next()
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => extract_pdf(bytes),
        "txt" | "md" if filename.contains('.') => decode_utf8(bytes),
        _ => Err(ExtractError::UnsupportedFormat(filename.to_string())),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

fn decode_utf8(bytes: &[u8]) -> Result<String, ExtractError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| ExtractError::Utf8(e.to_string()))
}
