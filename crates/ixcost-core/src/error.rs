use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CostError {
    #[error("PDF text extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to open workbook: {0}")]
    Workbook(String),

    #[error("failed to load profile from {path}: {reason}")]
    ProfileLoad { path: PathBuf, reason: String },

    #[error("invalid profile: {0}")]
    ProfileInvalid(String),

    #[error("failed to build pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to write export to {path}: {reason}")]
    ExportWrite { path: PathBuf, reason: String },

    #[error("failed to quarantine {failed} file(s), first {path}: {reason}")]
    QuarantineMove {
        path: PathBuf,
        reason: String,
        failed: usize,
    },

    #[error("cost total for {generator_id} in {document_id} exceeds the representable range")]
    CostOverflow {
        document_id: String,
        generator_id: String,
    },

    #[error("no data extracted from {documents} document(s)")]
    NoDataExtracted { documents: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
