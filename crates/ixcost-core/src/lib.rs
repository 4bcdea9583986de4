pub mod aggregate;
pub mod error;
pub mod extraction;
pub mod model;
pub mod outcome;
pub mod parsing;
pub mod pipeline;
pub mod profiles;
pub mod review;
pub mod tabular;

pub use aggregate::build_table;

use error::CostError;
use extraction::{join_pages, TextExtractor};
use model::Document;
use outcome::{BatchResult, DocumentOutcome, UnparseableReason};
use pipeline::{TextPipeline, WorkbookPipeline};
use tracing::{debug, warn};

/// Main API entry point: extract cost records from one PDF study report.
///
/// A missing `pdftotext` binary aborts the batch. Any other failure to read
/// the PDF is confined to this document, which comes back `Unparseable`.
pub fn extract_pdf(
    document_id: &str,
    pdf_bytes: &[u8],
    extractor: &dyn TextExtractor,
    pipeline: &TextPipeline,
) -> Result<DocumentOutcome, CostError> {
    match extractor.extract_pages(pdf_bytes) {
        Ok(pages) => {
            debug!(
                document = document_id,
                pages = pages.len(),
                last_page = pages.iter().map(|p| p.page_number).max().unwrap_or(0),
                "extracted text"
            );
            Ok(pipeline.extract(&Document::new(document_id, join_pages(&pages))))
        }
        Err(CostError::PdftotextNotFound) => Err(CostError::PdftotextNotFound),
        Err(e) => {
            warn!(
                document = document_id,
                backend = extractor.backend_name(),
                "text extraction failed: {e}"
            );
            Ok(DocumentOutcome::unparseable(
                document_id,
                UnparseableReason::Unreadable {
                    message: e.to_string(),
                },
            ))
        }
    }
}

/// Extract cost records from text that has already been linearized.
pub fn extract_text(document_id: &str, text: &str, pipeline: &TextPipeline) -> DocumentOutcome {
    pipeline.extract(&Document::new(document_id, text))
}

/// Extract cost records from one study workbook.
///
/// A file that is not a readable workbook comes back `Unparseable`.
pub fn extract_workbook(
    document_id: &str,
    bytes: &[u8],
    pipeline: &WorkbookPipeline,
) -> DocumentOutcome {
    match extraction::xlsx::load_workbook(document_id, bytes) {
        Ok(workbook) => pipeline.extract(&workbook),
        Err(e) => {
            warn!(document = document_id, "workbook could not be read: {e}");
            DocumentOutcome::unparseable(
                document_id,
                UnparseableReason::Unreadable {
                    message: e.to_string(),
                },
            )
        }
    }
}

/// Run every document of a batch through one pipeline, in input order.
pub fn extract_batch<'a, I>(documents: I, pipeline: &TextPipeline) -> BatchResult
where
    I: IntoIterator<Item = &'a Document>,
{
    documents.into_iter().map(|d| pipeline.extract(d)).collect()
}
