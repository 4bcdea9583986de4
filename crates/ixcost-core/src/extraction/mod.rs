pub mod pdftotext;
pub mod xlsx;

use crate::error::CostError;

/// Text extracted from a single page of a PDF.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
}

/// Trait for PDF text extraction backends.
pub trait TextExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, CostError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Linear document text: page lines joined by newlines, pages ordered by
/// page number whatever order the backend returned them in.
pub fn join_pages(pages: &[PageContent]) -> String {
    let mut ordered: Vec<&PageContent> = pages.iter().collect();
    ordered.sort_by_key(|p| p.page_number);
    ordered
        .iter()
        .map(|p| p.lines.join("\n"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_pages_keeps_line_structure() {
        let pages = vec![
            PageContent {
                page_number: 1,
                lines: vec!["Appendix E".into(), "GEN-2022-001".into()],
            },
            PageContent {
                page_number: 2,
                lines: vec!["Total".into()],
            },
        ];
        assert_eq!(join_pages(&pages), "Appendix E\nGEN-2022-001\nTotal");
    }

    #[test]
    fn test_join_pages_orders_by_page_number() {
        let pages = vec![
            PageContent {
                page_number: 3,
                lines: vec!["Appendix F".into()],
            },
            PageContent {
                page_number: 1,
                lines: vec!["Appendix E".into()],
            },
            PageContent {
                page_number: 2,
                lines: vec!["GEN-2022-001".into(), "Total".into()],
            },
        ];
        assert_eq!(join_pages(&pages), "Appendix E\nGEN-2022-001\nTotal\nAppendix F");
    }
}
