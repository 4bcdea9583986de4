use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::Record;
use crate::parsing::section::MissingMarker;
use crate::review::ReviewFlag;
use crate::tabular::LogicalField;

/// Why a document could not be parsed. All of these route it to quarantine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnparseableReason {
    /// No candidate heading bounded the section.
    SectionNotFound { missing: MissingMarker },
    /// Both headings were found but the end does not follow the start.
    EmptySection { start: usize, end: usize },
    /// The workbook has no sheet with the expected name.
    MissingSheet { sheet: String },
    /// None of a logical column's header spellings is present.
    MissingTabularAlias { field: LogicalField },
    /// The source collaborator could not produce text or rows.
    Unreadable { message: String },
}

impl fmt::Display for UnparseableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnparseableReason::SectionNotFound { missing } => {
                write!(f, "section not found (no {missing})")
            }
            UnparseableReason::EmptySection { start, end } => {
                write!(f, "section start ({start}) is not before its end ({end})")
            }
            UnparseableReason::MissingSheet { sheet } => write!(f, "sheet '{sheet}' not found"),
            UnparseableReason::MissingTabularAlias { field } => {
                write!(f, "no known header for the {field} column")
            }
            UnparseableReason::Unreadable { message } => write!(f, "unreadable: {message}"),
        }
    }
}

/// A successfully parsed document. Zero records is a valid result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub document_id: String,
    pub records: Vec<Record>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<ReviewFlag>,
}

/// Per-document result handed back to the orchestration layer.
///
/// The core never moves files; an `Unparseable` outcome is the decision that
/// the caller should.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    Parsed(ParsedDocument),
    Unparseable {
        document_id: String,
        reason: UnparseableReason,
    },
}

/// Instruction to relocate a source document into the quarantine area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarantineDecision {
    pub document_id: String,
    pub reason: UnparseableReason,
}

impl DocumentOutcome {
    pub fn unparseable(document_id: &str, reason: UnparseableReason) -> Self {
        DocumentOutcome::Unparseable {
            document_id: document_id.to_string(),
            reason,
        }
    }

    pub fn document_id(&self) -> &str {
        match self {
            DocumentOutcome::Parsed(doc) => &doc.document_id,
            DocumentOutcome::Unparseable { document_id, .. } => document_id,
        }
    }

    pub fn records(&self) -> &[Record] {
        match self {
            DocumentOutcome::Parsed(doc) => &doc.records,
            DocumentOutcome::Unparseable { .. } => &[],
        }
    }

    pub fn flags(&self) -> &[ReviewFlag] {
        match self {
            DocumentOutcome::Parsed(doc) => &doc.flags,
            DocumentOutcome::Unparseable { .. } => &[],
        }
    }

    pub fn is_unparseable(&self) -> bool {
        matches!(self, DocumentOutcome::Unparseable { .. })
    }

    /// The quarantine instruction for this document, if it needs one.
    pub fn quarantine(&self) -> Option<QuarantineDecision> {
        match self {
            DocumentOutcome::Parsed(_) => None,
            DocumentOutcome::Unparseable {
                document_id,
                reason,
            } => Some(QuarantineDecision {
                document_id: document_id.clone(),
                reason: reason.clone(),
            }),
        }
    }
}

/// Outcomes for a whole batch, in input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchResult {
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.outcomes.iter().flat_map(|o| o.records())
    }

    pub fn flags(&self) -> impl Iterator<Item = &ReviewFlag> {
        self.outcomes.iter().flat_map(|o| o.flags())
    }

    pub fn quarantine(&self) -> Vec<QuarantineDecision> {
        self.outcomes.iter().filter_map(|o| o.quarantine()).collect()
    }

    pub fn parsed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_unparseable()).count()
    }
}

impl FromIterator<DocumentOutcome> for BatchResult {
    fn from_iter<I: IntoIterator<Item = DocumentOutcome>>(iter: I) -> Self {
        BatchResult {
            outcomes: iter.into_iter().collect(),
        }
    }
}
