use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parsing::normalize::normalize_text;

/// Which cost figure a profile extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostKind {
    TotalUpgrade,
    Interconnection,
}

impl CostKind {
    /// Column header used for the cost in exported tables.
    pub fn column_name(&self) -> &'static str {
        match self {
            CostKind::TotalUpgrade => "Total Upgrade Cost",
            CostKind::Interconnection => "Interconnection Cost",
        }
    }
}

impl fmt::Display for CostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostKind::TotalUpgrade => write!(f, "total-upgrade"),
            CostKind::Interconnection => write!(f, "interconnection"),
        }
    }
}

/// A study report as delivered by a text source: file name plus linear text.
///
/// The normalized view is computed once at load time; neither view changes
/// afterwards.
#[derive(Debug, Clone)]
pub struct Document {
    id: String,
    raw: String,
    normalized: String,
}

impl Document {
    pub fn new(id: impl Into<String>, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = normalize_text(&raw);
        Document {
            id: id.into(),
            raw,
            normalized,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

/// Byte offsets of a located section within one text view of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// A start marker found after the end marker. Slicing yields nothing.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Slice `text` by this span; inverted spans give an empty slice.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        if self.is_empty() {
            return "";
        }
        text.get(self.start..self.end).unwrap_or("")
    }
}

/// One extracted cost before aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub document_id: String,
    pub generator_id: String,
    pub cost: Decimal,
    pub kind: CostKind,
}

/// One export row: duplicates of (document, generator) already summed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedRow {
    pub document_id: String,
    pub generator_id: String,
    pub cost: Decimal,
}

/// The export-ready result of a batch for a single cost kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostTable {
    pub kind: CostKind,
    pub rows: Vec<AggregatedRow>,
}

impl CostTable {
    pub fn columns(&self) -> [&'static str; 3] {
        ["File Name", "Gen Number", self.kind.column_name()]
    }

    /// Sum of all rows, `None` if it exceeds the representable range.
    pub fn total(&self) -> Option<Decimal> {
        self.rows
            .iter()
            .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.cost))
    }
}
