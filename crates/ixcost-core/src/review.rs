use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Important,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Important => write!(f, "important"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Situations where a document parsed but a format assumption looks shaky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewKind {
    /// Section found but no generator number was recognised in it.
    NoGeneratorMatches,
    /// A generator block held no cost pair, so no record was produced.
    EmptyBlock,
    /// A generator number sat inside an earlier block and was not extracted.
    SkippedGenerator,
    /// The allocated share of a cost line is larger than the requested cost.
    AllocatedExceedsRequested,
    /// More than one contextual match for the same generator.
    AmbiguousContextualMatch,
    /// A contextual match spanned several generator numbers and was credited to the nearest one.
    ReattributedMatch,
    /// An amount failed to parse and was left out of its sum.
    MalformedAmount,
    /// A spreadsheet row passed the filter but had no generator number.
    MissingGeneratorId,
}

impl ReviewKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            ReviewKind::NoGeneratorMatches
            | ReviewKind::SkippedGenerator
            | ReviewKind::AmbiguousContextualMatch
            | ReviewKind::MalformedAmount => Severity::Important,
            ReviewKind::EmptyBlock
            | ReviewKind::AllocatedExceedsRequested
            | ReviewKind::ReattributedMatch
            | ReviewKind::MissingGeneratorId => Severity::Info,
        }
    }
}

impl fmt::Display for ReviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReviewKind::NoGeneratorMatches => "no_generator_matches",
            ReviewKind::EmptyBlock => "empty_block",
            ReviewKind::SkippedGenerator => "skipped_generator",
            ReviewKind::AllocatedExceedsRequested => "allocated_exceeds_requested",
            ReviewKind::AmbiguousContextualMatch => "ambiguous_contextual_match",
            ReviewKind::ReattributedMatch => "reattributed_match",
            ReviewKind::MalformedAmount => "malformed_amount",
            ReviewKind::MissingGeneratorId => "missing_generator_id",
        };
        write!(f, "{s}")
    }
}

/// A note for manual review attached to a parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewFlag {
    pub document_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator_id: Option<String>,
    pub kind: ReviewKind,
    pub message: String,
    pub severity: Severity,
}

impl ReviewFlag {
    pub fn new(document_id: &str, kind: ReviewKind, message: impl Into<String>) -> Self {
        ReviewFlag {
            document_id: document_id.to_string(),
            generator_id: None,
            kind,
            message: message.into(),
            severity: kind.default_severity(),
        }
    }

    pub fn for_generator(mut self, generator_id: &str) -> Self {
        self.generator_id = Some(generator_id.to_string());
        self
    }
}

impl fmt::Display for ReviewFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.document_id)?;
        if let Some(ref id) = self.generator_id {
            write!(f, " {id}")?;
        }
        write!(f, ": {} ({})", self.message, self.kind)
    }
}
