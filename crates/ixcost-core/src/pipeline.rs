use tracing::{debug, info, warn};

use crate::error::CostError;
use crate::model::{CostKind, Document};
use crate::outcome::{DocumentOutcome, ParsedDocument, UnparseableReason};
use crate::parsing::fields::{extract_summed_dual_value, ContextualMatcher, Extraction, PairSelection};
use crate::parsing::normalize::normalize_text;
use crate::parsing::section::locate_section;
use crate::parsing::segment::{segment_blocks, BlockBoundary, GeneratorPattern};
use crate::profiles::schema::{PolicyDef, TextProfile, WorkbookProfile};
use crate::review::{ReviewFlag, ReviewKind};
use crate::tabular::{group_costs, Workbook};

/// A text profile compiled for repeated use across a batch.
#[derive(Debug, Clone)]
pub struct TextPipeline {
    profile: TextProfile,
    strategy: Strategy,
}

#[derive(Debug, Clone)]
enum Strategy {
    /// Works on the raw view, which keeps generator numbers on their own line.
    Summed {
        pattern: GeneratorPattern,
        sentinel: String,
        selection: PairSelection,
        boundary: BlockBoundary,
    },
    /// Works on the normalized view with markers normalized the same way.
    Contextual {
        matcher: ContextualMatcher,
        start_markers: Vec<String>,
        end_markers: Vec<String>,
    },
}

impl TextPipeline {
    pub fn new(profile: TextProfile) -> Result<Self, CostError> {
        let pattern = GeneratorPattern::new(&profile.generator.prefixes)?;
        let strategy = match &profile.policy {
            PolicyDef::SummedDualValue {
                sentinel,
                pair_selection,
                block_boundary,
            } => Strategy::Summed {
                pattern,
                sentinel: sentinel.clone(),
                selection: *pair_selection,
                boundary: *block_boundary,
            },
            PolicyDef::ContextualSingleValue {
                keyword,
                max_gap,
                duplicates,
            } => Strategy::Contextual {
                matcher: ContextualMatcher::new(
                    &pattern,
                    keyword,
                    *max_gap,
                    *duplicates,
                    profile.cost_kind,
                )?,
                start_markers: profile.start_markers.iter().map(|m| normalize_text(m)).collect(),
                end_markers: profile.end_markers.iter().map(|m| normalize_text(m)).collect(),
            },
        };
        Ok(TextPipeline { profile, strategy })
    }

    pub fn kind(&self) -> CostKind {
        self.profile.cost_kind
    }

    pub fn profile(&self) -> &TextProfile {
        &self.profile
    }

    /// Run one document through locate, segment and extract.
    ///
    /// Never fails: a document without its section comes back `Unparseable`.
    pub fn extract(&self, document: &Document) -> DocumentOutcome {
        let id = document.id();
        let (view, starts, ends) = match &self.strategy {
            Strategy::Summed { .. } => (
                document.raw(),
                self.profile.start_markers.as_slice(),
                self.profile.end_markers.as_slice(),
            ),
            Strategy::Contextual {
                start_markers,
                end_markers,
                ..
            } => (
                document.normalized(),
                start_markers.as_slice(),
                end_markers.as_slice(),
            ),
        };

        let span = match locate_section(view, starts, ends) {
            Ok(span) => span,
            Err(not_found) => {
                warn!(document = id, missing = %not_found.missing, "section not found");
                return DocumentOutcome::unparseable(
                    id,
                    UnparseableReason::SectionNotFound {
                        missing: not_found.missing,
                    },
                );
            }
        };
        if span.is_empty() {
            warn!(document = id, start = span.start, end = span.end, "section is empty");
            return DocumentOutcome::unparseable(
                id,
                UnparseableReason::EmptySection {
                    start: span.start,
                    end: span.end,
                },
            );
        }

        let section = span.slice(view);
        debug!(document = id, start = span.start, end = span.end, "located section");

        let mut extraction = match &self.strategy {
            Strategy::Summed {
                pattern,
                sentinel,
                selection,
                boundary,
            } => {
                let segmentation = segment_blocks(section, pattern, sentinel, *boundary);
                debug!(
                    document = id,
                    blocks = segmentation.blocks.len(),
                    skipped = segmentation.skipped.len(),
                    "segmented section"
                );
                extract_summed_dual_value(id, section, &segmentation, *selection, self.kind())
            }
            Strategy::Contextual { matcher, .. } => matcher.extract(id, section),
        };

        if extraction.records.is_empty() && !has_generator_flags(&extraction) {
            extraction.flags.push(ReviewFlag::new(
                id,
                ReviewKind::NoGeneratorMatches,
                "section contains no recognizable generator entries",
            ));
        }

        finish(id, extraction)
    }
}

/// Flags that already name a generator mean the section was not blank.
fn has_generator_flags(extraction: &Extraction) -> bool {
    extraction.flags.iter().any(|f| f.generator_id.is_some())
}

/// A workbook profile bound to its cost kind.
#[derive(Debug, Clone)]
pub struct WorkbookPipeline {
    profile: WorkbookProfile,
}

impl WorkbookPipeline {
    pub fn new(profile: WorkbookProfile) -> Self {
        WorkbookPipeline { profile }
    }

    pub fn kind(&self) -> CostKind {
        self.profile.cost_kind
    }

    pub fn profile(&self) -> &WorkbookProfile {
        &self.profile
    }

    /// Resolve the sheet and its columns, then group costs per generator.
    pub fn extract(&self, workbook: &Workbook) -> DocumentOutcome {
        let id = workbook.id.as_str();
        let Some(sheet) = workbook.sheets.get(&self.profile.sheet) else {
            warn!(document = id, sheet = %self.profile.sheet, "sheet not found");
            return DocumentOutcome::unparseable(
                id,
                UnparseableReason::MissingSheet {
                    sheet: self.profile.sheet.clone(),
                },
            );
        };

        let columns = match self.profile.aliases.resolve(&sheet.headers) {
            Ok(columns) => columns,
            Err(field) => {
                warn!(document = id, %field, "no header alias matched");
                return DocumentOutcome::unparseable(
                    id,
                    UnparseableReason::MissingTabularAlias { field },
                );
            }
        };
        debug!(document = id, ?columns, "resolved columns");

        let extraction = group_costs(id, sheet, &columns, &self.profile.keywords, self.kind());
        finish(id, extraction)
    }
}

fn finish(id: &str, extraction: Extraction) -> DocumentOutcome {
    info!(
        document = id,
        records = extraction.records.len(),
        flags = extraction.flags.len(),
        "parsed document"
    );
    DocumentOutcome::Parsed(ParsedDocument {
        document_id: id.to_string(),
        records: extraction.records,
        flags: extraction.flags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::builtin::{load_text_preset, load_workbook_preset};
    use crate::tabular::{Cell, Sheet};
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn total_upgrade() -> TextPipeline {
        TextPipeline::new(load_text_preset("total-upgrade").unwrap()).unwrap()
    }

    fn interconnection() -> TextPipeline {
        TextPipeline::new(load_text_preset("interconnection").unwrap()).unwrap()
    }

    #[test]
    fn test_summed_policy_end_to_end() {
        let text = "Intro\nAppendix E. - Cost Allocation Per Request\nGEN-2022-001\nLine A $1,000.00 $500.00\nLine B $200.00 $100.00\nTotal $1,200.00 $600.00\nGEN-2022-002\nLine A $50.00 $25.00\nTotal\nAppendix F. - Cost Allocation Per Upgrade Facility\n";
        let outcome = total_upgrade().extract(&Document::new("s.pdf", text));
        let records = outcome.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].cost, dec!(600.00));
        assert_eq!(records[1].cost, dec!(25.00));
        assert_eq!(records[0].kind, CostKind::TotalUpgrade);
    }

    #[test]
    fn test_missing_section_is_unparseable() {
        let outcome = total_upgrade().extract(&Document::new("old.pdf", "nothing relevant"));
        assert!(outcome.is_unparseable());
        assert!(outcome.records().is_empty());
    }

    #[test]
    fn test_inverted_section_is_unparseable() {
        let text = "Appendix F. Cost Allocation by Upgrade\nGEN-2022-001\n$1.00 $1.00\nAppendix E. Cost Allocation Per Request\n";
        let outcome = total_upgrade().extract(&Document::new("inv.pdf", text));
        match outcome {
            DocumentOutcome::Unparseable { reason, .. } => {
                assert!(matches!(reason, UnparseableReason::EmptySection { .. }))
            }
            other => panic!("expected unparseable, got {other:?}"),
        }
    }

    #[test]
    fn test_section_without_generators_flagged() {
        let text = "Appendix E. Cost Allocation Per Request\nno requests this cycle\nAppendix F. Cost Allocation by Upgrade";
        let outcome = total_upgrade().extract(&Document::new("e.pdf", text));
        assert!(!outcome.is_unparseable());
        assert!(outcome.records().is_empty());
        assert_eq!(outcome.flags()[0].kind, ReviewKind::NoGeneratorMatches);
    }

    #[test]
    fn test_contextual_policy_on_wrapped_text() {
        let text = "E: Cost Allocation per Interconnection\nRequest\nGEN-2021-010 Inter-\nconnection Facilities $2,500,000.00\nASGI-2023-045 Interconnection Costs $75,000\nAppendix F. Cost Allocation by Upgrade";
        let outcome = interconnection().extract(&Document::new("ic.pdf", text));
        let records = outcome.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].generator_id, "GEN-2021-010");
        assert_eq!(records[0].cost, dec!(2500000.00));
        assert_eq!(records[1].generator_id, "ASGI-2023-045");
        assert_eq!(records[1].cost, dec!(75000));
    }

    fn workbook(headers: &[&str], rows: Vec<Vec<Cell>>) -> Workbook {
        let mut sheets = BTreeMap::new();
        sheets.insert(
            "Assigned Upgrade Costs".to_string(),
            Sheet {
                headers: headers.iter().map(|s| s.to_string()).collect(),
                rows,
            },
        );
        Workbook {
            id: "study.xlsx".into(),
            sheets,
        }
    }

    #[test]
    fn test_workbook_2016_vintage_uses_upgrade_name() {
        let pipeline =
            WorkbookPipeline::new(load_workbook_preset("workbook-interconnection-2016").unwrap());
        let wb = workbook(
            &["Gen Number ", "Upgrade Name", "Allocated Cost "],
            vec![vec![
                Cell::Text("GEN-2016-001".into()),
                Cell::Text("Interconnection Costs".into()),
                Cell::Number(dec!(42)),
            ]],
        );
        let outcome = pipeline.extract(&wb);
        assert_eq!(outcome.records().len(), 1);
        assert_eq!(outcome.records()[0].cost, dec!(42));
    }

    #[test]
    fn test_current_preset_ignores_generic_interconnection_costs_rows() {
        let pipeline = WorkbookPipeline::new(load_workbook_preset("workbook-interconnection").unwrap());
        let wb = workbook(
            &["Gen Number", "Upgrade Details", "Allocated Cost"],
            vec![
                vec![
                    Cell::Text("GEN-2022-001".into()),
                    Cell::Text("Interconnection Costs".into()),
                    Cell::Number(dec!(500)),
                ],
                vec![
                    Cell::Text("GEN-2022-001".into()),
                    Cell::Text("Facilitate the interconnection of GEN-2022-001".into()),
                    Cell::Number(dec!(42)),
                ],
            ],
        );
        let outcome = pipeline.extract(&wb);
        assert_eq!(outcome.records().len(), 1);
        assert_eq!(outcome.records()[0].cost, dec!(42));
    }

    #[test]
    fn test_workbook_without_sheet_is_unparseable() {
        let pipeline = WorkbookPipeline::new(load_workbook_preset("workbook-interconnection").unwrap());
        let wb = Workbook {
            id: "other.xlsx".into(),
            sheets: BTreeMap::new(),
        };
        assert!(pipeline.extract(&wb).is_unparseable());
    }

    #[test]
    fn test_workbook_missing_alias_is_unparseable() {
        let pipeline = WorkbookPipeline::new(load_workbook_preset("workbook-interconnection").unwrap());
        let wb = workbook(&["Gen Number", "Upgrade Details", "Cost"], vec![]);
        match pipeline.extract(&wb) {
            DocumentOutcome::Unparseable { reason, .. } => assert_eq!(
                reason,
                UnparseableReason::MissingTabularAlias {
                    field: crate::tabular::LogicalField::AllocatedCost
                }
            ),
            other => panic!("expected unparseable, got {other:?}"),
        }
    }
}
