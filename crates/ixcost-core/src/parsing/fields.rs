use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::model::{CostKind, Record};
use crate::parsing::segment::{GeneratorPattern, Segmentation};
use crate::parsing::values::{find_cost_pairs, parse_amount, CostPair};
use crate::review::{ReviewFlag, ReviewKind};

/// Which amount of a cost pair is the generator's share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairSelection {
    First,
    /// The allocated share, printed after the requested cost.
    #[default]
    Second,
}

impl PairSelection {
    fn select(&self, pair: &CostPair) -> Decimal {
        match self {
            PairSelection::First => pair.first,
            PairSelection::Second => pair.second,
        }
    }
}

/// What to do when one generator has several contextual matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateMatches {
    /// Keep every match; aggregation sums them.
    #[default]
    KeepAll,
    /// Keep the first match per generator.
    FirstOnly,
}

/// Records and review flags produced from one document.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<Record>,
    pub flags: Vec<ReviewFlag>,
}

/// Summed dual-value policy: one total per generator block.
///
/// Every adjacent amount pair in a block contributes its selected amount. A
/// block without any usable pair produces no record.
pub fn extract_summed_dual_value(
    document_id: &str,
    section: &str,
    segmentation: &Segmentation,
    selection: PairSelection,
    kind: CostKind,
) -> Extraction {
    let mut out = Extraction::default();

    for skipped in &segmentation.skipped {
        out.flags.push(
            ReviewFlag::new(
                document_id,
                ReviewKind::SkippedGenerator,
                format!(
                    "generator at offset {} lies inside a block ending at {}",
                    skipped.offset, skipped.consumed_until
                ),
            )
            .for_generator(&skipped.generator_id),
        );
    }

    for block in &segmentation.blocks {
        let id = block.generator_id.as_str();
        let mut total = Decimal::ZERO;
        let mut summed = 0usize;

        for pair in find_cost_pairs(block.text(section)) {
            match pair {
                Ok(pair) => {
                    if selection == PairSelection::Second && pair.second > pair.first {
                        out.flags.push(
                            ReviewFlag::new(
                                document_id,
                                ReviewKind::AllocatedExceedsRequested,
                                format!("allocated {} exceeds requested {}", pair.second, pair.first),
                            )
                            .for_generator(id),
                        );
                    }
                    let amount = selection.select(&pair);
                    match total.checked_add(amount) {
                        Some(sum) => {
                            total = sum;
                            summed += 1;
                        }
                        None => {
                            warn!(document = document_id, generator = id, %amount, "block total overflows");
                            out.flags.push(
                                ReviewFlag::new(
                                    document_id,
                                    ReviewKind::MalformedAmount,
                                    format!("amount {amount} overflows the block total {total}; excluded"),
                                )
                                .for_generator(id),
                            );
                        }
                    }
                }
                Err(malformed) => {
                    warn!(document = document_id, generator = id, "{malformed}");
                    out.flags.push(
                        ReviewFlag::new(document_id, ReviewKind::MalformedAmount, malformed.to_string())
                            .for_generator(id),
                    );
                }
            }
        }

        if summed == 0 {
            out.flags.push(
                ReviewFlag::new(document_id, ReviewKind::EmptyBlock, "no cost pairs in block")
                    .for_generator(id),
            );
            continue;
        }

        debug!(
            document = document_id,
            generator = id,
            pairs = summed,
            %total,
            "summed generator block"
        );
        out.records.push(Record {
            document_id: document_id.to_string(),
            generator_id: id.to_string(),
            cost: total,
            kind,
        });
    }

    out
}

/// Contextual single-value matcher: a generator number followed, within a
/// bounded gap, by a keyword and then one dollar amount.
#[derive(Debug, Clone)]
pub struct ContextualMatcher {
    pattern: Regex,
    generator: GeneratorPattern,
    duplicates: DuplicateMatches,
    kind: CostKind,
}

impl ContextualMatcher {
    pub fn new(
        generator: &GeneratorPattern,
        keyword: &str,
        max_gap: usize,
        duplicates: DuplicateMatches,
        kind: CostKind,
    ) -> Result<Self, regex::Error> {
        let source = format!(
            r"(?s)\b(?P<id>{body})\b.{{0,{max_gap}}}?(?P<kw>{kw})\**.{{0,{max_gap}}}?\$\s?(?P<amount>\d+(?:,\d+)*(?:\.\d+)?)",
            body = generator.body(),
            kw = regex::escape(keyword),
        );
        Ok(ContextualMatcher {
            pattern: Regex::new(&source)?,
            generator: generator.clone(),
            duplicates,
            kind,
        })
    }

    /// Run the matcher over whitespace-normalized section text.
    pub fn extract(&self, document_id: &str, text: &str) -> Extraction {
        let mut out = Extraction::default();
        let mut per_generator: BTreeMap<String, usize> = BTreeMap::new();

        for caps in self.pattern.captures_iter(text) {
            let (Some(id), Some(kw), Some(amount)) =
                (caps.name("id"), caps.name("kw"), caps.name("amount"))
            else {
                continue;
            };

            // The lazy gap can run over later generator numbers; credit the
            // amount to the one closest to the keyword.
            let gap = &text[id.end()..kw.start()];
            let generator_id = match self.generator.find_inline(gap).last() {
                Some(nearer) => {
                    out.flags.push(
                        ReviewFlag::new(
                            document_id,
                            ReviewKind::ReattributedMatch,
                            format!("match started at {} but keyword follows {}", id.as_str(), nearer),
                        )
                        .for_generator(nearer),
                    );
                    nearer.to_string()
                }
                None => id.as_str().to_string(),
            };

            let cost = match parse_amount(amount.as_str()) {
                Ok(cost) => cost,
                Err(malformed) => {
                    warn!(document = document_id, generator = %generator_id, "{malformed}");
                    out.flags.push(
                        ReviewFlag::new(document_id, ReviewKind::MalformedAmount, malformed.to_string())
                            .for_generator(&generator_id),
                    );
                    continue;
                }
            };

            let seen = per_generator.entry(generator_id.clone()).or_insert(0);
            *seen += 1;
            if *seen > 1 && self.duplicates == DuplicateMatches::FirstOnly {
                continue;
            }

            out.records.push(Record {
                document_id: document_id.to_string(),
                generator_id,
                cost,
                kind: self.kind,
            });
        }

        for (generator_id, count) in per_generator.iter().filter(|(_, c)| **c > 1) {
            let action = match self.duplicates {
                DuplicateMatches::KeepAll => "all kept and summed",
                DuplicateMatches::FirstOnly => "first kept",
            };
            out.flags.push(
                ReviewFlag::new(
                    document_id,
                    ReviewKind::AmbiguousContextualMatch,
                    format!("{count} interconnection mentions ({action})"),
                )
                .for_generator(generator_id),
            );
        }

        debug!(
            document = document_id,
            records = out.records.len(),
            "contextual matches"
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::segment::{segment_blocks, BlockBoundary};
    use rust_decimal_macros::dec;

    fn summed(section: &str, selection: PairSelection) -> Extraction {
        let seg = segment_blocks(
            section,
            &GeneratorPattern::standard(),
            "Total",
            BlockBoundary::Sentinel,
        );
        extract_summed_dual_value("study.pdf", section, &seg, selection, CostKind::TotalUpgrade)
    }

    fn contextual(text: &str, duplicates: DuplicateMatches) -> Extraction {
        ContextualMatcher::new(
            &GeneratorPattern::standard(),
            "Interconnection",
            200,
            duplicates,
            CostKind::Interconnection,
        )
        .unwrap()
            .extract("study.pdf", text)
    }

    #[test]
    fn test_second_amount_selected() {
        let out = summed("GEN-2022-001\nUpgrade $1,000.00 $500.00\nTotal", PairSelection::Second);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].cost, dec!(500.00));
        assert_eq!(out.records[0].kind, CostKind::TotalUpgrade);
    }

    #[test]
    fn test_first_amount_selected_when_overridden() {
        let out = summed("GEN-2022-001\nUpgrade $1,000.00 $500.00\nTotal", PairSelection::First);
        assert_eq!(out.records[0].cost, dec!(1000.00));
    }

    #[test]
    fn test_pairs_summed_per_block() {
        let section = "GEN-2022-001\n\
                       Line A $1,000.00 $500.00\n\
                       Line B $2,000.00 $250.50\n\
                       Total $3,000.00 $750.50\n\
                       GEN-2022-002\n\
                       Line C $400.00 $400.00\n\
                       Total $400.00 $400.00\n";
        let out = summed(section, PairSelection::Second);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].generator_id, "GEN-2022-001");
        assert_eq!(out.records[0].cost, dec!(750.50));
        assert_eq!(out.records[1].generator_id, "GEN-2022-002");
        assert_eq!(out.records[1].cost, dec!(400.00));
    }

    #[test]
    fn test_block_without_pairs_yields_no_record() {
        let out = summed("GEN-2022-001\nNo costs assigned\nTotal", PairSelection::Second);
        assert!(out.records.is_empty());
        assert_eq!(out.flags.len(), 1);
        assert_eq!(out.flags[0].kind, ReviewKind::EmptyBlock);
    }

    #[test]
    fn test_allocated_exceeding_requested_flagged() {
        let out = summed("GEN-2022-001\n$100.00 $900.00\nTotal", PairSelection::Second);
        assert_eq!(out.records[0].cost, dec!(900.00));
        assert!(out
            .flags
            .iter()
            .any(|f| f.kind == ReviewKind::AllocatedExceedsRequested));
    }

    #[test]
    fn test_malformed_amount_excluded_from_sum() {
        let section = "GEN-2022-001\n\
                       $10.00 $5.00\n\
                       $1.00 $99999999999999999999999999999999999.00\n\
                       Total";
        let out = summed(section, PairSelection::Second);
        assert_eq!(out.records[0].cost, dec!(5.00));
        assert!(out.flags.iter().any(|f| f.kind == ReviewKind::MalformedAmount));
    }

    #[test]
    fn test_skipped_generator_flagged() {
        let section = "GEN-2022-001\n$10.00 $5.00\nGEN-2022-002\n$3.00 $1.00\nTotal";
        let out = summed(section, PairSelection::Second);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].cost, dec!(6.00));
        let flag = out
            .flags
            .iter()
            .find(|f| f.kind == ReviewKind::SkippedGenerator)
            .unwrap();
        assert_eq!(flag.generator_id.as_deref(), Some("GEN-2022-002"));
    }

    #[test]
    fn test_contextual_single_match_per_generator() {
        let text = "GEN-2022-001 Network Interconnection Facilities $1,250,000.00 \
                    GEN-2022-002 Interconnection* cost $300.00";
        let out = contextual(text, DuplicateMatches::KeepAll);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].generator_id, "GEN-2022-001");
        assert_eq!(out.records[0].cost, dec!(1250000.00));
        assert_eq!(out.records[0].kind, CostKind::Interconnection);
        assert_eq!(out.records[1].generator_id, "GEN-2022-002");
        assert_eq!(out.records[1].cost, dec!(300.00));
        assert!(out.flags.is_empty());
    }

    #[test]
    fn test_contextual_gap_is_bounded() {
        let filler = "x".repeat(500);
        let text = format!("GEN-2022-001 {filler} Interconnection $5.00");
        let out = contextual(&text, DuplicateMatches::KeepAll);
        assert!(out.records.is_empty());
    }

    #[test]
    fn test_contextual_duplicates_flagged() {
        let text = "GEN-2022-001 Interconnection $10.00 GEN-2022-001 Interconnection $20.00";
        let out = contextual(text, DuplicateMatches::KeepAll);
        assert_eq!(out.records.len(), 2);
        let flag = out
            .flags
            .iter()
            .find(|f| f.kind == ReviewKind::AmbiguousContextualMatch)
            .unwrap();
        assert_eq!(flag.generator_id.as_deref(), Some("GEN-2022-001"));

        let out = contextual(text, DuplicateMatches::FirstOnly);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].cost, dec!(10.00));
        assert!(out
            .flags
            .iter()
            .any(|f| f.kind == ReviewKind::AmbiguousContextualMatch));
    }

    #[test]
    fn test_contextual_reattributes_to_nearest_generator() {
        let text = "GEN-2022-001 withdrawn GEN-2022-002 Interconnection $75.00";
        let out = contextual(text, DuplicateMatches::KeepAll);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].generator_id, "GEN-2022-002");
        assert!(out.flags.iter().any(|f| f.kind == ReviewKind::ReattributedMatch));
    }

    #[test]
    fn test_overflowing_block_total_excluded_and_flagged() {
        let section = "GEN-2022-001\n\
                       $1.00 $50,000,000,000,000,000,000,000,000,000\n\
                       $1.00 $50,000,000,000,000,000,000,000,000,000\n\
                       Total";
        let out = summed(section, PairSelection::Second);
        assert_eq!(out.records.len(), 1);
        let half_max: Decimal = "50000000000000000000000000000".parse().unwrap();
        assert_eq!(out.records[0].cost, half_max);
        assert!(out
            .flags
            .iter()
            .any(|f| f.kind == ReviewKind::MalformedAmount && f.message.contains("overflows")));
    }
}
