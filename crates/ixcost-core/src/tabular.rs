use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

use crate::model::{CostKind, Record};
use crate::parsing::fields::Extraction;
use crate::parsing::values::parse_amount;
use crate::review::{ReviewFlag, ReviewKind};

/// A spreadsheet cell after loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Number(Decimal),
    Text(String),
}

impl Cell {
    /// Text content of the cell; numbers are rendered, empty cells give `None`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) => Some(n.to_string()),
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }
}

/// One worksheet: header labels plus data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn cell(&self, row: &[Cell], column: usize) -> Cell {
        row.get(column).cloned().unwrap_or(Cell::Empty)
    }
}

/// A workbook as delivered by a tabular source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    pub id: String,
    pub sheets: BTreeMap<String, Sheet>,
}

/// Columns the grouper needs, independent of how a vintage spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    GeneratorId,
    Description,
    AllocatedCost,
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalField::GeneratorId => write!(f, "generator id"),
            LogicalField::Description => write!(f, "upgrade description"),
            LogicalField::AllocatedCost => write!(f, "allocated cost"),
        }
    }
}

/// Logical field -> header spellings, in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTable {
    pub generator_id: Vec<String>,
    pub description: Vec<String>,
    pub allocated_cost: Vec<String>,
}

impl AliasTable {
    pub fn aliases(&self, field: LogicalField) -> &[String] {
        match field {
            LogicalField::GeneratorId => &self.generator_id,
            LogicalField::Description => &self.description,
            LogicalField::AllocatedCost => &self.allocated_cost,
        }
    }

    /// Resolve every logical field against a header row.
    ///
    /// Fails with the first field none of whose aliases is present.
    pub fn resolve(&self, headers: &[String]) -> Result<ResolvedColumns, LogicalField> {
        let column = |field: LogicalField| resolve_alias(headers, self.aliases(field)).ok_or(field);
        Ok(ResolvedColumns {
            generator_id: column(LogicalField::GeneratorId)?,
            description: column(LogicalField::Description)?,
            allocated_cost: column(LogicalField::AllocatedCost)?,
        })
    }
}

/// Header indices selected for each logical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub generator_id: usize,
    pub description: usize,
    pub allocated_cost: usize,
}

/// Index of the first alias (in priority order) that is an exact header label.
///
/// Aliases are compared literally, so "Allocated Cost" and "Allocated Cost "
/// are distinct spellings.
pub fn resolve_alias(headers: &[String], aliases: &[String]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == alias))
}

/// Whether `description` mentions any keyword, ignoring case.
pub fn matches_keywords(description: &str, keywords: &[String]) -> bool {
    let lower = description.to_lowercase();
    keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
}

/// Filter rows by description keywords and sum allocated cost per generator.
///
/// One record per generator number, ordered by generator number. Empty cost
/// cells count as zero; unparseable ones are excluded and flagged.
pub fn group_costs(
    document_id: &str,
    sheet: &Sheet,
    columns: &ResolvedColumns,
    keywords: &[String],
    kind: CostKind,
) -> Extraction {
    let mut out = Extraction::default();
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut kept = 0usize;

    for (index, row) in sheet.rows.iter().enumerate() {
        let description = match sheet.cell(row, columns.description) {
            Cell::Text(s) => s,
            _ => continue,
        };
        if !matches_keywords(&description, keywords) {
            continue;
        }

        let Some(generator_id) = sheet.cell(row, columns.generator_id).as_text() else {
            out.flags.push(ReviewFlag::new(
                document_id,
                ReviewKind::MissingGeneratorId,
                format!("row {} matched the filter without a generator number", index + 2),
            ));
            continue;
        };
        kept += 1;

        let cost = match sheet.cell(row, columns.allocated_cost) {
            Cell::Empty => Decimal::ZERO,
            Cell::Number(n) => n,
            Cell::Text(s) => match parse_amount(&s) {
                Ok(n) => n,
                Err(malformed) => {
                    warn!(document = document_id, generator = %generator_id, "{malformed}");
                    out.flags.push(
                        ReviewFlag::new(document_id, ReviewKind::MalformedAmount, malformed.to_string())
                            .for_generator(&generator_id),
                    );
                    Decimal::ZERO
                }
            },
        };

        let total = totals.entry(generator_id.clone()).or_insert(Decimal::ZERO);
        match total.checked_add(cost) {
            Some(sum) => *total = sum,
            None => {
                warn!(document = document_id, generator = %generator_id, %cost, "allocated cost total overflows");
                out.flags.push(
                    ReviewFlag::new(
                        document_id,
                        ReviewKind::MalformedAmount,
                        format!("row {} cost {cost} overflows the generator total; excluded", index + 2),
                    )
                    .for_generator(&generator_id),
                );
            }
        }
    }

    debug!(
        document = document_id,
        rows = kept,
        generators = totals.len(),
        "grouped allocated costs"
    );

    out.records = totals
        .into_iter()
        .map(|(generator_id, cost)| Record {
            document_id: document_id.to_string(),
            generator_id,
            cost,
            kind,
        })
        .collect();
    out
}
