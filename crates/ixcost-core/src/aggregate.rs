use std::collections::{BTreeMap, HashMap};
use tracing::info;

use crate::error::CostError;
use crate::model::{AggregatedRow, CostKind, CostTable, Record};
use crate::outcome::BatchResult;

/// Merge records of one cost kind into export rows.
///
/// Duplicate (document, generator) records are summed. Rows are ordered by
/// document id, then by where the generator first appears in that document,
/// so the processing order of documents does not change the table.
///
/// Fails with `CostOverflow` when a summed row leaves the `Decimal` range.
pub fn aggregate<'a, I>(records: I, kind: CostKind) -> Result<Vec<AggregatedRow>, CostError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut per_document: BTreeMap<&str, (Vec<AggregatedRow>, HashMap<&str, usize>)> =
        BTreeMap::new();

    for record in records.into_iter().filter(|r| r.kind == kind) {
        let (rows, index) = per_document.entry(record.document_id.as_str()).or_default();
        match index.get(record.generator_id.as_str()) {
            Some(&i) => {
                rows[i].cost = rows[i].cost.checked_add(record.cost).ok_or_else(|| {
                    CostError::CostOverflow {
                        document_id: record.document_id.clone(),
                        generator_id: record.generator_id.clone(),
                    }
                })?;
            }
            None => {
                index.insert(record.generator_id.as_str(), rows.len());
                rows.push(AggregatedRow {
                    document_id: record.document_id.clone(),
                    generator_id: record.generator_id.clone(),
                    cost: record.cost,
                });
            }
        }
    }

    Ok(per_document
        .into_values()
        .flat_map(|(rows, _)| rows)
        .collect())
}

/// Build the export table for a batch.
///
/// A batch that yields no rows at all is reported as `NoDataExtracted`
/// instead of an empty table.
pub fn build_table(batch: &BatchResult, kind: CostKind) -> Result<CostTable, CostError> {
    let rows = aggregate(batch.records(), kind)?;
    if rows.is_empty() {
        return Err(CostError::NoDataExtracted {
            documents: batch.outcomes.len(),
        });
    }

    let table = CostTable { kind, rows };
    info!(
        kind = %kind,
        rows = table.rows.len(),
        documents = batch.outcomes.len(),
        total = ?table.total(),
        "aggregated cost table"
    );
    Ok(table)
}
