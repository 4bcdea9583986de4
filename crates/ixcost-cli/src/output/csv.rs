use ixcost_core::error::CostError;
use ixcost_core::model::CostTable;
use std::io;

/// CSV with header `File Name,Gen Number,<cost column>`.
pub fn format(table: &CostTable) -> Result<String, CostError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns()).map_err(io::Error::from)?;
    for row in &table.rows {
        writer
            .write_record([
                row.document_id.as_str(),
                row.generator_id.as_str(),
                row.cost.to_string().as_str(),
            ])
            .map_err(io::Error::from)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| CostError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ixcost_core::model::{AggregatedRow, CostKind};
    use rust_decimal::Decimal;

    #[test]
    fn test_header_and_quoting() {
        let table = CostTable {
            kind: CostKind::TotalUpgrade,
            rows: vec![AggregatedRow {
                document_id: "Study, Cluster 1.pdf".into(),
                generator_id: "GEN-2022-001".into(),
                cost: Decimal::new(125050, 2),
            }],
        };
        let out = format(&table).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("File Name,Gen Number,Total Upgrade Cost"));
        assert_eq!(lines.next(), Some("\"Study, Cluster 1.pdf\",GEN-2022-001,1250.50"));
    }
}
