use ixcost_core::error::CostError;
use ixcost_core::model::CostTable;
use serde_json::{Map, Value};

/// Rows as JSON objects keyed by the export column names.
pub fn format(table: &CostTable) -> Result<String, CostError> {
    let [file, generator, cost] = table.columns();
    let rows: Vec<Value> = table
        .rows
        .iter()
        .map(|row| {
            let mut obj = Map::new();
            obj.insert(file.into(), Value::String(row.document_id.clone()));
            obj.insert(generator.into(), Value::String(row.generator_id.clone()));
            obj.insert(cost.into(), Value::String(row.cost.to_string()));
            Value::Object(obj)
        })
        .collect();
    let mut json = serde_json::to_string_pretty(&rows)?;
    json.push('\n');
    Ok(json)
}
