use ixcost_core::model::CostTable;
use ixcost_core::review::ReviewFlag;

/// Plain-text table with aligned columns and a total line.
pub fn format(table: &CostTable) -> String {
    let [file_col, gen_col, cost_col] = table.columns();
    let costs: Vec<String> = table.rows.iter().map(|r| format!("{:.2}", r.cost)).collect();

    let file_w = table
        .rows
        .iter()
        .map(|r| r.document_id.len())
        .chain([file_col.len()])
        .max()
        .unwrap_or(0);
    let gen_w = table
        .rows
        .iter()
        .map(|r| r.generator_id.len())
        .chain([gen_col.len()])
        .max()
        .unwrap_or(0);
    let cost_w = costs
        .iter()
        .map(|c| c.len())
        .chain([cost_col.len()])
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!(
        "{file_col:<file_w$}  {gen_col:<gen_w$}  {cost_col:>cost_w$}\n"
    ));
    out.push_str(&format!("{}\n", "-".repeat(file_w + gen_w + cost_w + 4)));
    for (row, cost) in table.rows.iter().zip(&costs) {
        out.push_str(&format!(
            "{:<file_w$}  {:<gen_w$}  {:>cost_w$}\n",
            row.document_id, row.generator_id, cost
        ));
    }
    let total = match table.total() {
        Some(total) => format!("{total:.2}"),
        None => "overflow".to_string(),
    };
    out.push_str(&format!(
        "\n{:<width$}  {:>cost_w$}\n",
        format!("Total ({} rows)", table.rows.len()),
        total,
        width = file_w + gen_w + 2
    ));
    out
}

/// Review flags, one per line, most severe first.
pub fn format_flags(flags: &[&ReviewFlag]) -> String {
    if flags.is_empty() {
        return "No review flags.\n".into();
    }
    let mut sorted = flags.to_vec();
    sorted.sort_by_key(|f| f.severity);

    let mut out = format!("Review flags ({}):\n", sorted.len());
    for flag in sorted {
        out.push_str(&format!("  {flag}\n"));
    }
    out
}
