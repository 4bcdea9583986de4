use ixcost_core::error::CostError;
use ixcost_core::profiles::builtin;
use ixcost_core::profiles::schema::{PolicyDef, TextProfile, WorkbookProfile};
use ixcost_core::tabular::LogicalField;
use std::path::Path;

pub fn list() -> Result<(), CostError> {
    println!("Available predefined profiles:\n");
    for name in builtin::PRESETS {
        let p = builtin::load_text_preset(name)?;
        println!("  {:<30} {} (v{}) [{}]", name, p.name, p.version, p.cost_kind);
        if let Some(ref desc) = p.description {
            println!("  {:<30} {}", "", desc);
        }
        println!();
    }
    for name in builtin::WORKBOOK_PRESETS {
        let p = builtin::load_workbook_preset(name)?;
        println!("  {:<30} {} (v{}) [{}, workbook]", name, p.name, p.version, p.cost_kind);
        if let Some(ref desc) = p.description {
            println!("  {:<30} {}", "", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), CostError> {
    if builtin::is_workbook_preset(preset) {
        explain_workbook(&builtin::load_workbook_preset(preset)?);
    } else {
        explain_text(&builtin::load_text_preset(preset)?);
    }
    Ok(())
}

fn explain_text(p: &TextProfile) {
    println!("{} (version {})\n", p.name, p.version);
    if let Some(ref desc) = p.description {
        println!("{desc}\n");
    }
    println!("Produces the '{}' column.\n", p.cost_kind.column_name());

    println!("The section starts at the first of these headings found in the report:");
    for m in &p.start_markers {
        println!("  - {m}");
    }
    println!("\nand ends at the first of these:");
    for m in &p.end_markers {
        println!("  - {m}");
    }
    println!(
        "\nGenerator numbers look like <PREFIX>-<YYYY>-<NNN>[suffix], with PREFIX one of: {}\n",
        p.generator.prefixes.join(", ")
    );

    match &p.policy {
        PolicyDef::SummedDualValue {
            sentinel,
            pair_selection,
            block_boundary,
        } => {
            println!("Policy: summed dual value");
            println!("  Each generator number on its own line opens a block that runs to the");
            println!("  next '{sentinel}' line (boundary: {block_boundary:?}).");
            println!("  Every '$A $B' pair in the block contributes its {pair_selection:?} amount;");
            println!("  the block total is the generator's cost.");
        }
        PolicyDef::ContextualSingleValue {
            keyword,
            max_gap,
            duplicates,
        } => {
            println!("Policy: contextual single value");
            println!("  In whitespace-normalized text, a generator number followed within");
            println!("  {max_gap} characters by '{keyword}' and then a '$' amount yields one cost.");
            println!("  Repeated matches for one generator: {duplicates:?} (flagged for review).");
        }
    }
    println!();
}

fn explain_workbook(p: &WorkbookProfile) {
    println!("{} (version {})\n", p.name, p.version);
    if let Some(ref desc) = p.description {
        println!("{desc}\n");
    }
    println!("Reads sheet '{}' and produces the '{}' column.\n", p.sheet, p.cost_kind.column_name());
    println!("Header spellings, tried in order:");
    for field in [
        LogicalField::GeneratorId,
        LogicalField::Description,
        LogicalField::AllocatedCost,
    ] {
        let spellings: Vec<String> = p
            .aliases
            .aliases(field)
            .iter()
            .map(|a| format!("{a:?}"))
            .collect();
        println!("  {:<20} {}", field.to_string(), spellings.join(", "));
    }
    println!("\nRows are kept when the description contains (any case):");
    for k in &p.keywords {
        println!("  - {k}");
    }
    println!("\nAllocated cost is summed per generator number.\n");
}

pub fn schema() -> Result<(), CostError> {
    print!(
        r#"JSON Profile Schema
===================

A text profile tells `ixcost extract` where the cost section of a study
report is and how to read costs out of it.

Top-level fields:
  name          (string, required)  Human-readable name of the profile
  description   (string, optional)  What this profile is for
  version       (string, required)  Version identifier (e.g., "2024.1")
  cost_kind     (string, required)  "total_upgrade" or "interconnection"
  start_markers (array, required)   Section headings, highest priority first.
                                    The first one found anywhere wins.
  end_markers   (array, required)   Headings that close the section.
  generator     (object, optional)  {{ "prefixes": ["GEN", "ASGI"] }}
                                    Study-type codes, 3-4 letters each.
  policy        (object, required)  One of:

    {{ "type": "summed_dual_value",
       "sentinel": "Total",                 line that ends a generator block
       "pair_selection": "second",          "first" or "second" amount of '$A $B'
       "block_boundary": "sentinel" }}       or "sentinel_or_next_generator"

    {{ "type": "contextual_single_value",
       "keyword": "Interconnection",        word between generator and amount
       "max_gap": 200,                      max characters per gap (1-1000)
       "duplicates": "keep_all" }}           or "first_only"

A workbook profile (validate with --workbook) has:
  name, description, version, cost_kind  as above
  sheet         (string, optional)  Default "Assigned Upgrade Costs"
  aliases       (object, required)  Header spellings per column, in order:
                                    generator_id, description, allocated_cost
  keywords      (array, required)   Description substrings (case-insensitive)

Example:
{{
  "name": "Total upgrade cost, 2019 layout",
  "version": "1.0",
  "cost_kind": "total_upgrade",
  "start_markers": ["Appendix E. Cost Allocation Per Request"],
  "end_markers": ["Appendix F. Cost Allocation by Upgrade"],
  "policy": {{ "type": "summed_dual_value", "sentinel": "Total" }}
}}
"#
    );
    Ok(())
}

pub fn validate(file: &Path, workbook: bool) -> Result<(), CostError> {
    if workbook {
        let p = ixcost_core::profiles::load_workbook_profile(file)?;
        println!("Workbook profile '{}' (v{}) is valid.", p.name, p.version);
        println!("  Sheet: {}", p.sheet);
        println!("  Keywords: {}", p.keywords.len());
        return Ok(());
    }

    let p = ixcost_core::profiles::load_text_profile(file)?;
    println!("Profile '{}' (v{}) is valid.", p.name, p.version);
    println!(
        "  Markers: {} start, {} end",
        p.start_markers.len(),
        p.end_markers.len()
    );
    println!("  Prefixes: {}", p.generator.prefixes.join(", "));

    // A start heading containing an end heading yields an empty section.
    let mut warnings = Vec::new();
    for start in &p.start_markers {
        for end in p.end_markers.iter().filter(|e| start.contains(e.as_str())) {
            warnings.push(format!("start marker '{start}' contains end marker '{end}'"));
        }
    }
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {w}");
        }
    }

    Ok(())
}
