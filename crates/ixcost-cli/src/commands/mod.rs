pub mod extract;
pub mod profiles;
pub mod workbook;

use ixcost_core::error::CostError;
use ixcost_core::model::CostKind;
use ixcost_core::outcome::BatchResult;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::output;
use crate::quarantine;
use crate::OutputArgs;

/// Expand inputs into source files with one of `extensions`.
///
/// Directories are scanned one level deep, sorted by name. Files given
/// explicitly are taken as-is.
pub fn collect_inputs(inputs: &[PathBuf], extensions: &[&str]) -> Result<Vec<PathBuf>, CostError> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && has_extension(p, extensions))
                .collect();
            entries.sort();
            files.extend(entries);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Documents are identified by their file name.
pub fn document_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Route quarantined documents, then aggregate and write the table.
///
/// `sources[i]` is the path `batch.outcomes[i]` was read from. A failed
/// quarantine move does not stop the export; it is reported afterwards.
pub fn finish(
    batch: &BatchResult,
    sources: &[PathBuf],
    kind: CostKind,
    args: &OutputArgs,
) -> Result<(), CostError> {
    debug_assert_eq!(batch.outcomes.len(), sources.len());
    let mut failed: Vec<(PathBuf, String)> = Vec::new();
    for (outcome, source) in batch.outcomes.iter().zip(sources) {
        let Some(decision) = outcome.quarantine() else {
            continue;
        };
        eprintln!("  unparseable: {} ({})", decision.document_id, decision.reason);
        let Some(dir) = args.quarantine_dir.as_deref() else {
            continue;
        };
        match quarantine::relocate(source, dir) {
            Ok(target) => {
                info!(document = %decision.document_id, target = %target.display(), "quarantined")
            }
            Err(e) => {
                warn!(source = %source.display(), "quarantine move failed: {e}");
                eprintln!("  not quarantined: {} ({e})", source.display());
                failed.push((source.clone(), e.to_string()));
            }
        }
    }

    if args.review {
        let flags: Vec<_> = batch.flags().collect();
        eprint!("{}", output::table::format_flags(&flags));
    }

    let table = ixcost_core::build_table(batch, kind)?;

    let rendered = match args.output.as_str() {
        "json" => output::json::format(&table)?,
        "csv" => output::csv::format(&table)?,
        _ => output::table::format(&table),
    };

    match &args.out {
        Some(path) => {
            std::fs::write(path, &rendered).map_err(|e| CostError::ExportWrite {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            eprintln!(
                "{} row(s) from {} of {} document(s), written to {}",
                table.rows.len(),
                batch.parsed_count(),
                batch.outcomes.len(),
                path.display()
            );
        }
        None => print!("{rendered}"),
    }

    match failed.first() {
        Some((path, reason)) => Err(CostError::QuarantineMove {
            path: path.clone(),
            reason: reason.clone(),
            failed: failed.len(),
        }),
        None => Ok(()),
    }
}
