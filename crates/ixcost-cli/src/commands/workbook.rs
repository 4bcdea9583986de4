use ixcost_core::error::CostError;
use ixcost_core::outcome::{BatchResult, DocumentOutcome, UnparseableReason};
use ixcost_core::pipeline::WorkbookPipeline;
use ixcost_core::profiles::{self, builtin};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{collect_inputs, document_id, finish};
use crate::OutputArgs;

pub fn run(
    inputs: &[PathBuf],
    preset: &str,
    profile_file: Option<&Path>,
    args: &OutputArgs,
) -> Result<(), CostError> {
    let profile = match profile_file {
        Some(path) => profiles::load_workbook_profile(path)?,
        None => builtin::load_workbook_preset(preset)?,
    };
    info!(profile = %profile.name, sheet = %profile.sheet, "loaded workbook profile");
    let pipeline = WorkbookPipeline::new(profile);

    let files = collect_inputs(inputs, &["xlsx", "xls"])?;
    let mut sources = Vec::with_capacity(files.len());
    let mut outcomes = Vec::with_capacity(files.len());

    for path in files {
        let id = document_id(&path);
        let outcome = match std::fs::read(&path) {
            Ok(bytes) => ixcost_core::extract_workbook(&id, &bytes, &pipeline),
            Err(e) => DocumentOutcome::unparseable(
                &id,
                UnparseableReason::Unreadable {
                    message: e.to_string(),
                },
            ),
        };
        outcomes.push(outcome);
        sources.push(path);
    }

    let batch: BatchResult = outcomes.into_iter().collect();
    finish(&batch, &sources, pipeline.kind(), args)
}
