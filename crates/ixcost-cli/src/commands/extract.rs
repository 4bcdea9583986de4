use ixcost_core::error::CostError;
use ixcost_core::extraction::pdftotext::PdftotextExtractor;
use ixcost_core::outcome::{BatchResult, DocumentOutcome, UnparseableReason};
use ixcost_core::pipeline::TextPipeline;
use ixcost_core::profiles::{self, builtin};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{collect_inputs, document_id, finish, has_extension};
use crate::OutputArgs;

pub fn run(
    inputs: &[PathBuf],
    preset: &str,
    profile_file: Option<&Path>,
    layout: bool,
    args: &OutputArgs,
) -> Result<(), CostError> {
    let profile = match profile_file {
        Some(path) => profiles::load_text_profile(path)?,
        None => builtin::load_text_preset(preset)?,
    };
    info!(profile = %profile.name, kind = %profile.cost_kind, "loaded profile");
    let pipeline = TextPipeline::new(profile)?;
    let extractor = PdftotextExtractor::new().with_layout(layout);

    let files = collect_inputs(inputs, &["pdf", "txt"])?;
    if files.iter().any(|p| !has_extension(p, &["txt"])) && !PdftotextExtractor::is_available() {
        return Err(CostError::PdftotextNotFound);
    }
    let mut sources = Vec::with_capacity(files.len());
    let mut outcomes = Vec::with_capacity(files.len());

    for path in files {
        let id = document_id(&path);
        let outcome = match std::fs::read(&path) {
            Ok(bytes) if has_extension(&path, &["txt"]) => {
                ixcost_core::extract_text(&id, &String::from_utf8_lossy(&bytes), &pipeline)
            }
            Ok(bytes) => ixcost_core::extract_pdf(&id, &bytes, &extractor, &pipeline)?,
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
