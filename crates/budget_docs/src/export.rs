use anyhow::Result;
use async_trait::async_trait;
use budget_core::{BudgetError, BudgetState, Language, Totals};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::builder::build_budget_document;
use crate::encoder::DocumentEncoder;
use crate::naming::export_file_name;

/// Where encoded documents end up: a download folder, a browser save
/// dialog, an in-memory buffer in tests.
#[async_trait]
pub trait FileSink: Send + Sync {
    /// Store `bytes` under `file_name` and report where they went.
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub file_name: String,
    pub location: PathBuf,
    pub size: usize,
}

/// Build the document for `state`, encode it and hand it to `sink`.
///
/// `state` and `totals` must be the same snapshot. Failures come back as
/// [`BudgetError::Encode`] or [`BudgetError::Save`] with the full cause chain.
pub async fn export_document(
    state: &BudgetState,
    lang: Language,
    totals: &Totals,
    encoder: &dyn DocumentEncoder,
    sink: &dyn FileSink,
) -> Result<SavedFile, BudgetError> {
    let doc = build_budget_document(state, lang, totals);
    debug!(blocks = doc.blocks.len(), %lang, "built budget document");

    let format = encoder.format();
    let bytes = encoder
        .encode(&doc)
        .map_err(|e| BudgetError::Encode(format!("{format}: {e:#}")))?;

    let file_name = export_file_name(&state.project.project_name, lang, format);
    let location = sink
        .save(&file_name, &bytes)
        .await
        .map_err(|e| BudgetError::Save(format!("{file_name}: {e:#}")))?;

    info!("Exported {} ({} bytes) to {}", file_name, bytes.len(), location.display());
    Ok(SavedFile {
        file_name,
        location,
        size: bytes.len(),
    })
}
