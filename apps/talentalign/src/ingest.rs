//! Input loading for the batch `analyze` command.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, info};

pub const DEFAULT_RESUME_PATH: &str = "data/resume.txt";
pub const DEFAULT_JOB_PATH: &str = "data/job_description.txt";

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Reads a resume or job description from disk.
///
/// Returns `Ok(None)` when the file is missing or empty so the caller can
/// fall back to interactive input. `.pdf` files go through `pdf_extract`;
/// everything else is read as UTF-8 text.
pub async fn load_input(path: &Path) -> Result<Option<String>> {
    let metadata = match fs::metadata(path).await {
        Ok(meta) if meta.is_file() && meta.len() > 0 => meta,
        _ => {
            debug!("No usable input at {}", path.display());
            return Ok(None);
        }
    };

    let text = if is_pdf(path) {
        let bytes = fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            anyhow::anyhow!("Failed to extract text from PDF '{}': {e}", path.display())
        })?
    } else {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    info!("Loaded {} ({} bytes)", path.display(), metadata.len());
    Ok(Some(text))
}
