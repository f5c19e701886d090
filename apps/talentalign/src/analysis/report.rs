//! JSON match report written by the batch `analyze` command.
//!
//! `match_score_percent` is a keyword ratio, matched / (matched + missing),
//! recomputed here from the list lengths. It is unrelated to the semantic
//! `MatchResult::match_score` and the two are never interchanged.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::analyzer::MatchResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub skills_match: Vec<String>,
    pub missing_skills: Vec<String>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub match_score_percent: f64,
}

/// matched / (matched + missing) × 100, two decimals; 0 when both are empty.
pub fn keyword_match_percent(matched: usize, missing: usize) -> f64 {
    let total = matched + missing;
    if total == 0 {
        return 0.0;
    }
    let pct = matched as f64 / total as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

impl AnalysisReport {
    pub fn from_result(result: &MatchResult) -> Self {
        Self {
            skills_match: result.skills_match.clone(),
            missing_skills: result.missing_skills.clone(),
            strengths: result.strengths.clone(),
            improvements: result.improvements.clone(),
            match_score_percent: keyword_match_percent(
                result.skills_match.len(),
                result.missing_skills.len(),
            ),
        }
    }

    /// Pretty JSON with 4-space indentation.
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)
            .context("Failed to serialize match report")?;
        String::from_utf8(buf).context("Match report is not valid UTF-8")
    }

    /// Console summary printed after the report is written.
    pub fn summary(&self) -> String {
        format!(
            "\n===== MATCH REPORT =====\n\
             Skills Matched: {:?}\n\
             Missing Skills: {:?}\n\
             Strengths: {:?}\n\
             Improvements: {:?}\n\
             Match Score: {}%\n\
             ========================\n",
            self.skills_match,
            self.missing_skills,
            self.strengths,
            self.improvements,
            self.match_score_percent
        )
    }
}

/// Writes the report, creating the parent directory if needed.
/// An existing file is overwritten.
pub async fn write_report(report: &AnalysisReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create report directory '{}'", parent.display()))?;
    }

    let json = report.to_json()?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write report '{}'", path.display()))?;

    info!("Report written to {}", path.display());
    Ok(())
}
