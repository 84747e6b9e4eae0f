pub mod json;
pub mod md;

use crate::engine::EvaluationFailure;
use crate::error::AppError;
use crate::types::breakdown::MatchScore;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

/// Outcome of one evaluation plus the audit trail of which profile produced it.
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub profile_path: String,
    pub profile_version: u32,
    pub profile_digest: String,
    pub outcome: Result<MatchScore, EvaluationFailure>,
}

pub fn render(report: &EvaluationReport, format: OutputFormat) -> Result<String, AppError> {
    match format {
        OutputFormat::Json => json::to_json(report).map_err(AppError::Json),
        OutputFormat::Md => Ok(md::to_markdown(report)),
    }
}
