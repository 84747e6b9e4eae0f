use super::EvaluationReport;
use serde_json::{json, Value};

/// Success payload `{score, breakdown}` or failure payload `{error, errors}`,
/// with a `profile` object alongside.
pub fn to_json(report: &EvaluationReport) -> Result<String, serde_json::Error> {
    let mut payload = match &report.outcome {
        Ok(score) => serde_json::to_value(score)?,
        Err(failure) => serde_json::to_value(failure)?,
    };
    if let Value::Object(map) = &mut payload {
        map.insert(
            "profile".to_string(),
            json!({
                "path": report.profile_path,
                "version": report.profile_version,
                "sha256": report.profile_digest,
            }),
        );
    }
    serde_json::to_string_pretty(&payload)
}
