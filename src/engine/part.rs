use crate::error::ScoringError;
use crate::types::input::RawValue;
use crate::types::profile::{Part, PartKind};

pub fn score_part(part: &Part, raw: &RawValue) -> Result<f64, ScoringError> {
    match (&part.kind, raw) {
        (PartKind::Number(number), &RawValue::Number(value)) => {
            check_count(part, value)?;
            let units = match number.max_value {
                Some(cap) => value.min(f64::from(cap)),
                None => value,
            };
            let points = units * number.points_per_unit;
            if !points.is_finite() {
                return Err(ScoringError::InvalidPartValue {
                    part: part.id.clone(),
                    reason: format!("{value} units overflow the points range"),
                });
            }
            Ok(points)
        }
        (PartKind::Boolean(boolean), &RawValue::Bool(achieved)) => {
            Ok(if achieved { boolean.true_points } else { 0.0 })
        }
        (kind, raw) => Err(type_mismatch(part, kind, raw)),
    }
}

/// Whether a team counts as having achieved the part for cooperative bonus
/// purposes: any non-zero count, or `true`.
pub fn is_achieved(part: &Part, raw: &RawValue) -> Result<bool, ScoringError> {
    match (&part.kind, raw) {
        (PartKind::Number(_), &RawValue::Number(value)) => {
            check_count(part, value)?;
            Ok(value > 0.0)
        }
        (PartKind::Boolean(_), &RawValue::Bool(achieved)) => Ok(achieved),
        (kind, raw) => Err(type_mismatch(part, kind, raw)),
    }
}

fn check_count(part: &Part, value: f64) -> Result<(), ScoringError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ScoringError::InvalidPartValue {
            part: part.id.clone(),
            reason: format!("expected a non-negative number, got {value}"),
        });
    }
    Ok(())
}

fn type_mismatch(part: &Part, kind: &PartKind, raw: &RawValue) -> ScoringError {
    let expected = match kind {
        PartKind::Number(_) => "a number",
        PartKind::Boolean(_) => "a boolean",
    };
    ScoringError::InvalidPartValue {
        part: part.id.clone(),
        reason: format!("expected {expected}, got {raw}"),
    }
}
