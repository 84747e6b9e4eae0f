use super::part::is_achieved;
use crate::error::ScoringError;
use crate::types::input::RawValue;
use crate::types::profile::{BonusScope, CooperativeBonus, Part};

/// Bonus points attributed to the evaluated team. `team_values` holds one raw
/// value per team in the cooperating group.
///
/// A wrong group size and every invalid team value are reported together.
pub fn resolve_bonus(
    part: &Part,
    bonus: &CooperativeBonus,
    team_values: &[RawValue],
) -> Result<f64, Vec<ScoringError>> {
    let mut errors = Vec::new();
    if team_values.len() != usize::from(bonus.required_team_count) {
        errors.push(ScoringError::CooperativeGroupSizeMismatch {
            part: part.id.clone(),
            required: bonus.required_team_count,
            supplied: team_values.len(),
        });
    }

    // Every team value is type-checked, even after a miss.
    let mut all_achieved = true;
    for value in team_values {
        match is_achieved(part, value) {
            Ok(achieved) => all_achieved &= achieved,
            Err(err) => errors.push(err),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }
    if !all_achieved {
        return Ok(0.0);
    }

    let points = f64::from(bonus.bonus_points);
    // Each side is scored on its own, so both scopes credit the evaluated
    // team. Alliance totals must count an ALL_TEAMS award once.
    match bonus.applies_to {
        BonusScope::AllTeams | BonusScope::PerTeam => Ok(points),
    }
}
