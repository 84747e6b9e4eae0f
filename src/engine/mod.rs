pub mod bonus;
pub mod part;
pub mod penalty;

use crate::error::ScoringError;
use crate::formula::{self, SymbolTable};
use crate::types::breakdown::{MatchScore, PartScore, ScoreBreakdown};
use crate::types::config::EngineSettings;
use crate::types::input::ScoreInput;
use crate::types::profile::{
    ScoreProfileDefinition, NET_PENALTIES, TOTAL_PENALTIES_OPPONENT, TOTAL_PENALTIES_SELF,
};
use serde::Serialize;
use tracing::{debug, warn};

/// A match side that could not be scored. Never carries a partial score.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationFailure {
    pub errors: Vec<ScoringError>,
}

impl EvaluationFailure {
    fn new(errors: Vec<ScoringError>) -> Self {
        Self { errors }
    }

    pub fn message(&self) -> String {
        match self.errors.as_slice() {
            [single] => single.describe(),
            errors => format!("score input failed validation ({} errors)", errors.len()),
        }
    }

    #[cfg(test)]
    pub fn has_kind(&self, kind: &str) -> bool {
        self.errors.iter().any(|err| err.kind() == kind)
    }
}

impl Serialize for EvaluationFailure {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Payload {
            error: String,
            errors: Vec<String>,
        }

        Payload {
            error: self.message(),
            errors: self.errors.iter().map(ScoringError::describe).collect(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
pub fn calculate_match_score(
    definition: &ScoreProfileDefinition,
    input: &ScoreInput,
) -> Result<MatchScore, EvaluationFailure> {
    calculate_match_score_with(definition, input, &EngineSettings::default())
}

pub fn calculate_match_score_with(
    definition: &ScoreProfileDefinition,
    input: &ScoreInput,
    settings: &EngineSettings,
) -> Result<MatchScore, EvaluationFailure> {
    let mut errors = Vec::new();

    for id in input.values.keys() {
        if !definition.parts.iter().any(|part| &part.id == id) {
            warn!(part = %id, "ignoring score input for undeclared part");
        }
    }

    let missing: Vec<ScoringError> = definition
        .parts
        .iter()
        .filter(|part| !input.values.contains_key(&part.id))
        .map(|part| ScoringError::MissingPartInput(part.id.clone()))
        .collect();
    errors.extend(missing);

    let mut parts = Vec::with_capacity(definition.parts.len());
    for part in &definition.parts {
        // The cooperative group is resolved even when the team's own value is
        // missing or invalid.
        let points = input
            .values
            .get(&part.id)
            .map(|raw| part::score_part(part, raw));

        let mut bonus_points = 0.0;
        let mut bonus_scope = None;
        let mut group_ok = true;
        if let Some(cooperative) = &part.cooperative_bonus {
            let group = input
                .cooperative
                .get(&part.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            match bonus::resolve_bonus(part, cooperative, group) {
                Ok(awarded) => {
                    if awarded > 0.0 {
                        bonus_points = awarded;
                        bonus_scope = Some(cooperative.applies_to);
                    }
                }
                Err(group_errors) => {
                    errors.extend(group_errors);
                    group_ok = false;
                }
            }
        }

        let points = match points {
            Some(Ok(points)) => points,
            Some(Err(err)) => {
                errors.push(err);
                continue;
            }
            None => continue,
        };
        if !group_ok {
            continue;
        }

        debug!(part = %part.id, points, bonus = bonus_points, "scored part");
        parts.push(PartScore {
            id: part.id.clone(),
            label: part.label.clone(),
            points,
            bonus: bonus_points,
            bonus_scope,
        });
    }

    let penalties = match penalty::aggregate_penalties(&definition.penalties, &input.penalties) {
        Ok(aggregated) => Some(aggregated),
        Err(unknown) => {
            errors.extend(unknown);
            None
        }
    };

    let (penalty_totals, penalty_lines) = match penalties {
        Some(aggregated) if errors.is_empty() => aggregated,
        _ => {
            debug!(errors = errors.len(), "score input rejected");
            return Err(EvaluationFailure::new(errors));
        }
    };
    debug!(
        self_total = penalty_totals.self_total,
        opponent_total = penalty_totals.opponent_total,
        net = penalty_totals.net,
        "aggregated penalties"
    );

    let mut symbols: SymbolTable = parts
        .iter()
        .map(|part| (part.id.clone(), part.total()))
        .collect();
    symbols.insert(TOTAL_PENALTIES_SELF.to_string(), penalty_totals.self_total);
    symbols.insert(
        TOTAL_PENALTIES_OPPONENT.to_string(),
        penalty_totals.opponent_total,
    );
    symbols.insert(NET_PENALTIES.to_string(), penalty_totals.net);

    let formula_value = evaluate_formula(&definition.total_formula, &symbols, settings)
        .map_err(|err| EvaluationFailure::new(vec![err]))?;

    let score = match settings.score_decimals {
        Some(decimals) => round_to(formula_value, decimals),
        None => formula_value,
    };
    debug!(score, formula_value, "evaluated total formula");

    Ok(MatchScore {
        score,
        breakdown: ScoreBreakdown {
            parts,
            penalties: penalty_lines,
            penalty_totals,
            formula_value,
        },
    })
}

fn evaluate_formula(
    formula: &str,
    symbols: &SymbolTable,
    settings: &EngineSettings,
) -> Result<f64, ScoringError> {
    let length = formula.chars().count();
    if length > settings.max_formula_length {
        return Err(ScoringError::MalformedFormula(format!(
            "formula is {length} characters, limit is {}",
            settings.max_formula_length
        )));
    }
    let value = formula::evaluate(formula, symbols)?;
    if !value.is_finite() {
        return Err(ScoringError::NonFiniteResult);
    }
    Ok(value)
}

/// Half-away-from-zero rounding to `decimals` places.
fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::input::RawValue;
    use crate::types::profile::{
        BonusScope, BooleanPart, CooperativeBonus, NumberPart, Part, PartKind, PenaltyDirection,
        PenaltyRule, PenaltyTarget,
    };

    fn number_part(id: &str, points_per_unit: f64, max_value: Option<u32>) -> Part {
        Part {
            id: id.to_string(),
            label: id.to_uppercase(),
            description: None,
            cooperative_bonus: None,
            kind: PartKind::Number(NumberPart {
                points_per_unit,
                max_value,
            }),
        }
    }

    fn boolean_part(id: &str, true_points: f64, bonus: Option<CooperativeBonus>) -> Part {
        Part {
            id: id.to_string(),
            label: id.to_uppercase(),
            description: None,
            cooperative_bonus: bonus,
            kind: PartKind::Boolean(BooleanPart { true_points }),
        }
    }

    fn profile(
        parts: Vec<Part>,
        penalties: Vec<PenaltyRule>,
        formula: &str,
    ) -> ScoreProfileDefinition {
        ScoreProfileDefinition {
            version: 1,
            parts,
            penalties,
            total_formula: formula.to_string(),
            notes: None,
        }
    }

    fn foul() -> PenaltyRule {
        PenaltyRule {
            id: "foul".to_string(),
            label: "Foul".to_string(),
            description: None,
            points: 5,
            target: PenaltyTarget::Opponent,
            direction: PenaltyDirection::Add,
        }
    }

    fn pair_bonus(applies_to: BonusScope) -> CooperativeBonus {
        CooperativeBonus {
            required_team_count: 2,
            bonus_points: 10,
            applies_to,
            description: None,
        }
    }

    #[test]
    fn number_part_is_clamped_before_formula() {
        let definition = profile(vec![number_part("auto", 5.0, Some(10))], vec![], "auto");
        let input = ScoreInput::default().with_value("auto", RawValue::Number(12.0));

        let result = calculate_match_score(&definition, &input).expect("should score");
        assert_eq!(result.score, 50.0);
        assert_eq!(result.breakdown.parts[0].points, 50.0);
        assert_eq!(result.breakdown.formula_value, 50.0);
    }

    #[test]
    fn cooperative_bonus_is_added_to_the_part_symbol() {
        let definition = profile(
            vec![boolean_part("climb", 20.0, Some(pair_bonus(BonusScope::PerTeam)))],
            vec![],
            "climb",
        );
        let input = ScoreInput::default()
            .with_value("climb", RawValue::Bool(true))
            .with_group("climb", vec![RawValue::Bool(true), RawValue::Bool(true)]);

        let result = calculate_match_score(&definition, &input).expect("should score");
        assert_eq!(result.score, 30.0);
        let climb = &result.breakdown.parts[0];
        assert_eq!((climb.points, climb.bonus), (20.0, 10.0));
        assert_eq!(climb.bonus_scope, Some(BonusScope::PerTeam));
    }

    #[test]
    fn partner_miss_removes_bonus() {
        let definition = profile(
            vec![boolean_part("climb", 20.0, Some(pair_bonus(BonusScope::AllTeams)))],
            vec![],
            "climb",
        );
        let input = ScoreInput::default()
            .with_value("climb", RawValue::Bool(true))
            .with_group("climb", vec![RawValue::Bool(true), RawValue::Bool(false)]);

        let result = calculate_match_score(&definition, &input).expect("should score");
        assert_eq!(result.score, 20.0);
        assert_eq!(result.breakdown.parts[0].bonus_scope, None);
    }

    #[test]
    fn penalty_symbol_feeds_formula() {
        let definition = profile(
            vec![number_part("auto", 1.0, None)],
            vec![foul()],
            "TOTAL_PENALTIES_OPPONENT",
        );
        let input = ScoreInput::default()
            .with_value("auto", RawValue::Number(0.0))
            .with_penalty("foul", 2);

        let result = calculate_match_score(&definition, &input).expect("should score");
        assert_eq!(result.score, 10.0);
        assert_eq!(result.breakdown.penalty_totals.net, 10.0);
    }

    #[test]
    fn missing_parts_are_reported_together() {
        let definition = profile(
            vec![
                number_part("auto", 5.0, None),
                number_part("teleop", 2.0, None),
                boolean_part("park", 3.0, None),
            ],
            vec![],
            "auto + teleop + park",
        );
        let input = ScoreInput::default().with_value("teleop", RawValue::Number(1.0));

        let failure = calculate_match_score(&definition, &input).expect_err("should fail");
        assert_eq!(
            failure.errors,
            vec![
                ScoringError::MissingPartInput("auto".to_string()),
                ScoringError::MissingPartInput("park".to_string()),
            ]
        );
        assert_eq!(
            failure.message(),
            "score input failed validation (2 errors)"
        );
    }

    #[test]
    fn validation_errors_of_all_kinds_are_collected() {
        let definition = profile(
            vec![
                number_part("auto", 5.0, None),
                boolean_part("climb", 20.0, Some(pair_bonus(BonusScope::PerTeam))),
                number_part("teleop", 1.0, None),
            ],
            vec![foul()],
            "auto + climb + teleop",
        );
        let input = ScoreInput::default()
            .with_value("auto", RawValue::Number(-3.0))
            .with_value("climb", RawValue::Bool(true))
            .with_group("climb", vec![RawValue::Bool(true)])
            .with_penalty("bogus", 1);

        let failure = calculate_match_score(&definition, &input).expect_err("should fail");
        for kind in [
            "MissingPartInput",
            "InvalidPartValue",
            "CooperativeGroupSizeMismatch",
            "UnknownPenaltyId",
        ] {
            assert!(failure.has_kind(kind), "expected {kind} in {:?}", failure.errors);
        }
        assert_eq!(failure.errors.len(), 4);
    }

    #[test]
    fn bad_own_value_and_bad_group_are_both_reported() {
        let definition = profile(
            vec![boolean_part("climb", 20.0, Some(pair_bonus(BonusScope::PerTeam)))],
            vec![],
            "climb",
        );
        let input = ScoreInput::default()
            .with_value("climb", RawValue::Number(1.0))
            .with_group("climb", vec![RawValue::Bool(true)]);

        let failure = calculate_match_score(&definition, &input).expect_err("should fail");
        assert_eq!(
            failure.errors,
            vec![
                ScoringError::CooperativeGroupSizeMismatch {
                    part: "climb".to_string(),
                    required: 2,
                    supplied: 1,
                },
                ScoringError::InvalidPartValue {
                    part: "climb".to_string(),
                    reason: "expected a boolean, got 1".to_string(),
                },
            ]
        );
    }

    #[test]
    fn group_is_checked_when_own_value_is_missing() {
        let definition = profile(
            vec![boolean_part("climb", 20.0, Some(pair_bonus(BonusScope::PerTeam)))],
            vec![],
            "climb",
        );
        let input = ScoreInput::default().with_group(
            "climb",
            vec![RawValue::Bool(true), RawValue::Other(serde_json::json!("yes"))],
        );

        let failure = calculate_match_score(&definition, &input).expect_err("should fail");
        assert_eq!(failure.errors.len(), 2);
        assert_eq!(
            failure.errors[0],
            ScoringError::MissingPartInput("climb".to_string())
        );
        assert_eq!(failure.errors[1].kind(), "InvalidPartValue");
    }

    #[test]
    fn wrong_typed_input_value_is_invalid_part_value() {
        let definition = profile(vec![number_part("auto", 5.0, None)], vec![], "auto");
        let input: ScoreInput =
            serde_json::from_str(r#"{"values": {"auto": "3"}}"#).expect("input should parse");

        let failure = calculate_match_score(&definition, &input).expect_err("should fail");
        assert_eq!(
            failure.message(),
            "InvalidPartValue: invalid value for part 'auto': expected a number, got \"3\""
        );
    }

    #[test]
    fn overflowing_scores_fail_instead_of_returning_infinity() {
        let definition = profile(
            vec![number_part("auto", 1.0, None)],
            vec![],
            "auto - auto * 2",
        );
        let input = ScoreInput::default().with_value("auto", RawValue::Number(1e308));
        let failure = calculate_match_score(&definition, &input).expect_err("should fail");
        assert_eq!(failure.errors, vec![ScoringError::NonFiniteResult]);

        let huge = "9".repeat(400);
        let definition = profile(
            vec![number_part("auto", 1.0, None)],
            vec![],
            &format!("auto + {huge}"),
        );
        let input = ScoreInput::default().with_value("auto", RawValue::Number(1.0));
        let failure = calculate_match_score(&definition, &input).expect_err("should fail");
        assert!(failure.has_kind("MalformedFormula"));
    }

    #[test]
    fn missing_group_values_count_as_size_mismatch() {
        let definition = profile(
            vec![boolean_part("climb", 20.0, Some(pair_bonus(BonusScope::PerTeam)))],
            vec![],
            "climb",
        );
        let input = ScoreInput::default().with_value("climb", RawValue::Bool(true));

        let failure = calculate_match_score(&definition, &input).expect_err("should fail");
        assert_eq!(
            failure.errors,
            vec![ScoringError::CooperativeGroupSizeMismatch {
                part: "climb".to_string(),
                required: 2,
                supplied: 0,
            }]
        );
    }

    #[test]
    fn unknown_formula_symbol_fails() {
        let definition = profile(
            vec![number_part("auto", 5.0, None)],
            vec![],
            "auto + unknownToken",
        );
        let input = ScoreInput::default().with_value("auto", RawValue::Number(1.0));

        let failure = calculate_match_score(&definition, &input).expect_err("should fail");
        assert_eq!(
            failure.errors,
            vec![ScoringError::UnknownSymbol("unknownToken".to_string())]
        );
        assert_eq!(
            failure.message(),
            "UnknownSymbol: unknown symbol in formula: unknownToken"
        );
    }

    #[test]
    fn formula_over_length_limit_is_malformed() {
        let definition = profile(vec![number_part("auto", 1.0, None)], vec![], "auto + 1");
        let input = ScoreInput::default().with_value("auto", RawValue::Number(1.0));
        let settings = EngineSettings {
            max_formula_length: 4,
            score_decimals: None,
        };

        let failure = calculate_match_score_with(&definition, &input, &settings)
            .expect_err("should fail");
        assert!(failure.has_kind("MalformedFormula"));
    }

    #[test]
    fn score_rounding_keeps_raw_formula_value() {
        let definition = profile(vec![number_part("auto", 1.0, None)], vec![], "auto / 3");
        let input = ScoreInput::default().with_value("auto", RawValue::Number(2.0));
        let settings = EngineSettings {
            max_formula_length: 2000,
            score_decimals: Some(2),
        };

        let result =
            calculate_match_score_with(&definition, &input, &settings).expect("should score");
        assert_eq!(result.score, 0.67);
        assert_eq!(result.breakdown.formula_value, 2.0 / 3.0);
    }

    #[test]
    fn undeclared_input_keys_are_ignored() {
        let definition = profile(vec![number_part("auto", 2.0, None)], vec![], "auto");
        let input = ScoreInput::default()
            .with_value("auto", RawValue::Number(3.0))
            .with_value("legacy", RawValue::Bool(true));

        let result = calculate_match_score(&definition, &input).expect("should score");
        assert_eq!(result.score, 6.0);
        assert_eq!(result.breakdown.parts.len(), 1);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let definition = profile(
            vec![
                number_part("auto", 1.5, Some(8)),
                boolean_part("climb", 12.0, Some(pair_bonus(BonusScope::AllTeams))),
            ],
            vec![foul()],
            "(auto + climb) * 2 - NET_PENALTIES / 4",
        );
        let input = ScoreInput::default()
            .with_value("auto", RawValue::Number(9.0))
            .with_value("climb", RawValue::Bool(true))
            .with_group("climb", vec![RawValue::Bool(true), RawValue::Bool(true)])
            .with_penalty("foul", 3);

        let first = calculate_match_score(&definition, &input);
        for _ in 0..5 {
            assert_eq!(calculate_match_score(&definition, &input), first);
        }
    }

    #[test]
    fn failure_serializes_as_error_payload() {
        let failure = EvaluationFailure::new(vec![ScoringError::DivisionByZero]);
        let json = serde_json::to_value(&failure).expect("failure should serialize");
        assert_eq!(json["error"], "DivisionByZero: division by zero in formula");
        assert_eq!(json["errors"][0], "DivisionByZero: division by zero in formula");
    }
}
