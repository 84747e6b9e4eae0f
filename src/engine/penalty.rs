use crate::error::ScoringError;
use crate::types::breakdown::{PenaltyLine, PenaltyTotals};
use crate::types::profile::{PenaltyRule, PenaltyTarget};
use std::collections::BTreeMap;

/// Sums penalty occurrences into signed self/opponent totals.
///
/// Every occurrence key must name a rule; all unknown keys are reported.
pub fn aggregate_penalties(
    rules: &[PenaltyRule],
    occurrences: &BTreeMap<String, u32>,
) -> Result<(PenaltyTotals, Vec<PenaltyLine>), Vec<ScoringError>> {
    let unknown: Vec<ScoringError> = occurrences
        .keys()
        .filter(|id| !rules.iter().any(|rule| &rule.id == *id))
        .map(|id| ScoringError::UnknownPenaltyId(id.clone()))
        .collect();
    if !unknown.is_empty() {
        return Err(unknown);
    }

    let mut totals = PenaltyTotals::default();
    let mut lines = Vec::with_capacity(rules.len());
    for rule in rules {
        let count = occurrences.get(&rule.id).copied().unwrap_or(0);
        let contribution = f64::from(rule.points) * f64::from(count) * rule.direction.sign();
        match rule.target {
            PenaltyTarget::Self_ => totals.self_total += contribution,
            PenaltyTarget::Opponent => totals.opponent_total += contribution,
        }
        lines.push(PenaltyLine {
            id: rule.id.clone(),
            count,
            target: rule.target,
            contribution,
        });
    }
    totals.net = totals.opponent_total - totals.self_total;

    Ok((totals, lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::profile::PenaltyDirection;

    fn rule(
        id: &str,
        points: u32,
        target: PenaltyTarget,
        direction: PenaltyDirection,
    ) -> PenaltyRule {
        PenaltyRule {
            id: id.to_string(),
            label: id.to_string(),
            description: None,
            points,
            target,
            direction,
        }
    }

    fn counts(entries: &[(&str, u32)]) -> BTreeMap<String, u32> {
        entries
            .iter()
            .map(|(id, count)| (id.to_string(), *count))
            .collect()
    }

    #[test]
    fn opponent_add_accumulates_into_opponent_total() {
        let rules = [rule("foul", 5, PenaltyTarget::Opponent, PenaltyDirection::Add)];
        let (totals, lines) =
            aggregate_penalties(&rules, &counts(&[("foul", 2)])).expect("should aggregate");
        assert_eq!(totals.opponent_total, 10.0);
        assert_eq!(totals.self_total, 0.0);
        assert_eq!(totals.net, 10.0);
        assert_eq!(lines[0].contribution, 10.0);
    }

    #[test]
    fn signs_follow_direction_and_net_is_opponent_minus_self() {
        let rules = [
            rule("foul", 5, PenaltyTarget::Opponent, PenaltyDirection::Add),
            rule("major", 15, PenaltyTarget::Opponent, PenaltyDirection::Subtract),
            rule("tech", 3, PenaltyTarget::Self_, PenaltyDirection::Subtract),
            rule("yellow", 7, PenaltyTarget::Self_, PenaltyDirection::Add),
        ];
        let (totals, _) = aggregate_penalties(
            &rules,
            &counts(&[("foul", 1), ("major", 1), ("tech", 2), ("yellow", 1)]),
        )
        .expect("should aggregate");

        assert_eq!(totals.opponent_total, 5.0 - 15.0);
        assert_eq!(totals.self_total, -6.0 + 7.0);
        assert_eq!(totals.net, totals.opponent_total - totals.self_total);
    }

    #[test]
    fn absent_occurrences_count_as_zero() {
        let rules = [rule("foul", 5, PenaltyTarget::Self_, PenaltyDirection::Add)];
        let (totals, lines) =
            aggregate_penalties(&rules, &BTreeMap::new()).expect("should aggregate");
        assert_eq!(totals, PenaltyTotals::default());
        assert_eq!(lines[0].count, 0);
    }

    #[test]
    fn unknown_ids_are_all_reported() {
        let rules = [rule("foul", 5, PenaltyTarget::Self_, PenaltyDirection::Add)];
        let occurrences = counts(&[("bogus", 1), ("foul", 1), ("zzz", 2)]);
        let errors =
            aggregate_penalties(&rules, &occurrences).expect_err("unknown ids should fail");
        assert_eq!(
            errors,
            vec![
                ScoringError::UnknownPenaltyId("bogus".to_string()),
                ScoringError::UnknownPenaltyId("zzz".to_string()),
            ]
        );
    }
}
