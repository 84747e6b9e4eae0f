use super::profile::{BonusScope, PenaltyTarget};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartScore {
    pub id: String,
    pub label: String,
    pub points: f64,
    pub bonus: f64,
    /// Scope of the bonus when one was granted, so alliance-level totals can
    /// count an `ALL_TEAMS` award once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus_scope: Option<BonusScope>,
}

impl PartScore {
    pub fn total(&self) -> f64 {
        self.points + self.bonus
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyLine {
    pub id: String,
    pub count: u32,
    pub target: PenaltyTarget,
    pub contribution: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PenaltyTotals {
    #[serde(rename = "TOTAL_PENALTIES_SELF")]
    pub self_total: f64,
    #[serde(rename = "TOTAL_PENALTIES_OPPONENT")]
    pub opponent_total: f64,
    #[serde(rename = "NET_PENALTIES")]
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub parts: Vec<PartScore>,
    pub penalties: Vec<PenaltyLine>,
    pub penalty_totals: PenaltyTotals,
    /// Formula result before final rounding.
    pub formula_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchScore {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}
