use crate::formula;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const TOTAL_PENALTIES_SELF: &str = "TOTAL_PENALTIES_SELF";
pub const TOTAL_PENALTIES_OPPONENT: &str = "TOTAL_PENALTIES_OPPONENT";
pub const NET_PENALTIES: &str = "NET_PENALTIES";

pub const PENALTY_SYMBOLS: [&str; 3] = [
    TOTAL_PENALTIES_SELF,
    TOTAL_PENALTIES_OPPONENT,
    NET_PENALTIES,
];

/// Versioned scoring configuration. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreProfileDefinition {
    pub version: u32,
    pub parts: Vec<Part>,
    #[serde(default)]
    pub penalties: Vec<PenaltyRule>,
    pub total_formula: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooperative_bonus: Option<CooperativeBonus>,
    #[serde(flatten)]
    pub kind: PartKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PartKind {
    Number(NumberPart),
    Boolean(BooleanPart),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberPart {
    pub points_per_unit: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanPart {
    pub true_points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CooperativeBonus {
    pub required_team_count: u8,
    pub bonus_points: u32,
    pub applies_to: BonusScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BonusScope {
    AllTeams,
    PerTeam,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyRule {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub points: u32,
    pub target: PenaltyTarget,
    pub direction: PenaltyDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PenaltyTarget {
    #[serde(rename = "SELF")]
    Self_,
    Opponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PenaltyDirection {
    Add,
    Subtract,
}

impl PenaltyDirection {
    pub fn sign(self) -> f64 {
        match self {
            Self::Add => 1.0,
            Self::Subtract => -1.0,
        }
    }
}

impl ScoreProfileDefinition {
    /// Names a formula may reference: part IDs in profile order, then the
    /// penalty aggregates.
    pub fn formula_symbols(&self) -> Vec<&str> {
        self.parts
            .iter()
            .map(|part| part.id.as_str())
            .chain(PENALTY_SYMBOLS)
            .collect()
    }

    /// Checks every structural invariant and reports all violations together.
    /// Every broken invariant, the total formula included.
    pub fn validate(&self, max_formula_length: usize) -> Result<(), Vec<String>> {
        let mut issues = self.structure_issues();
        self.validate_formula(max_formula_length, &mut issues);
        into_result(issues)
    }

    /// Invariants on parts, bonuses and penalties. The total formula is left
    /// to the engine, which reports its problems as scoring errors.
    pub fn validate_structure(&self) -> Result<(), Vec<String>> {
        into_result(self.structure_issues())
    }

    fn structure_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.version == 0 {
            issues.push("version must be at least 1".to_string());
        }
        if self.parts.is_empty() {
            issues.push("parts must not be empty".to_string());
        }

        let mut part_ids = HashSet::new();
        for part in &self.parts {
            check_identifier("part", &part.id, &mut issues);
            if !part_ids.insert(part.id.as_str()) {
                issues.push(format!("duplicate part id: {}", part.id));
            }
            match &part.kind {
                PartKind::Number(number) => {
                    if !number.points_per_unit.is_finite() || number.points_per_unit < 0.0 {
                        issues.push(format!(
                            "part '{}': pointsPerUnit must be a non-negative number",
                            part.id
                        ));
                    }
                }
                PartKind::Boolean(boolean) => {
                    if !boolean.true_points.is_finite() || boolean.true_points < 0.0 {
                        issues.push(format!(
                            "part '{}': truePoints must be a non-negative number",
                            part.id
                        ));
                    }
                }
            }
            if let Some(bonus) = &part.cooperative_bonus {
                if !matches!(bonus.required_team_count, 2 | 4) {
                    issues.push(format!(
                        "part '{}': cooperativeBonus.requiredTeamCount must be 2 or 4 (found {})",
                        part.id, bonus.required_team_count
                    ));
                }
                if bonus.bonus_points == 0 {
                    issues.push(format!(
                        "part '{}': cooperativeBonus.bonusPoints must be at least 1",
                        part.id
                    ));
                }
            }
        }

        let mut penalty_ids = HashSet::new();
        for penalty in &self.penalties {
            check_identifier("penalty", &penalty.id, &mut issues);
            if !penalty_ids.insert(penalty.id.as_str()) {
                issues.push(format!("duplicate penalty id: {}", penalty.id));
            }
        }

        issues
    }

    fn validate_formula(&self, max_formula_length: usize, issues: &mut Vec<String>) {
        let formula = self.total_formula.trim();
        if formula.is_empty() {
            issues.push("totalFormula must not be empty".to_string());
            return;
        }
        let length = self.total_formula.chars().count();
        if length > max_formula_length {
            issues.push(format!(
                "totalFormula is {length} characters, limit is {max_formula_length}"
            ));
            return;
        }

        match formula::compile(&self.total_formula) {
            Ok(expr) => {
                let known = self.formula_symbols();
                for name in expr.symbols() {
                    if !known.contains(&name) {
                        issues.push(format!("totalFormula references unknown symbol: {name}"));
                    }
                }
            }
            Err(err) => issues.push(format!("totalFormula: {err}")),
        }
    }
}

fn into_result(issues: Vec<String>) -> Result<(), Vec<String>> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

fn check_identifier(what: &str, id: &str, issues: &mut Vec<String>) {
    let mut chars = id.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if !valid {
        issues.push(format!(
            "{what} id '{id}' must match [A-Za-z_][A-Za-z0-9_]*"
        ));
    } else if PENALTY_SYMBOLS.contains(&id) {
        issues.push(format!("{what} id '{id}' shadows a reserved penalty symbol"));
    }
}
