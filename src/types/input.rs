use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Raw achieved value for one part: a count for number parts, a flag for
/// boolean parts. Anything else lands in `Other` and is rejected per part
/// by the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Number(f64),
    Other(serde_json::Value),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

/// Scoring input for one match side.
///
/// `cooperative` carries, for each part with a cooperative bonus, the raw
/// values of every team in the cooperating group (the evaluated team
/// included).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreInput {
    #[serde(default)]
    pub values: BTreeMap<String, RawValue>,
    #[serde(default)]
    pub penalties: BTreeMap<String, u32>,
    #[serde(default)]
    pub cooperative: BTreeMap<String, Vec<RawValue>>,
}

#[cfg(test)]
impl ScoreInput {
    pub fn with_value(mut self, part: &str, value: RawValue) -> Self {
        self.values.insert(part.to_string(), value);
        self
    }

    pub fn with_penalty(mut self, penalty: &str, count: u32) -> Self {
        self.penalties.insert(penalty.to_string(), count);
        self
    }

    pub fn with_group(mut self, part: &str, values: Vec<RawValue>) -> Self {
        self.cooperative.insert(part.to_string(), values);
        self
    }
}
