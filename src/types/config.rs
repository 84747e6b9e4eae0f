use crate::error::AppError;
use serde::Deserialize;
use std::collections::BTreeMap;

pub const DEFAULT_MAX_FORMULA_LENGTH: usize = 2000;
const MAX_SCORE_DECIMALS: u32 = 6;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchScoreConfig {
    pub engine: Option<EngineConfig>,
    pub profiles: Option<ProfilesConfig>,
    /// `layer:dotted.key` for every value a later layer replaced.
    #[serde(skip)]
    pub overrides: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub max_formula_length: Option<usize>,
    pub score_decimals: Option<u32>,
    pub log_level: Option<String>,
}

/// Profile assignments: one per stage, plus the tournament-level fallback.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfilesConfig {
    pub tournament: Option<String>,
    #[serde(default)]
    pub stages: BTreeMap<String, String>,
}

/// Knobs the orchestrator applies to every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub max_formula_length: usize,
    pub score_decimals: Option<u32>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_formula_length: DEFAULT_MAX_FORMULA_LENGTH,
            score_decimals: None,
        }
    }
}

impl MatchScoreConfig {
    pub fn engine_settings(&self) -> EngineSettings {
        let defaults = EngineSettings::default();
        match &self.engine {
            Some(engine) => EngineSettings {
                max_formula_length: engine
                    .max_formula_length
                    .unwrap_or(defaults.max_formula_length),
                score_decimals: engine.score_decimals,
            },
            None => defaults,
        }
    }

    pub fn log_level(&self) -> Option<&str> {
        self.engine
            .as_ref()
            .and_then(|engine| engine.log_level.as_deref())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(engine) = &self.engine {
            if engine.max_formula_length == Some(0) {
                return Err(AppError::ConfigParse(
                    "engine.max_formula_length must be greater than 0".to_string(),
                ));
            }
            if let Some(decimals) = engine.score_decimals {
                if decimals > MAX_SCORE_DECIMALS {
                    return Err(AppError::ConfigParse(format!(
                        "engine.score_decimals must be between 0 and {MAX_SCORE_DECIMALS}"
                    )));
                }
            }
            if let Some(level) = &engine.log_level {
                if level.trim().is_empty() {
                    return Err(AppError::ConfigParse(
                        "engine.log_level must not be empty".to_string(),
                    ));
                }
            }
        }

        if let Some(profiles) = &self.profiles {
            if profiles
                .tournament
                .as_ref()
                .is_some_and(|path| path.trim().is_empty())
            {
                return Err(AppError::ConfigParse(
                    "profiles.tournament must be a non-empty path".to_string(),
                ));
            }
            for (stage, path) in &profiles.stages {
                if stage.trim().is_empty() || path.trim().is_empty() {
                    return Err(AppError::ConfigParse(format!(
                        "profiles.stages entry '{stage}' must map a stage id to a non-empty path"
                    )));
                }
            }
        }

        Ok(())
    }
}
