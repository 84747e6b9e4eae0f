use crate::error::{AppError, Result};
use crate::types::config::MatchScoreConfig;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileLevel {
    Stage,
    Tournament,
}

impl ProfileLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stage => "stage",
            Self::Tournament => "tournament",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProfile {
    pub path: PathBuf,
    pub level: ProfileLevel,
}

/// Picks the profile for `stage`: its own assignment, else the tournament
/// fallback. Relative paths are resolved against `root`.
pub fn resolve_profile(
    root: &Path,
    stage: &str,
    config: Option<&MatchScoreConfig>,
) -> Result<ResolvedProfile> {
    let profiles = config.and_then(|cfg| cfg.profiles.as_ref());

    if let Some(path) = profiles.and_then(|profiles| profiles.stages.get(stage)) {
        return Ok(ResolvedProfile {
            path: root.join(path),
            level: ProfileLevel::Stage,
        });
    }

    if let Some(path) = profiles.and_then(|profiles| profiles.tournament.as_ref()) {
        return Ok(ResolvedProfile {
            path: root.join(path),
            level: ProfileLevel::Tournament,
        });
    }

    Err(AppError::NoProfileAssigned(stage.to_string()))
}
