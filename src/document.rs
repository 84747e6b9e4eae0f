use crate::error::{AppError, Result};
use crate::types::input::ScoreInput;
use crate::types::profile::ScoreProfileDefinition;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

pub fn load_profile(path: &Path) -> Result<ScoreProfileDefinition> {
    load_document(path)
}

pub fn load_input(path: &Path) -> Result<ScoreInput> {
    load_document(path)
}

/// Loads a profile and checks its structure, reporting every broken
/// invariant. Formula problems surface later as scoring errors.
pub fn load_valid_profile(path: &Path) -> Result<ScoreProfileDefinition> {
    let profile = load_profile(path)?;
    profile
        .validate_structure()
        .map_err(|issues| AppError::InvalidProfile {
            path: path.display().to_string(),
            issues: issues.join("; "),
        })?;
    Ok(profile)
}

/// SHA-256 over the canonical JSON form of the definition, so two documents
/// with the same content but different formatting share a digest.
pub fn profile_digest(profile: &ScoreProfileDefinition) -> Result<String> {
    let canonical = serde_json::to_vec(profile)?;
    Ok(sha256_hex(&canonical))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{digest:x}")
}

fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(AppError::PathNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(serde_json::from_str(&content)?),
        Some("toml") => Ok(toml::from_str(&content)?),
        _ => Err(AppError::UnsupportedFormat(path.display().to_string())),
    }
}
