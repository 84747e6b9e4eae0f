use crate::error::{AppError, Result};
use crate::types::config::MatchScoreConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "matchscore.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".matchscore/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/matchscore/config.toml";

pub fn load_config(root: &Path) -> Result<Option<MatchScoreConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<MatchScoreConfig>> {
    let repo_path = root.join(DEFAULT_CONFIG_FILE);
    if !repo_path.exists() {
        return Ok(None);
    }

    let layers = [
        ("global", global_path.map(Path::to_path_buf)),
        ("repo", Some(repo_path)),
        ("local", Some(root.join(DEFAULT_LOCAL_FILE))),
    ];
    let mut merged = Value::Table(Map::new());
    let mut overrides = Vec::new();
    for (layer, path) in layers {
        let Some(path) = path else {
            continue;
        };
        if !path.exists() {
            continue;
        }
        let replaced = merge_toml(&mut merged, read_toml_value(&path)?, "");
        overrides.extend(replaced.into_iter().map(|key| format!("{layer}:{key}")));
    }

    let mut cfg: MatchScoreConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| AppError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    cfg.overrides = overrides;
    Ok(Some(cfg))
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| AppError::ConfigParse(format!("{}: {}", path.display(), e)))
}

/// Deep-merges `overlay` into `base`. Tables merge key by key; any other
/// value replaces what was there. Returns the dotted paths that replaced an
/// earlier value.
fn merge_toml(base: &mut Value, overlay: Value, prefix: &str) -> Vec<String> {
    let mut overridden = Vec::new();
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                match base_table.get_mut(&key) {
                    Some(existing) => overridden.extend(merge_toml(existing, value, &path)),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
            overridden.push(prefix.to_string());
        }
    }
    overridden
}
