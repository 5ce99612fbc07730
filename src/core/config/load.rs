//! Configuration loading with env-var overrides.
//!
//! Reads TOML files, supports `[meta] base = "..."` inheritance chains,
//! and applies the `YVI_*` / `SUPABASE_*` env overrides.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::error::AppError;

use super::raw::RawConfig;
use super::types::*;

/// Values sourced from the environment rather than the TOML file.
///
/// [`load`] reads them once; tests build them directly instead of mutating
/// process env vars.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    /// `YVI_LOG_LEVEL`
    pub log_level: Option<String>,
    /// `YVI_ENV`: `development` or `production`. Any other value reads as
    /// production.
    pub ui_mode: Option<String>,
    /// `SUPABASE_URL`
    pub supabase_url: Option<String>,
    /// `SUPABASE_KEY`, the only source of the store API key.
    pub supabase_key: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        let non_empty = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            log_level: non_empty("YVI_LOG_LEVEL"),
            ui_mode: non_empty("YVI_ENV"),
            supabase_url: non_empty("SUPABASE_URL"),
            supabase_key: non_empty("SUPABASE_KEY"),
        }
    }
}

/// Minimal config used when no file is given and `config/default.toml` is absent.
const BUILTIN_TOML: &str = r#"
[supervisor]
bot_name = "yvi-bot"
log_level = "info"
"#;

/// Deep-merge two TOML values.
/// Tables merge recursively; any other overlay value replaces the base wholesale.
fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_tbl), toml::Value::Table(overlay_tbl)) => {
            for (key, ov_val) in overlay_tbl {
                let merged = match base_tbl.remove(&key) {
                    Some(base_val) => merge_toml(base_val, ov_val),
                    None => ov_val,
                };
                base_tbl.insert(key, merged);
            }
            toml::Value::Table(base_tbl)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file, follow any `[meta] base = "..."` chain, and return the
/// merged `toml::Value`. `visited` holds canonical paths already seen so a
/// circular chain fails instead of recursing forever.
fn load_raw_merged(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<toml::Value, AppError> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical) {
        return Err(AppError::Config(format!(
            "circular base reference detected at: {}",
            path.display()
        )));
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let overlay_val: toml::Value = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let base_str = overlay_val
        .get("meta")
        .and_then(|m| m.get("base"))
        .and_then(|b| b.as_str());

    match base_str {
        Some(base_str) => {
            let base_path = if Path::new(base_str).is_absolute() {
                PathBuf::from(base_str)
            } else {
                path.parent().unwrap_or(Path::new(".")).join(base_str)
            };
            let base_val = load_raw_merged(&base_path, visited)?;
            Ok(merge_toml(base_val, overlay_val))
        }
        None => Ok(overlay_val),
    }
}

/// Load config from the given path, or `config/default.toml`, then apply env overrides.
/// If no path is given and `config/default.toml` does not exist, the built-in
/// defaults are used.
pub fn load(config_path: Option<&str>) -> Result<Config, AppError> {
    let overrides = EnvOverrides::from_env();

    if let Some(path) = config_path {
        return load_from(Path::new(path), &overrides);
    }

    let default_path = Path::new("config/default.toml");
    if default_path.exists() {
        load_from(default_path, &overrides)
    } else {
        let value: toml::Value = toml::from_str(BUILTIN_TOML)
            .map_err(|e| AppError::Config(format!("built-in config: {e}")))?;
        resolve(value, &overrides, Path::new("<built-in>"))
    }
}

/// Loader behind [`load`]; accepts an explicit path and overrides.
/// Follows `[meta] base = "..."` inheritance chains before resolving.
pub fn load_from(path: &Path, overrides: &EnvOverrides) -> Result<Config, AppError> {
    let merged_val = load_raw_merged(path, &mut HashSet::new())?;
    resolve(merged_val, overrides, path)
}

fn resolve(value: toml::Value, overrides: &EnvOverrides, origin: &Path) -> Result<Config, AppError> {
    let parsed: RawConfig = Deserialize::deserialize(value).map_err(|e: toml::de::Error| {
        AppError::Config(format!("config error in {}: {e}", origin.display()))
    })?;

    let s = parsed.supervisor;
    let log_level = overrides.log_level.clone().unwrap_or(s.log_level);

    // An unrecognized YVI_ENV means production; only a bad file value is fatal.
    let (mode, ignored_env_mode) = match overrides.ui_mode.as_deref() {
        Some(env_mode) => match UiMode::parse(env_mode) {
            Some(mode) => (mode, None),
            None => (UiMode::Production, Some(env_mode.to_string())),
        },
        None => {
            let mode = UiMode::parse(&parsed.ui.mode).ok_or_else(|| {
                AppError::Config(format!(
                    "invalid ui mode '{}' (expected 'development' or 'production')",
                    parsed.ui.mode
                ))
            })?;
            (mode, None)
        }
    };

    let supabase_url = overrides
        .supabase_url
        .clone()
        .unwrap_or(parsed.store.supabase.url)
        .trim()
        .trim_end_matches('/')
        .to_string();

    Ok(Config {
        bot_name: s.bot_name,
        log_level,
        log_file: s.log_file.as_deref().map(expand_home),
        server: ServerConfig {
            bind: parsed.server.bind,
            cors_origins: parsed.server.cors_origins,
        },
        store: StoreConfig {
            backend: parsed.store.backend.trim().to_ascii_lowercase(),
            supabase: SupabaseConfig {
                url: supabase_url,
                knowledge_table: parsed.store.supabase.knowledge_table,
                log_table: parsed.store.supabase.log_table,
                timeout_seconds: parsed.store.supabase.timeout_seconds.max(1),
            },
        },
        store_api_key: overrides.supabase_key.clone(),
        ignored_env_mode,
        knowledge: KnowledgeConfig {
            seed_file: parsed
                .knowledge
                .seed_file
                .as_deref()
                .filter(|p| !p.trim().is_empty())
                .map(expand_home),
            snapshot_fallback: parsed.knowledge.snapshot_fallback,
        },
        ui: UiConfig {
            enabled: parsed.ui.enabled,
            mode,
            static_dir: expand_home(&parsed.ui.static_dir),
            dev_server_url: parsed.ui.dev_server_url.trim_end_matches('/').to_string(),
        },
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
