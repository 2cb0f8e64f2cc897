use std::{collections::HashMap, path::Path, time::Duration};

use anyhow::Context;
use config::{Config, Environment, File};
use reading_core::{OrchestratorSettings, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "tarot.toml";
const ENV_PREFIX: &str = "TAROT";
const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database_url: String,
    pub narrative: NarrativeSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NarrativeSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/TAROT.db".into(),
            narrative: NarrativeSettings::default(),
        }
    }
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            api_key: None,
            model: "gpt-4o-mini".into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_seconds: Some(60),
        }
    }
}

impl Settings {
    pub fn orchestrator_settings(&self) -> OrchestratorSettings {
        OrchestratorSettings {
            max_tokens: self.narrative.max_tokens,
            temperature: self.narrative.temperature,
            lookup_timeout: None,
            narrative_timeout: self.narrative.timeout_seconds.map(Duration::from_secs),
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.narrative
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Layers `tarot.toml` in the working directory and `TAROT__*` environment
/// variables over the defaults. `OPENAI_API_KEY` fills in a missing key.
pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE), None)
}

pub(crate) fn load_settings_from(
    path: &Path,
    env: Option<HashMap<String, String>>,
) -> anyhow::Result<Settings> {
    let openai_key = match &env {
        Some(vars) => vars.get(OPENAI_KEY_VAR).cloned(),
        None => std::env::var(OPENAI_KEY_VAR).ok(),
    };

    let mut settings: Settings = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()
        .with_context(|| format!("failed to load configuration from '{}'", path.display()))?
        .try_deserialize()
        .context("invalid configuration")?;

    if settings.api_key().is_none() {
        settings.narrative.api_key = openai_key;
    }
    settings.database_url = normalize_database_url(&settings.database_url);
    Ok(settings)
}

pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
