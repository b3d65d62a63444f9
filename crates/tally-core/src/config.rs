use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ai::{gemini, ollama};
use crate::profile::FirmProfile;
use crate::provider::Provider;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Preferences persisted in `<config_dir>/tally/config.json`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub profile: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: Option<String>,
    pub ollama_base_url: Option<String>,
    /// Replaces the profile's built-in assistant persona.
    pub persona: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("tally").join("config.json"))
    }
}

/// Effective runtime settings: config file, then environment overrides, then
/// built-in defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub profile: &'static FirmProfile,
    pub provider: Provider,
    pub model: String,
    /// True when the model came from the environment or config file rather
    /// than the provider default.
    pub model_is_explicit: bool,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub ollama_base_url: String,
    pub persona: String,
    pub request_timeout_secs: u64,
}

impl Settings {
    pub fn from_env(config: Config) -> Self {
        Self::resolve(config, |key| std::env::var(key).ok())
    }

    pub fn resolve(config: Config, env: impl Fn(&str) -> Option<String>) -> Self {
        let env = |key: &str| present(env(key));

        let profile_key = env("TALLY_PROFILE").or(present(config.profile));
        let profile = match profile_key.as_deref() {
            Some(key) => FirmProfile::by_key(key).unwrap_or_else(|| {
                let known: Vec<&str> = FirmProfile::all().iter().map(|p| p.key).collect();
                warn!(profile = key, ?known, "unknown firm profile, using default");
                FirmProfile::default_profile()
            }),
            None => FirmProfile::default_profile(),
        };

        let provider_name = env("TALLY_PROVIDER").or(present(config.provider));
        let provider = match provider_name.as_deref() {
            Some(name) => Provider::from_str(name).unwrap_or_else(|| {
                warn!(provider = name, "unknown provider, using default");
                Provider::default()
            }),
            None => Provider::default(),
        };

        let explicit_model = env("TALLY_MODEL").or(present(config.model));
        let model_is_explicit = explicit_model.is_some();
        let model = explicit_model.unwrap_or_else(|| provider.default_model().to_string());

        let gemini_api_key = env("GEMINI_API_KEY")
            .or_else(|| env("API_KEY"))
            .or(present(config.gemini_api_key));

        Self {
            profile,
            provider,
            model,
            model_is_explicit,
            gemini_api_key,
            gemini_base_url: present(config.gemini_base_url)
                .unwrap_or_else(|| gemini::DEFAULT_BASE_URL.to_string()),
            ollama_base_url: present(config.ollama_base_url)
                .unwrap_or_else(|| ollama::DEFAULT_BASE_URL.to_string()),
            persona: present(config.persona)
                .unwrap_or_else(|| profile.assistant.persona.to_string()),
            request_timeout_secs: config
                .request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Blank strings in the file or environment mean "not set".
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
