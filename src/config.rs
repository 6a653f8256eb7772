use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::types::{AccessMode, Language, TextSize};

pub const ENV_CONFIG_FILE: &str = "SAM_CONFIG";
pub const ENV_ENDPOINT: &str = "SAM_ENDPOINT";
pub const ENV_MODEL: &str = "SAM_MODEL";
const DEFAULT_CONFIG_FILENAME: &str = "sam.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    /// Stateless relay that owns the system prompt: `{messages}` in, `{role, content}` out.
    #[default]
    Relay,
    /// OpenAI-compatible chat completions, called directly.
    Openrouter,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub kind: EndpointKind,
    pub url: String,
    pub model: String,
    pub api_key_env: String,
    pub timeout_ms: Option<u64>,
    pub referer: Option<String>,
    pub title: Option<String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            kind: EndpointKind::Relay,
            url: "http://localhost:3000/api/chat".to_string(),
            model: "google/gemini-2.0-flash-exp:free".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            timeout_ms: None,
            referer: None,
            title: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub user_name: String,
    pub language: Language,
    pub tts: bool,
    pub text_size: TextSize,
    pub mode: AccessMode,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            user_name: "Fatima".to_string(),
            language: Language::English,
            tts: false,
            text_size: TextSize::Normal,
            mode: AccessMode::Standard,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: EndpointConfig,
    pub profile: ProfileConfig,
}

impl Config {
    /// Load the first config file found, then apply environment overrides.
    /// A missing file is not an error; a malformed one is.
    pub fn load() -> Result<Self> {
        let mut config = match config_candidates().into_iter().find(|p| p.is_file()) {
            Some(path) => {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read `{}`", path.display()))?;
                let parsed = Self::parse(&text)
                    .with_context(|| format!("invalid config `{}`", path.display()))?;
                tracing::info!(path = %path.display(), "loaded config");
                parsed
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("not valid TOML")
    }

    pub(crate) fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_ENDPOINT).filter(|v| !v.trim().is_empty()) {
            self.endpoint.url = url.trim().to_string();
        }
        if let Some(model) = lookup(ENV_MODEL).filter(|v| !v.trim().is_empty()) {
            self.endpoint.model = model.trim().to_string();
        }
        if let Some(ms) = lookup("API_TIMEOUT_MS").and_then(|v| v.trim().parse::<u64>().ok()) {
            self.endpoint.timeout_ms = Some(ms);
        }
    }
}

fn config_candidates() -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Some(path) = std::env::var_os(ENV_CONFIG_FILE) {
        out.push(PathBuf::from(path));
    }
    out.push(PathBuf::from(DEFAULT_CONFIG_FILENAME));
    if let Some(home) = home_dir() {
        out.push(home.join(".config").join("sam").join("config.toml"));
    }
    out
}

/// Returns the current user's home directory in a cross-platform way.
/// - Unix/macOS: `$HOME`
/// - Windows: `$USERPROFILE`, then `$HOMEDRIVE$HOMEPATH`
pub fn home_dir() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("HOME") {
        return Some(PathBuf::from(home));
    }
    if cfg!(target_os = "windows") {
        if let Some(profile) = std::env::var_os("USERPROFILE") {
            return Some(PathBuf::from(profile));
        }
        if let (Some(drive), Some(path)) =
            (std::env::var_os("HOMEDRIVE"), std::env::var_os("HOMEPATH"))
        {
            let mut p = PathBuf::from(drive);
            p.push(path);
            return Some(p);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{Config, EndpointKind};
    use crate::types::{AccessMode, Language};

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = Config::parse("").expect("empty TOML is valid");
        assert_eq!(cfg.endpoint.kind, EndpointKind::Relay);
        assert_eq!(cfg.profile.language, Language::English);
        assert!(!cfg.profile.tts);
    }

    #[test]
    fn sections_override_defaults() {
        let raw = r#"
            [endpoint]
            kind = "openrouter"
            url = "https://openrouter.ai/api/v1"
            timeout_ms = 15000

            [profile]
            user_name = "Sam"
            language = "Swedish"
            tts = true
            mode = "Vision"
        "#;
        let cfg = Config::parse(raw).expect("should parse");
        assert_eq!(cfg.endpoint.kind, EndpointKind::Openrouter);
        assert_eq!(cfg.endpoint.timeout_ms, Some(15_000));
        assert_eq!(cfg.endpoint.api_key_env, "OPENROUTER_API_KEY");
        assert_eq!(cfg.profile.user_name, "Sam");
        assert_eq!(cfg.profile.language, Language::Swedish);
        assert_eq!(cfg.profile.mode, AccessMode::Vision);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = Config::parse("[endpoint\nkind = 1").expect_err("should fail");
        assert!(err.to_string().contains("TOML"));
    }

    #[test]
    fn env_overrides_endpoint_and_model() {
        let mut cfg = Config::default();
        cfg.apply_env(|key| match key {
            "SAM_ENDPOINT" => Some(" http://relay.local/api/chat ".to_string()),
            "SAM_MODEL" => Some("  ".to_string()),
            "API_TIMEOUT_MS" => Some("2500".to_string()),
            _ => None,
        });
        assert_eq!(cfg.endpoint.url, "http://relay.local/api/chat");
        assert_eq!(cfg.endpoint.model, Config::default().endpoint.model);
        assert_eq!(cfg.endpoint.timeout_ms, Some(2_500));
    }
}
