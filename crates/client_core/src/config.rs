use std::fs;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Base URL of the directory and lookup service, without a trailing `/`.
    pub api_base_url: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ClientFile {
    api_base_url: Option<String>,
}

impl ClientSettings {
    /// Reads `client.toml` (optional) and the environment once, at start-up.
    pub fn load() -> Result<Self> {
        let file = fs::read_to_string("client.toml").ok();
        resolve_settings(file.as_deref(), |key| std::env::var(key).ok())
    }
}

pub fn resolve_settings(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings> {
    let file_cfg = match file {
        Some(raw) => toml::from_str::<ClientFile>(raw).context("invalid client.toml")?,
        None => ClientFile::default(),
    };

    let raw = env("APP__API_BASE_URL")
        .or_else(|| env("API_BASE_URL"))
        .or(file_cfg.api_base_url)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

    Ok(ClientSettings {
        api_base_url: normalize_base_url(&raw)?,
    })
}

/// Trims whitespace and trailing slashes, then checks the result parses as an absolute URL.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    Url::parse(trimmed).with_context(|| format!("invalid API base URL '{trimmed}'"))?;
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
