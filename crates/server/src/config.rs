use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use serde::Deserialize;

pub const DEFAULT_VWORLD_URL: &str = "https://api.vworld.kr/ned/data/getLandCharacteristics";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub legal_codes_path: PathBuf,
    pub vworld_url: String,
    pub vworld_api_key: Option<String>,
    pub vworld_domain: Option<String>,
    pub vworld_timeout_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            legal_codes_path: PathBuf::from("./data/legal_codes.csv"),
            vworld_url: DEFAULT_VWORLD_URL.into(),
            vworld_api_key: None,
            vworld_domain: None,
            vworld_timeout_seconds: 15,
        }
    }
}

impl Settings {
    pub fn vworld_timeout(&self) -> Duration {
        Duration::from_secs(self.vworld_timeout_seconds)
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string("server.toml").ok();
    resolve_settings(file.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then `server.toml`, then the environment; `APP__*` names win over the plain ones.
pub fn resolve_settings(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.server_bind = v.clone();
            }
            if let Some(v) = file_cfg.get("legal_codes_path") {
                settings.legal_codes_path = PathBuf::from(v);
            }
            if let Some(v) = file_cfg.get("vworld_url") {
                settings.vworld_url = v.clone();
            }
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("LEGAL_CODES_PATH") {
        settings.legal_codes_path = PathBuf::from(v);
    }
    if let Some(v) = env("APP__LEGAL_CODES_PATH") {
        settings.legal_codes_path = PathBuf::from(v);
    }

    if let Some(v) = env("VWORLD_URL") {
        settings.vworld_url = v;
    }

    if let Some(v) = non_blank(env("VWORLD_API_KEY")) {
        settings.vworld_api_key = Some(v);
    }
    if let Some(v) = non_blank(env("APP__VWORLD_API_KEY")) {
        settings.vworld_api_key = Some(v);
    }

    if let Some(v) = non_blank(env("VWORLD_DOMAIN")) {
        settings.vworld_domain = Some(v);
    }

    if let Some(v) = env("APP__VWORLD_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.vworld_timeout_seconds = parsed;
        }
    }

    settings
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
