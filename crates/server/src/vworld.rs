//! Client for the VWorld land-characteristics data set.

use std::{collections::VecDeque, time::Duration};

use anyhow::Context;
use reqwest::Client;
use serde_json::{Map, Value};
use shared::{
    pnu::Pnu,
    protocol::{json_text, LandParcelRecord},
};
use thiserror::Error;

use crate::config::Settings;

const ROWS_PER_PAGE: &str = "10";
const FIRST_PAGE: &str = "1";
const RAW_EXCERPT_CHARS: usize = 500;

/// Keys that hold record lists anywhere in the upstream document.
const RECORD_CONTAINERS: &[&str] = &["field", "item"];

/// Canonical record key, then the upstream keys it may arrive under (first present wins).
const RECORD_FIELDS: &[(&str, &[&str])] = &[
    ("pnu", &["pnu"]),
    ("ldCodeNm", &["ldCodeNm"]),
    ("mnnmSlno", &["mnnmSlno"]),
    ("jibun", &["jibun"]),
    ("stdrYear", &["stdrYear"]),
    ("lndcgrCodeNm", &["lndcgrCodeNm"]),
    ("lndpclAr", &["lndpclAr"]),
    ("lnduseSittnCodeNm", &["lnduseSittnCodeNm", "ladUseSittnNm"]),
    ("spfc1", &["spfc1", "prposArea1Nm"]),
    ("spfc2", &["spfc2", "prposArea2Nm"]),
    ("roadSideCodeNm", &["roadSideCodeNm"]),
    ("tpgrphFrmCodeNm", &["tpgrphFrmCodeNm"]),
    ("tpgrphHgCodeNm", &["tpgrphHgCodeNm"]),
    ("prrnk", &["prrnk", "pblntfPclnd"]),
    ("lastUpdtDt", &["lastUpdtDt"]),
];

#[derive(Debug, Clone)]
pub struct VworldConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub domain: Option<String>,
    pub timeout: Duration,
}

impl From<&Settings> for VworldConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            url: settings.vworld_url.clone(),
            api_key: settings.vworld_api_key.clone(),
            domain: settings.vworld_domain.clone(),
            timeout: settings.vworld_timeout(),
        }
    }
}

#[derive(Debug, Error)]
pub enum VworldError {
    #[error("VWORLD request failed")]
    Request(#[source] reqwest::Error),
    #[error("Invalid response returned from VWORLD")]
    InvalidBody { raw: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LandCharacteristicsPage {
    pub result_code: String,
    pub result_msg: String,
    pub items: Vec<LandParcelRecord>,
}

#[derive(Clone)]
pub struct VworldClient {
    http: Client,
    config: VworldConfig,
}

impl VworldClient {
    pub fn new(config: VworldConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build VWORLD http client")?;
        Ok(Self { http, config })
    }

    pub fn api_key(&self) -> Option<&str> {
        self.config.api_key.as_deref()
    }

    pub async fn fetch(
        &self,
        api_key: &str,
        pnu: &Pnu,
        stdr_year: &str,
    ) -> Result<LandCharacteristicsPage, VworldError> {
        let mut params = vec![
            ("pnu", pnu.as_str()),
            ("stdrYear", stdr_year),
            ("format", "json"),
            ("numOfRows", ROWS_PER_PAGE),
            ("pageNo", FIRST_PAGE),
            ("key", api_key),
        ];
        if let Some(domain) = self.config.domain.as_deref() {
            params.push(("domain", domain));
        }

        let text = self
            .http
            .get(&self.config.url)
            .query(&params)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(VworldError::Request)?
            .text()
            .await
            .map_err(VworldError::Request)?;

        parse_land_characteristics(&text)
    }
}

/// Pulls the result code, message and every record out of an upstream JSON document.
pub fn parse_land_characteristics(raw: &str) -> Result<LandCharacteristicsPage, VworldError> {
    let document: Value = serde_json::from_str(raw).map_err(|_| VworldError::InvalidBody {
        raw: raw.chars().take(RAW_EXCERPT_CHARS).collect(),
    })?;

    let mut items = Vec::new();
    collect_records(&document, &mut items);

    Ok(LandCharacteristicsPage {
        result_code: find_text(&document, "resultCode").unwrap_or_default(),
        result_msg: find_text(&document, "resultMsg").unwrap_or_default(),
        items,
    })
}

/// Breadth-first, so envelope fields are found before anything nested in records.
fn find_text(document: &Value, key: &str) -> Option<String> {
    let mut queue = VecDeque::from([document]);
    while let Some(value) = queue.pop_front() {
        match value {
            Value::Object(map) => {
                if let Some(text) = map.get(key).and_then(json_text) {
                    return Some(text);
                }
                queue.extend(map.values());
            }
            Value::Array(entries) => queue.extend(entries.iter()),
            _ => {}
        }
    }
    None
}

fn collect_records(value: &Value, out: &mut Vec<LandParcelRecord>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if !RECORD_CONTAINERS.contains(&key.as_str()) {
                    collect_records(child, out);
                    continue;
                }
                match child {
                    Value::Array(entries) => out.extend(entries.iter().filter_map(record_from)),
                    Value::Object(_) => out.extend(record_from(child)),
                    _ => {}
                }
            }
        }
        Value::Array(entries) => {
            for entry in entries {
                collect_records(entry, out);
            }
        }
        _ => {}
    }
}

fn record_from(entry: &Value) -> Option<LandParcelRecord> {
    let Value::Object(source) = entry else {
        return None;
    };

    let mut canonical = Map::new();
    for (key, aliases) in RECORD_FIELDS {
        let text = aliases
            .iter()
            .find_map(|alias| source.get(*alias).and_then(json_text));
        if let Some(text) = text {
            canonical.insert((*key).to_string(), Value::String(text));
        }
    }
    if canonical.is_empty() {
        return None;
    }

    serde_json::from_value(Value::Object(canonical)).ok()
}

#[cfg(test)]
#[path = "tests/vworld_tests.rs"]
mod tests;
