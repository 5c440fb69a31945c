use axum::http::StatusCode;
use legal_codes::LegalCodeDirectory;
use serde_json::Value;
use shared::{
    domain::{AdministrativeRegion, CodeSearchMatch},
    error::{ApiError, ErrorCode},
    pnu::{compose_strict, Pnu},
    protocol::{json_text, EchoedQuery, ItemsResponse, LandCharacteristicsResponse},
};
use tracing::{error, warn};

use crate::vworld::{VworldClient, VworldError};

pub const DEFAULT_SEARCH_LIMIT: usize = 20;
pub const MAX_SEARCH_LIMIT: usize = 100;

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Misconfigured => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::Upstream => StatusCode::BAD_GATEWAY,
    }
}

/// Unparseable limits fall back to the default; parsed ones are clamped to `1..=100`.
pub fn parse_limit(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .map(|v| v.clamp(1, MAX_SEARCH_LIMIT as i64) as usize)
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
}

pub fn search_legal_codes(
    directory: &LegalCodeDirectory,
    query: &str,
    limit: Option<&str>,
) -> ItemsResponse<CodeSearchMatch> {
    ItemsResponse::new(directory.search(query.trim(), parse_limit(limit)))
}

pub fn list_sido(directory: &LegalCodeDirectory) -> ItemsResponse<AdministrativeRegion> {
    ItemsResponse::new(directory.sido())
}

pub fn list_sigungu(
    directory: &LegalCodeDirectory,
    sido_code: &str,
) -> ItemsResponse<AdministrativeRegion> {
    ItemsResponse::new(directory.sigungu(sido_code.trim()))
}

pub fn list_eupmyeondong(
    directory: &LegalCodeDirectory,
    sigungu_code: &str,
) -> ItemsResponse<AdministrativeRegion> {
    ItemsResponse::new(directory.eupmyeondong(sigungu_code.trim()))
}

/// Land lookup input after coercing a loosely typed JSON body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LandQuery {
    pub stdr_year: String,
    pub legal_dong_code: String,
    pub main_no: String,
    pub sub_no: String,
    pub mountain: bool,
}

impl LandQuery {
    /// Anything that is not a JSON object reads as an empty query.
    pub fn from_body(raw: &[u8]) -> Self {
        let body = serde_json::from_slice::<Value>(raw).unwrap_or(Value::Null);
        let text = |key: &str| body.get(key).and_then(json_text).unwrap_or_default();
        Self {
            stdr_year: text("stdrYear"),
            legal_dong_code: text("legalDongCode"),
            main_no: text("mainNo"),
            sub_no: text("subNo"),
            mountain: body.get("mountain").map(is_truthy).unwrap_or(false),
        }
    }

    pub fn validate(&self) -> Result<Pnu, ApiError> {
        if !(self.stdr_year.len() == 4 && self.stdr_year.bytes().all(|b| b.is_ascii_digit())) {
            return Err(ApiError::new(
                ErrorCode::Validation,
                "stdrYear must be a 4-digit year",
            ));
        }
        compose_strict(
            &self.legal_dong_code,
            &self.main_no,
            &self.sub_no,
            self.mountain,
        )
        .map_err(|e| ApiError::new(ErrorCode::Validation, e.to_string()))
    }

    fn echo(&self, pnu: &Pnu) -> EchoedQuery {
        EchoedQuery {
            pnu: pnu.to_string(),
            stdr_year: self.stdr_year.clone(),
            legal_dong_code: self.legal_dong_code.clone(),
            main_no: self.main_no.clone(),
            sub_no: self.sub_no.clone(),
            mountain: self.mountain,
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(entries) => !entries.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

pub async fn lookup_land_characteristics(
    vworld: &VworldClient,
    query: &LandQuery,
) -> Result<LandCharacteristicsResponse, ApiError> {
    let pnu = query.validate()?;

    let Some(api_key) = vworld.api_key() else {
        warn!("land characteristics requested without VWORLD_API_KEY");
        return Err(ApiError::new(
            ErrorCode::Misconfigured,
            "Server is missing VWORLD_API_KEY",
        ));
    };

    let page = vworld
        .fetch(api_key, &pnu, &query.stdr_year)
        .await
        .map_err(|err| {
            error!(%pnu, %err, "VWORLD lookup failed");
            upstream_error(err)
        })?;

    Ok(LandCharacteristicsResponse {
        result_code: page.result_code,
        result_msg: page.result_msg,
        count: page.items.len(),
        items: page.items,
        request: Some(query.echo(&pnu)),
    })
}

fn upstream_error(err: VworldError) -> ApiError {
    let message = err.to_string();
    match err {
        VworldError::Request(source) => {
            ApiError::new(ErrorCode::Upstream, message).with_detail(source.to_string())
        }
        VworldError::InvalidBody { raw } => {
            ApiError::new(ErrorCode::Upstream, message).with_detail(raw)
        }
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
