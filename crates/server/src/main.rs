use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use legal_codes::LegalCodeDirectory;
use serde::Deserialize;
use shared::{
    domain::{AdministrativeRegion, CodeSearchMatch},
    error::{ApiError, ErrorBody},
    protocol::{
        ItemsResponse, LandCharacteristicsResponse, CODE_SEARCH_ROUTE, EUPMYEONDONG_ROUTE,
        HEALTH_ROUTE, LAND_CHARACTERISTICS_ROUTE, SIDO_ROUTE, SIGUNGU_ROUTE,
    },
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;
mod vworld;

use app_state::AppState;
use config::load_settings;
use vworld::{VworldClient, VworldConfig};

const MAX_BODY_BYTES: usize = 64 * 1024;

type HttpError = (StatusCode, Json<ErrorBody>);

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    q: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SigunguQuery {
    #[serde(rename = "sidoCode")]
    sido_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EupmyeondongQuery {
    #[serde(rename = "sigunguCode")]
    sigungu_code: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let directory = LegalCodeDirectory::load(&settings.legal_codes_path)?;
    if settings.vworld_api_key.is_none() {
        warn!("VWORLD_API_KEY is not set; land characteristics lookups will fail");
    }
    let vworld = VworldClient::new(VworldConfig::from(&settings))?;

    let app = build_router(Arc::new(AppState { directory, vworld }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(HEALTH_ROUTE, get(health))
        .route(CODE_SEARCH_ROUTE, get(http_search_codes))
        .route(SIDO_ROUTE, get(http_list_sido))
        .route(SIGUNGU_ROUTE, get(http_list_sigungu))
        .route(EUPMYEONDONG_ROUTE, get(http_list_eupmyeondong))
        .route(LAND_CHARACTERISTICS_ROUTE, post(http_land_characteristics))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn reject(err: ApiError) -> HttpError {
    (api::status_for(err.code), Json(ErrorBody::from(err)))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

async fn http_search_codes(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> Json<ItemsResponse<CodeSearchMatch>> {
    Json(api::search_legal_codes(
        &state.directory,
        q.q.as_deref().unwrap_or_default(),
        q.limit.as_deref(),
    ))
}

async fn http_list_sido(
    State(state): State<Arc<AppState>>,
) -> Json<ItemsResponse<AdministrativeRegion>> {
    Json(api::list_sido(&state.directory))
}

async fn http_list_sigungu(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SigunguQuery>,
) -> Json<ItemsResponse<AdministrativeRegion>> {
    Json(api::list_sigungu(
        &state.directory,
        q.sido_code.as_deref().unwrap_or_default(),
    ))
}

async fn http_list_eupmyeondong(
    State(state): State<Arc<AppState>>,
    Query(q): Query<EupmyeondongQuery>,
) -> Json<ItemsResponse<AdministrativeRegion>> {
    Json(api::list_eupmyeondong(
        &state.directory,
        q.sigungu_code.as_deref().unwrap_or_default(),
    ))
}

async fn http_land_characteristics(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<LandCharacteristicsResponse>, HttpError> {
    let query = api::LandQuery::from_body(&body);
    let response = api::lookup_land_characteristics(&state.vworld, &query)
        .await
        .map_err(reject)?;
    info!(
        pnu = response.request.as_ref().map(|r| r.pnu.as_str()).unwrap_or_default(),
        count = response.count,
        "land characteristics served"
    );
    Ok(Json(response))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
