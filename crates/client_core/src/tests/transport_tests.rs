use super::*;
use std::collections::HashMap;

use axum::{
    extract::Query,
    http::StatusCode as AxumStatus,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use shared::domain::CodeStatus;
use tokio::net::TcpListener;

async fn spawn_service() -> String {
    async fn sido() -> impl IntoResponse {
        Json(serde_json::json!({
            "items": [{"code": "11", "name": "서울특별시"}, {"code": "41", "name": "경기도"}],
            "count": 2
        }))
    }

    async fn sigungu(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
        let code = q.get("sidoCode").cloned().unwrap_or_default();
        Json(serde_json::json!({
            "items": [{"code": format!("{code}110"), "name": format!("district of {code}")}],
            "count": 1
        }))
    }

    async fn eupmyeondong() -> impl IntoResponse {
        (AxumStatus::BAD_GATEWAY, "upstream exploded")
    }

    async fn search(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
        if q.get("q").map(String::as_str) == Some("bad") {
            return (
                AxumStatus::BAD_REQUEST,
                Json(serde_json::json!({ "error": "query rejected" })),
            )
                .into_response();
        }
        let query = q.get("q").cloned().unwrap_or_default();
        let limit = q.get("limit").cloned().unwrap_or_default();
        Json(serde_json::json!({
            "items": [{
                "code": "4122010600",
                "name": format!("{query} x{limit}"),
                "status": "폐지"
            }],
            "count": 1
        }))
        .into_response()
    }

    async fn land(Json(body): Json<serde_json::Value>) -> impl IntoResponse {
        if body["mainNo"] == "broken" {
            return "not json at all".into_response();
        }
        Json(serde_json::json!({
            "resultCode": "00",
            "resultMsg": "정상",
            "items": [{"pnu": body["legalDongCode"], "lndpclAr": 12.5}],
            "count": 1,
            "request": {
                "pnu": "4122010600104490002",
                "stdrYear": body["stdrYear"],
                "legalDongCode": body["legalDongCode"],
                "mainNo": body["mainNo"],
                "subNo": body["subNo"],
                "mountain": body["mountain"]
            }
        }))
        .into_response()
    }

    let app = Router::new()
        .route(SIDO_ROUTE, get(sido))
        .route(SIGUNGU_ROUTE, get(sigungu))
        .route(EUPMYEONDONG_ROUTE, get(eupmyeondong))
        .route(CODE_SEARCH_ROUTE, get(search))
        .route(LAND_CHARACTERISTICS_ROUTE, post(land));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

fn land_request(main_no: &str) -> LandCharacteristicsRequest {
    LandCharacteristicsRequest {
        stdr_year: "2025".into(),
        legal_dong_code: "4122010600".into(),
        mountain: false,
        main_no: main_no.into(),
        sub_no: "2".into(),
    }
}

#[tokio::test]
async fn lists_regions_with_parent_code() {
    let client = HttpApiClient::new(spawn_service().await);

    let provinces = client.list_provinces().await.expect("provinces");
    assert_eq!(provinces.len(), 2);
    assert_eq!(provinces[1].code, "41");

    let districts = client.list_districts("41").await.expect("districts");
    assert_eq!(districts[0].code, "41110");
    assert_eq!(districts[0].name, "district of 41");
}

#[tokio::test]
async fn plain_text_failure_becomes_rejection_message() {
    let client = HttpApiClient::new(spawn_service().await);
    let err = client
        .list_sub_districts("41110")
        .await
        .expect_err("must fail");
    assert_eq!(
        err,
        SourceError::Rejected {
            status: 502,
            message: Some("upstream exploded".into())
        }
    );
}

#[tokio::test]
async fn search_sends_query_and_limit() {
    let client = HttpApiClient::new(spawn_service().await);
    let matches = client.search_codes("평택 세교", 30).await.expect("matches");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name, "평택 세교 x30");
    assert_eq!(matches[0].status, CodeStatus::Abolished);

    let err = client.search_codes("bad", 30).await.expect_err("must fail");
    assert_eq!(
        err,
        SourceError::Rejected {
            status: 400,
            message: Some("query rejected".into())
        }
    );
}

#[tokio::test]
async fn lookup_posts_camel_case_body() {
    let client = HttpApiClient::new(spawn_service().await);
    let response = client.lookup(&land_request("449")).await.expect("response");
    assert_eq!(response.result_code, "00");
    assert_eq!(response.items.len(), 1);
    assert_eq!(response.items[0].pnu.as_deref(), Some("4122010600"));
    assert_eq!(response.items[0].area.as_deref(), Some("12.5"));
    let echoed = response.request.expect("echo");
    assert_eq!(echoed.main_no, "449");
    assert_eq!(echoed.stdr_year, "2025");
}

#[tokio::test]
async fn non_json_success_body_is_malformed() {
    let client = HttpApiClient::new(spawn_service().await);
    let err = client
        .lookup(&land_request("broken"))
        .await
        .expect_err("must fail");
    assert_eq!(err, SourceError::Malformed("not json at all".into()));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = HttpApiClient::new(format!("http://{addr}"));
    let err = client.list_provinces().await.expect_err("must fail");
    assert!(matches!(err, SourceError::Transport(_)), "got {err:?}");
}

#[test]
fn empty_bodies_decode_leniently() {
    let body: ItemsResponse<AdministrativeRegion> =
        decode_body(StatusCode::OK, "  ").expect("empty success");
    assert!(body.items.is_empty());

    let err = decode_body::<ItemsResponse<AdministrativeRegion>>(StatusCode::NOT_FOUND, "")
        .expect_err("failure");
    assert_eq!(
        err,
        SourceError::Rejected {
            status: 404,
            message: None
        }
    );

    let err = decode_body::<ItemsResponse<AdministrativeRegion>>(
        StatusCode::BAD_REQUEST,
        r#"{"detail":"no error field"}"#,
    )
    .expect_err("failure");
    assert_eq!(
        err,
        SourceError::Rejected {
            status: 400,
            message: None
        }
    );
}
