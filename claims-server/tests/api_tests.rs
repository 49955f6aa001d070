use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use claims_server::{create_app, ClaimsServer};
use config_engine::Settings;
use serde_json::{json, Value};
use tower::ServiceExt;

const UPLOAD_CSV: &str = "Claim ID,Provider ID,Claim Status,Claim Date\n\
                          C1000001,1001,Paid,2019-01-02\n\
                          C1000002,1002,Denied,2019-01-03\n\
                          C1000003,1001,Denied,2019-01-04\n";

fn app_with(settings: Settings) -> Router {
    create_app(ClaimsServer::new(settings))
}

fn app() -> Router {
    app_with(Settings::default())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>, axum::http::HeaderMap) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec(), headers)
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes, _) = send(app, request).await;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, bytes, _) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn upload(app: &Router, file_name: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(format!("/api/v1/sessions/upload?filename={file_name}"))
        .method(Method::POST)
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes, _) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn create(app: &Router, variant: &str, rows: usize) -> String {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/v1/sessions",
        json!({ "variant": variant, "rows": rows }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_reports_session_count() {
    let app = app();
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["sessions"], 0);
    assert_eq!(body["max_sessions"], 16);
}

#[tokio::test]
async fn test_variants_are_listed() {
    let app = app();
    let (status, body) = get_json(&app, "/api/v1/variants").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["classic", "payor-mix", "dimensional"]);
    assert_eq!(body["data"][1]["rows"]["min"], 377_000);
}

#[tokio::test]
async fn test_session_lifecycle() {
    let app = app();
    let id = create(&app, "classic", 1000).await;

    let (status, body) = get_json(&app, &format!("/api/v1/sessions/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rows"], 1000);
    assert_eq!(body["data"]["origin"]["kind"], "generated");
    assert_eq!(body["data"]["columns"][0]["name"], "Claim ID");

    let (_, health) = get_json(&app, "/health").await;
    assert_eq!(health["sessions"], 1);

    let (status, _) = send_json(&app, Method::DELETE, &format!("/api/v1/sessions/{id}"), Value::Null).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = get_json(&app, &format!("/api/v1/sessions/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SESSION_5001");
    assert!(body["error_id"].is_string());
}

#[tokio::test]
async fn test_filter_returns_count_and_preview() {
    let app = app();
    let id = create(&app, "classic", 1000).await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/filter"),
        json!({ "status": "Paid", "limit": 5 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["source_rows"], 1000);
    let matched = data["matched"].as_u64().unwrap();
    assert!(matched <= 1000);
    let rows = data["rows"].as_array().unwrap();
    assert_eq!(rows.len() as u64, matched.min(5));
    assert!(rows.iter().all(|row| row["Claim Status"] == "Paid"));
}

#[tokio::test]
async fn test_non_numeric_provider_filter_is_bad_request() {
    let app = app();
    let id = create(&app, "classic", 1000).await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/filter"),
        json!({ "provider_id": "abc" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "FILTER_2001");
    assert_eq!(body["error_type"], "type_coercion_error");
}

#[tokio::test]
async fn test_generation_errors_map_to_bad_request() {
    let app = app();

    let (status, body) = send_json(&app, Method::POST, "/api/v1/sessions", json!({ "variant": "quantum" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "GEN_1003");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/sessions",
        json!({ "variant": "classic", "rows": 10 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "GEN_1002");
}

#[tokio::test]
async fn test_uploaded_csv_query_returns_only_matches() {
    let app = app();
    let (status, body) = upload(&app, "claims.csv", UPLOAD_CSV).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["origin"]["kind"], "uploaded");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/query"),
        json!({ "filters": { "Provider ID": "1001", "Claim Status": "Denied" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["total_count"], 1);
    assert_eq!(body["data"][0]["Claim ID"], "C1000003");
    assert_eq!(body["data"][0]["Provider ID"], 1001);

    let (status, body) = send_json(&app, Method::POST, &format!("/api/v1/sessions/{id}/query"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_query_on_unknown_column_is_bad_request() {
    let app = app();
    let (_, body) = upload(&app, "claims.csv", UPLOAD_CSV).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/query"),
        json!({ "filters": { "Favorite Color": "Blue" } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "FILTER_2002");
}

#[tokio::test]
async fn test_unsupported_upload_is_415() {
    let app = app();
    let (status, body) = upload(&app, "claims.xlsx", "not a spreadsheet").await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["code"], "INGEST_3001");
    assert_eq!(body["error_type"], "unsupported_format");
}

#[tokio::test]
async fn test_export_is_a_csv_attachment() {
    let app = app();
    let (_, body) = upload(&app, "claims.csv", UPLOAD_CSV).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let request = Request::builder()
        .uri(format!(
            "/api/v1/sessions/{id}/export?status=Denied&date_from=2019-01-01&date_to=2019-01-03"
        ))
        .body(Body::empty())
        .unwrap();
    let (status, bytes, headers) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"filtered_healthcare_claims_data.csv\""
    );
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "Claim ID,Provider ID,Claim Status,Claim Date\nC1000002,1002,Denied,2019-01-03\n"
    );

    let request = Request::builder()
        .uri(format!("/api/v1/sessions/{id}/export"))
        .body(Body::empty())
        .unwrap();
    let (_, bytes, headers) = send(&app, request).await;
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"healthcare_claims_data.csv\""
    );
    assert_eq!(String::from_utf8(bytes).unwrap().lines().count(), 4);
}

#[tokio::test]
async fn test_dimension_downloads() {
    let app = app();
    let id = create(&app, "dimensional", 1000).await;

    let request = Request::builder()
        .uri(format!("/api/v1/sessions/{id}/dimensions/payors"))
        .body(Body::empty())
        .unwrap();
    let (status, bytes, headers) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"payor_dimension.csv\""
    );
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("Payor ID,Payor Name,Is Government\n"));
    assert!(text.contains("0000000001,Medicare,true"));

    let (status, body) = get_json(&app, &format!("/api/v1/sessions/{id}/dimensions/providers")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "not_found");

    let classic = create(&app, "classic", 1000).await;
    let (status, _) = get_json(&app, &format!("/api/v1/sessions/{classic}/dimensions/facilities")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_cap_rejects_new_sessions() {
    let mut settings = Settings::default();
    settings.server.max_sessions = 1;
    let app = app_with(settings);

    let (status, _) = upload(&app, "claims.csv", UPLOAD_CSV).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = upload(&app, "claims.csv", UPLOAD_CSV).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SESSION_5002");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_uploads_never_exceed_the_session_cap() {
    let mut settings = Settings::default();
    settings.server.max_sessions = 1;
    let server = ClaimsServer::new(settings);
    let app = create_app(server.clone());

    let uploads: Vec<_> = (0..8)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move { upload(&app, "claims.csv", UPLOAD_CSV).await.0 })
        })
        .collect();

    let mut statuses = Vec::new();
    for handle in uploads {
        statuses.push(handle.await.unwrap());
    }
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CREATED).count(), 1);
    assert!(statuses
        .iter()
        .all(|s| *s == StatusCode::CREATED || *s == StatusCode::SERVICE_UNAVAILABLE));
    assert_eq!(server.session_count(), 1);
}

#[tokio::test]
async fn test_failed_upload_does_not_hold_a_session_slot() {
    let mut settings = Settings::default();
    settings.server.max_sessions = 1;
    let app = app_with(settings);

    let (status, _) = upload(&app, "claims.xlsx", "not a spreadsheet").await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let (status, _) = upload(&app, "claims.csv", UPLOAD_CSV).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_unknown_status_filter_is_bad_request() {
    let app = app();
    let (_, body) = upload(&app, "claims.csv", UPLOAD_CSV).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/filter"),
        json!({ "status": "Payed" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "GEN_1001");

    let (status, body) = send_json(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/filter"),
        json!({ "status": "denied" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["matched"], 2);
}

#[tokio::test]
async fn test_export_with_inactive_controls_is_the_full_file() {
    let app = app();
    let (_, body) = upload(&app, "claims.csv", UPLOAD_CSV).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    for query in ["status=All", "provider_id=", "date_from=2019-01-01"] {
        let request = Request::builder()
            .uri(format!("/api/v1/sessions/{id}/export?{query}"))
            .body(Body::empty())
            .unwrap();
        let (status, bytes, headers) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK, "{query}");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"healthcare_claims_data.csv\"",
            "{query}"
        );
        assert_eq!(String::from_utf8(bytes).unwrap().lines().count(), 4);
    }
}
