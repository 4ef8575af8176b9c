use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::common::{
    FixturePage, TEST_MAX_PAGES, listing_page, quote_block, setup_test_app, two_quote_site,
};

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body) = send(router, Request::get(uri).body(Body::empty()).unwrap()).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_scrape(router: &Router, max_pages: u32) -> (StatusCode, serde_json::Value) {
    let request = Request::post("/api/scrape")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_vec(&serde_json::json!({ "max_pages": max_pages })).unwrap(),
        ))
        .unwrap();
    let (status, body) = send(router, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app(two_quote_site()).await;

    let (status, json) = get_json(&app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["quotes"], 0);
}

#[tokio::test]
async fn queries_before_any_scrape_are_empty() {
    let app = setup_test_app(two_quote_site()).await;

    let (_, json) = get_json(&app.router, "/api/quotes").await;
    assert_eq!(json["total"], 0);

    let (_, json) = get_json(&app.router, "/api/stats").await;
    assert_eq!(json["total_quotes"], 0);
    assert_eq!(json["unique_authors"], 0);
    assert_eq!(json["unique_tags"], 0);

    let (_, json) = get_json(&app.router, "/api/tags").await;
    assert_eq!(json["tags"], serde_json::json!([]));
}

#[tokio::test]
async fn scrape_stops_at_last_page_and_fills_the_store() {
    let app = setup_test_app(two_quote_site()).await;

    let (status, json) = post_scrape(&app.router, 3).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pages_visited"], 1);
    assert_eq!(json["stop_reason"], "last_page");
    assert_eq!(json["message"], "Successfully scraped 2 quotes");
    assert_eq!(json["quotes"].as_array().unwrap().len(), 2);
    assert_eq!(json["quotes"][0]["id"], 1);
    assert_eq!(json["quotes"][0]["text"], "A");
    assert_eq!(json["quotes"][0]["author"], "X");
    assert_eq!(json["quotes"][0]["tags"], serde_json::json!(["life"]));
    assert_eq!(json["quotes"][1]["id"], 2);
    assert_eq!(json["quotes"][1]["tags"], serde_json::json!([]));
    assert_eq!(
        json["stats"],
        serde_json::json!({
            "total_quotes": 2,
            "unique_authors": 2,
            "unique_tags": 1,
            "tag_frequency": {"life": 1}
        })
    );

    assert_eq!(app.state.store.len(), 2);
}

#[tokio::test]
async fn quotes_endpoint_filters_by_search_and_tag() {
    let app = setup_test_app(two_quote_site()).await;
    post_scrape(&app.router, 3).await;

    let (status, json) = get_json(&app.router, "/api/quotes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 2);

    let (_, json) = get_json(&app.router, "/api/quotes?tag=life").await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["quotes"][0]["text"], "A");

    let (_, json) = get_json(&app.router, "/api/quotes?tag=LIFE").await;
    assert_eq!(json["total"], 1);

    let (_, json) = get_json(&app.router, "/api/quotes?tag=nonexistent").await;
    assert_eq!(json["total"], 0);

    let (_, json) = get_json(&app.router, "/api/quotes?search=y").await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["quotes"][0]["author"], "Y");

    let (_, json) = get_json(&app.router, "/api/quotes?search=a&tag=life").await;
    assert_eq!(json["total"], 1);

    let (_, json) = get_json(&app.router, "/api/quotes?search=&tag=").await;
    assert_eq!(json["total"], 2);
}

#[tokio::test]
async fn stats_and_tags_reflect_current_records() {
    let app = setup_test_app(vec![
        listing_page(
            &[
                quote_block("One", "Albert Einstein", &["world", "change"]),
                quote_block("Two", "Albert Einstein", &["change"]),
            ],
            true,
        ),
        listing_page(&[quote_block("Three", "Jane Austen", &["abilities"])], false),
    ])
    .await;
    post_scrape(&app.router, 5).await;

    let (status, json) = get_json(&app.router, "/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_quotes"], 3);
    assert_eq!(json["unique_authors"], 2);
    assert_eq!(json["unique_tags"], 3);
    assert_eq!(json["tag_frequency"]["change"], 2);

    let (_, json) = get_json(&app.router, "/api/tags").await;
    assert_eq!(
        json["tags"],
        serde_json::json!(["abilities", "change", "world"])
    );
}

#[tokio::test]
async fn failed_page_is_skipped_and_reported() {
    let app = setup_test_app(vec![
        listing_page(&[quote_block("P1", "X", &[])], true),
        FixturePage::Status(StatusCode::INTERNAL_SERVER_ERROR),
        listing_page(&[quote_block("P3", "Y", &[])], true),
    ])
    .await;

    let (status, json) = post_scrape(&app.router, 3).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pages_visited"], 2);
    assert_eq!(json["failed_pages"], serde_json::json!([2]));
    assert_eq!(json["stop_reason"], "page_limit");
    assert_eq!(json["quotes"][0]["page"], 1);
    assert_eq!(json["quotes"][1]["page"], 3);
    assert_eq!(json["quotes"][1]["id"], 2);
}

#[tokio::test]
async fn missing_page_ends_the_scrape() {
    let app = setup_test_app(vec![listing_page(&[quote_block("Only", "X", &[])], true)]).await;

    let (status, json) = post_scrape(&app.router, 5).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pages_visited"], 1);
    assert_eq!(json["stop_reason"], "not_found");
    assert_eq!(json["quotes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn new_scrape_replaces_previous_records() {
    let app = setup_test_app(vec![
        listing_page(&[quote_block("A", "X", &["life"])], true),
        listing_page(&[quote_block("B", "Y", &["love"])], false),
    ])
    .await;

    post_scrape(&app.router, 2).await;
    assert_eq!(app.state.store.len(), 2);

    let (status, json) = post_scrape(&app.router, 1).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["quotes"].as_array().unwrap().len(), 1);

    let (_, json) = get_json(&app.router, "/api/quotes").await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["quotes"][0]["text"], "A");

    let (_, json) = get_json(&app.router, "/api/tags").await;
    assert_eq!(json["tags"], serde_json::json!(["life"]));
}

#[tokio::test]
async fn invalid_page_counts_are_rejected() {
    let app = setup_test_app(two_quote_site()).await;

    let (status, json) = post_scrape(&app.router, 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");

    let (status, _) = post_scrape(&app.router, TEST_MAX_PAGES + 1).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(app.state.store.is_empty());
}

#[tokio::test]
async fn malformed_scrape_body_uses_error_response_shape() {
    let app = setup_test_app(two_quote_site()).await;

    for raw in [r#"{"max_pages": -1}"#, r#"{"max_pages": "two"}"#, "not json"] {
        let request = Request::post("/api/scrape")
            .header("content-type", "application/json")
            .body(Body::from(raw))
            .unwrap();
        let (status, body) = send(&app.router, request).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {raw}");
        assert_eq!(json["error"], "validation_error");
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .starts_with("Configuration error: Invalid request body")
        );
    }

    let request = Request::post("/api/scrape")
        .body(Body::from(r#"{"max_pages": 1}"#))
        .unwrap();
    let (status, body) = send(&app.router, request).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");

    assert!(app.state.store.is_empty());
}

#[tokio::test]
async fn scrape_defaults_to_three_pages() {
    let app = setup_test_app(vec![
        listing_page(&[quote_block("1", "X", &[])], true),
        listing_page(&[quote_block("2", "X", &[])], true),
        listing_page(&[quote_block("3", "X", &[])], true),
        listing_page(&[quote_block("4", "X", &[])], true),
    ])
    .await;

    let request = Request::post("/api/scrape")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send(&app.router, request).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pages_visited"], 3);
    assert_eq!(json["stop_reason"], "page_limit");
}

#[tokio::test]
async fn concurrent_scrape_is_rejected() {
    let app = setup_test_app(two_quote_site()).await;

    // Simulate a scrape in flight.
    let _in_flight = app.state.scrape_guard.lock().await;

    let (status, json) = post_scrape(&app.router, 1).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "scrape_in_progress");
    assert!(app.state.store.is_empty());
}

#[tokio::test]
async fn export_returns_csv_attachment() {
    let app = setup_test_app(two_quote_site()).await;
    post_scrape(&app.router, 1).await;

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/api/export").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"quotes_export_"));
    assert!(disposition.ends_with(".csv\""));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let mut reader = csv::Reader::from_reader(body.as_ref());
    assert_eq!(
        reader.headers().unwrap(),
        vec!["id", "text", "author", "tags", "page", "collected_at"]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "1");
    assert_eq!(&rows[0][1], "A");
    assert_eq!(&rows[0][2], "X");
    assert_eq!(&rows[0][3], "life");
    assert_eq!(&rows[0][4], "1");
    assert_eq!(&rows[1][3], "");
}

#[tokio::test]
async fn export_applies_filters() {
    let app = setup_test_app(two_quote_site()).await;
    post_scrape(&app.router, 1).await;

    let (status, body) = send(
        &app.router,
        Request::get("/api/export?tag=life").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let mut reader = csv::Reader::from_reader(body.as_slice());
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][1], "A");
}

#[tokio::test]
async fn export_with_nothing_selected_returns_400() {
    let app = setup_test_app(two_quote_site()).await;

    let (status, json) = get_json(&app.router, "/api/export").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "nothing_to_export");

    post_scrape(&app.router, 1).await;
    let (status, _) = get_json(&app.router, "/api/export?tag=nonexistent").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = setup_test_app(two_quote_site()).await;

    let (status, json) = get_json(&app.router, "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["info"]["title"], "Quill API");
    assert!(json["paths"]["/api/scrape"].is_object());
    assert!(json["paths"]["/api/export"].is_object());
}
