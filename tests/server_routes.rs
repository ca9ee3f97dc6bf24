//! Router tests for the HTTP adapter.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use srpa::config::Settings;
use srpa::server::{create_router, AppState};

fn app() -> Router {
    create_router(AppState::new(&Settings::default()))
}

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_text(uri: &str) -> (StatusCode, String) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn health_responds() {
    let (status, body) = get_text("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn filter_links_for_has_value() {
    let (status, body) = post_json(
        "/filters/links",
        json!({
            "query": "buscar-usando=titulo&buscar-dentro-de=informes&autor=perez&autor-comparacion=igualdad",
            "behaviour": "has-value",
            "filter": "ministerio",
            "value": "Hacienda",
            "comparison": "equal-to"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["apply"],
        "/search?autor=perez&autor-comparacion=igualdad&buscar-usando=titulo&buscar-dentro-de=informes&ministerio=Hacienda&ministerio-comparacion=igualdad"
    );
    assert_eq!(
        body["remove"]["autor"],
        "/search?buscar-usando=titulo&buscar-dentro-de=informes"
    );
    assert_eq!(body["picker"]["state"], "shown-select");
    assert_eq!(body["picker"]["filter"], "ministerio");
    assert_eq!(body["picker"]["generic_comparison"], true);
    assert_eq!(body["picker"]["date_comparison"], false);
}

#[tokio::test]
async fn filter_links_for_date() {
    let (status, body) = post_json(
        "/filters/links",
        json!({
            "behaviour": "has-value",
            "filter": "date",
            "date": "2016-03-09",
            "date_comparison": "greater-than",
            "remove": ["informe"]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["apply"],
        "/search?fecha=2016-03-09&fecha-comparacion=mayorigual"
    );
    assert_eq!(body["remove"]["informe"], "/search?");
    assert_eq!(body["picker"]["state"], "shown-date");
    assert_eq!(body["picker"]["date_comparison"], true);
}

#[tokio::test]
async fn filter_links_without_value_hides_picker() {
    let (status, body) = post_json(
        "/filters/links",
        json!({
            "query": "buscar-usando=titulo",
            "behaviour": "without-value",
            "filter": "área de gestión"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["apply"], "/search?buscar-usando=titulo");
    assert_eq!(body["picker"]["state"], "hidden");
    assert_eq!(body["picker"]["clear_comparisons"], true);
}

#[tokio::test]
async fn filter_links_missing_comparison_is_rejected() {
    let (status, body) = post_json(
        "/filters/links",
        json!({
            "behaviour": "has-value",
            "filter": "autor",
            "value": "perez"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("comparison"));
}

#[tokio::test]
async fn filter_links_unknown_filter_is_rejected() {
    let (status, body) = post_json(
        "/filters/links",
        json!({
            "behaviour": "has-value",
            "filter": "organismo",
            "value": "salud",
            "comparison": "equal-to"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("organismo"));
}

#[tokio::test]
async fn filter_links_unknown_comparison_is_rejected() {
    let (status, body) = post_json(
        "/filters/links",
        json!({
            "behaviour": "has-value",
            "filter": "autor",
            "value": "perez",
            "comparison": "like"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("like"));
}

#[tokio::test]
async fn filter_links_malformed_body_is_rejected() {
    let (status, body) = post_json("/filters/links", json!({ "filter": "autor" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn filter_panel_renders_chips() {
    let (status, html) =
        get_text("/filters/panel?autor=perez&autor-comparacion=diferencia&buscar-usando=titulo")
            .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"data-filter-link-type="remove""#));
    assert!(html.contains(r#"data-filter-name="autor""#));
    assert!(html.contains(r#"href="/search?buscar-usando=titulo""#));
    assert!(html.contains("distinto de perez"));
}

#[tokio::test]
async fn filter_panel_rejects_bad_page() {
    let (status, _) = get_text("/filters/panel?pagina=cero").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn highlight_marks_terms_in_result() {
    let (status, body) = post_json(
        "/results/highlight",
        json!({
            "results": [
                {"id": "1", "body": "nada"},
                {"id": "2", "body": "Sobre la ley, otra vez", "answer": "Las leyes"}
            ],
            "id": "2",
            "terms": ["ley"]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["body"], "Sobre la <mark>ley</mark>, otra vez");
    assert_eq!(body["result"]["answer"], "Las leyes");
    assert!(body["html"]
        .as_str()
        .unwrap()
        .contains(r#"data-question-id="2""#));
}

#[tokio::test]
async fn highlight_unknown_result_is_null() {
    let (status, body) = post_json(
        "/results/highlight",
        json!({ "results": [], "id": "9", "terms": ["ley"] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["result"].is_null());
    assert!(body["html"].is_null());
}
